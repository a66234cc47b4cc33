//! linkcode-renderer: QR code image synthesis for short links
//!
//! This crate encodes a destination URL into a QR symbol, rasterizes it at a
//! requested size and color scheme, optionally embeds a logo fetched over
//! HTTP with rounded corners, and serializes the result as PNG or JPEG.
//!
//! # Example
//!
//! ```
//! use linkcode_renderer::{QrRenderer, RenderRequest, RendererConfig};
//!
//! let renderer = QrRenderer::new(RendererConfig::default()).unwrap();
//! let result = renderer.render(&RenderRequest::new("https://example.com", 256)).unwrap();
//!
//! assert_eq!(result.content_type(), "image/png");
//! ```
//!
//! # Wire Requests
//!
//! The HTTP layer hands over [`RenderRequestSettings`], which carries the
//! string defaults of the public API and is validated on conversion:
//!
//! ```
//! use linkcode_renderer::{QrRenderer, RenderRequestSettings, RendererConfig};
//!
//! let renderer = QrRenderer::new(RendererConfig::default()).unwrap();
//! let settings = RenderRequestSettings::from_json(
//!     r#"{ "target_url": "https://example.com", "size_px": 128, "output_format": "jpeg" }"#,
//! )
//! .unwrap();
//!
//! let result = renderer.render_settings(settings).unwrap();
//! assert_eq!(result.content_type(), "image/jpeg");
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RenderRequest
//!     │
//!     ▼
//! symbol::encode_symbol ──► raster::rasterize ──► [logo: fetch ─► decode ─► embed] ──► output::encode
//!     QrMatrix                 PixelBuffer              PixelBuffer (moved)              bytes
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod logo;
pub mod output;
pub mod pixels;
pub mod raster;
mod renderer;
mod request;
pub mod symbol;

pub use color::{ColorError, Rgb, parse_hex_color};
pub use config::{FetchConfig, RenderPolicy, RendererConfig};
pub use error::{FailureClass, RenderError, Result};
pub use logo::{AlphaMask, HttpLogoSource, LogoPlacement, LogoSource};
pub use output::OutputFormat;
pub use pixels::{PixelBuffer, RectPx};
pub use renderer::{QrRenderer, RenderResult};
pub use request::{RenderRequest, RenderRequestSettings};
pub use symbol::{ErrorCorrection, QrMatrix};
