//! Logo embedding.
//!
//! A logo goes through three steps once its bytes are decoded:
//!
//! ```text
//! decoded logo ──► resize to footprint ──► rounded AlphaMask ──► over-composite
//!                   (Lanczos3)              (hard corners)        (centered)
//! ```
//!
//! The footprint is a fixed fraction of the symbol size so that the
//! error-correction level can still recover the modules it covers.

pub mod composite;
pub mod fetch;
pub mod mask;

pub use composite::{apply_mask, composite_over, resize_logo};
pub use fetch::{HttpLogoSource, LogoSource, decode_logo, validate_logo_url};
pub use mask::AlphaMask;

use image::RgbaImage;

use crate::error::{RenderError, Result};
use crate::pixels::{PixelBuffer, RectPx};

// ============================================================================
// LogoPlacement
// ============================================================================

/// Where and how large the logo lands on a square canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPlacement {
    /// Target square the logo is resized into and drawn over.
    pub rect: RectPx,
    /// Corner radius of the mask in pixels.
    pub corner_radius: f64,
}

impl LogoPlacement {
    /// Computes the placement for a `canvas × canvas` symbol.
    ///
    /// The footprint is `canvas / logo_divisor` and the radius is
    /// `footprint / corner_radius_divisor`.
    pub fn for_canvas(canvas: u32, logo_divisor: u32, corner_radius_divisor: u32) -> Result<Self> {
        if logo_divisor == 0 || corner_radius_divisor == 0 {
            return Err(RenderError::invalid_input(
                "logo and corner radius divisors must be non-zero",
            ));
        }

        let footprint = canvas / logo_divisor;
        if footprint == 0 {
            return Err(RenderError::invalid_input(format!(
                "size {canvas}px leaves no room for a logo"
            )));
        }

        Ok(Self {
            rect: RectPx::centered_square(canvas, footprint),
            corner_radius: footprint as f64 / corner_radius_divisor as f64,
        })
    }

    pub fn footprint(&self) -> u32 {
        self.rect.width
    }
}

// ============================================================================
// Embedding
// ============================================================================

/// Resizes, masks and composites `logo` onto `canvas`.
///
/// The canvas is consumed and returned with the logo drawn in; its
/// dimensions never change.
pub fn embed_logo(
    mut canvas: PixelBuffer,
    logo: &RgbaImage,
    placement: &LogoPlacement,
) -> PixelBuffer {
    let footprint = placement.footprint();
    let resized = resize_logo(logo, footprint);
    let mask = AlphaMask::rounded(footprint, placement.corner_radius);
    let cutout = apply_mask(resized, &mask);

    composite_over(
        canvas.image_mut(),
        &cutout,
        placement.rect.x as i64,
        placement.rect.y as i64,
    );

    tracing::debug!(
        footprint,
        x = placement.rect.x,
        y = placement.rect.y,
        radius = placement.corner_radius,
        "embedded logo"
    );

    canvas
}
