//! Render requests: the JSON wire shape and its validated form.
//!
//! A [`RenderRequestSettings`] is what arrives from the HTTP layer; it is
//! loosely typed and carries string defaults. [`RenderRequestSettings::into_request`]
//! turns it into a [`RenderRequest`] whose invariants are already checked.
//!
//! # Example
//!
//! ```
//! use linkcode_renderer::{OutputFormat, RenderRequestSettings};
//!
//! let settings = RenderRequestSettings::from_json(
//!     r##"{ "target_url": "https://example.com", "size_px": 256, "foreground_color": "#112233" }"##,
//! )
//! .unwrap();
//!
//! let request = settings.into_request().unwrap();
//! assert_eq!(request.output_format, OutputFormat::Png);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, Rgb, parse_hex_color, to_hex};
use crate::error::{RenderError, Result};
use crate::output::OutputFormat;

// ============================================================================
// RenderRequest
// ============================================================================

/// A typed render request.
///
/// [`RenderRequest::new`] and the `with_*` builders check nothing;
/// [`RenderRequestSettings::into_request`] and [`QrRenderer::render`] run
/// [`RenderRequest::validate`] before any work is done.
///
/// [`QrRenderer::render`]: crate::QrRenderer::render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// URL encoded into the symbol.
    pub target_url: String,
    /// Edge length of the output in pixels.
    pub size_px: u32,
    /// Dark module color.
    pub foreground: Rgb,
    /// Light module and border color.
    pub background: Rgb,
    /// Optional logo drawn at the center.
    pub logo_url: Option<String>,
    /// Output encoding.
    pub output_format: OutputFormat,
    /// Whether to surround the symbol with a quiet zone.
    pub include_border: bool,
}

impl RenderRequest {
    /// Creates a black-on-white PNG request with a border and no logo.
    pub fn new(target_url: impl Into<String>, size_px: u32) -> Self {
        Self {
            target_url: target_url.into(),
            size_px,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            logo_url: None,
            output_format: OutputFormat::Png,
            include_border: true,
        }
    }

    pub fn with_colors(mut self, foreground: Rgb, background: Rgb) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    pub fn with_logo(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_border(mut self, include_border: bool) -> Self {
        self.include_border = include_border;
        self
    }

    /// Checks the invariants that do not depend on encoding.
    pub fn validate(&self) -> Result<()> {
        if self.target_url.trim().is_empty() {
            return Err(RenderError::invalid_input("target_url must not be empty"));
        }
        if self.size_px == 0 {
            return Err(RenderError::invalid_input("size_px must be positive"));
        }
        if self.foreground == self.background {
            return Err(RenderError::invalid_input(format!(
                "foreground and background are both {}",
                to_hex(self.foreground)
            )));
        }
        Ok(())
    }
}

// ============================================================================
// RenderRequestSettings
// ============================================================================

/// Serializable request as received from the HTTP layer.
///
/// # JSON Format
///
/// ```json
/// {
///   "target_url": "https://example.com",
///   "size_px": 512,
///   "logo_url": "https://example.com/logo.png",
///   "foreground_color": "#000000",
///   "background_color": "#ffffff",
///   "output_format": "png"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct RenderRequestSettings {
    pub target_url: String,

    /// Signed so that negative sizes reach validation instead of failing
    /// deserialization with an opaque message.
    pub size_px: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    #[serde(default = "default_foreground")]
    pub foreground_color: String,

    #[serde(default = "default_background")]
    pub background_color: String,

    #[serde(default = "default_format")]
    pub output_format: String,

    #[serde(default = "default_true")]
    pub include_border: bool,
}

fn default_foreground() -> String {
    to_hex(DEFAULT_FOREGROUND)
}

fn default_background() -> String {
    to_hex(DEFAULT_BACKGROUND)
}

fn default_format() -> String {
    OutputFormat::Png.to_string()
}

fn default_true() -> bool {
    true
}

impl RenderRequestSettings {
    /// Settings with every optional field at its default.
    pub fn new(target_url: impl Into<String>, size_px: i64) -> Self {
        Self {
            target_url: target_url.into(),
            size_px,
            logo_url: None,
            foreground_color: default_foreground(),
            background_color: default_background(),
            output_format: default_format(),
            include_border: true,
        }
    }

    /// Validates and converts into a [`RenderRequest`].
    ///
    /// Empty color strings fall back to the defaults; an empty or
    /// whitespace-only logo URL counts as no logo.
    pub fn into_request(self) -> Result<RenderRequest> {
        let size_px = u32::try_from(self.size_px)
            .ok()
            .filter(|&s| s > 0)
            .ok_or_else(|| {
                RenderError::invalid_input(format!(
                    "size_px must be a positive integer, got {}",
                    self.size_px
                ))
            })?;

        let foreground = parse_color_or(&self.foreground_color, DEFAULT_FOREGROUND)?;
        let background = parse_color_or(&self.background_color, DEFAULT_BACKGROUND)?;
        let output_format = OutputFormat::parse(&self.output_format)?;

        let request = RenderRequest {
            target_url: self.target_url,
            size_px,
            foreground,
            background,
            logo_url: self.logo_url.filter(|u| !u.trim().is_empty()),
            output_format,
            include_border: self.include_border,
        };
        request.validate()?;
        Ok(request)
    }

    /// Serializes the settings to a JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes settings from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&RenderRequest> for RenderRequestSettings {
    fn from(request: &RenderRequest) -> Self {
        Self {
            target_url: request.target_url.clone(),
            size_px: request.size_px as i64,
            logo_url: request.logo_url.clone(),
            foreground_color: to_hex(request.foreground),
            background_color: to_hex(request.background),
            output_format: request.output_format.to_string(),
            include_border: request.include_border,
        }
    }
}

fn parse_color_or(value: &str, fallback: Rgb) -> Result<Rgb> {
    if value.trim().is_empty() {
        return Ok(fallback);
    }
    Ok(parse_hex_color(value)?)
}

// ============================================================================
// Tests
// ============================================================================
