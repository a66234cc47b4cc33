//! Hex color parsing and color helpers.

use image::Rgba;
use palette::{IntoColor, Srgb, Xyz};
use thiserror::Error;

/// An opaque 8-bit sRGB color.
pub type Rgb = Srgb<u8>;

/// Default module color.
pub const DEFAULT_FOREGROUND: Rgb = Srgb::new(0, 0, 0);

/// Default quiet-zone and light-module color.
pub const DEFAULT_BACKGROUND: Rgb = Srgb::new(255, 255, 255);

/// Reasons a string is not a `#RRGGBB` color.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid color format {0:?}: expected 6 hex digits")]
    InvalidLength(String),

    #[error("invalid color format {0:?}: non-hex character")]
    InvalidDigit(String),
}

/// Parses `#RRGGBB` (the `#` is optional, case is ignored).
///
/// Shorthand forms like `#fff` are rejected.
pub fn parse_hex_color(input: &str) -> Result<Rgb, ColorError> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if hex.len() != 6 {
        return Err(ColorError::InvalidLength(input.to_string()));
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidDigit(input.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| ColorError::InvalidDigit(input.to_string()))
    };

    Ok(Srgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Formats a color as lowercase `#rrggbb`.
pub fn to_hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Converts to a fully opaque RGBA pixel.
pub fn to_rgba(color: Rgb) -> Rgba<u8> {
    Rgba([color.red, color.green, color.blue, 255])
}

/// WCAG-style contrast ratio between two colors, in `1.0..=21.0`.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f32 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

fn relative_luminance(color: Rgb) -> f32 {
    let xyz: Xyz = color.into_format::<f32>().into_color();
    xyz.y
}
