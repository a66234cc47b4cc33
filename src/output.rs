//! Final serialization to PNG or JPEG.

use std::fmt;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::pixels::PixelBuffer;

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless; colors are preserved exactly.
    #[default]
    Png,
    /// Lossy; alpha is dropped.
    Jpeg,
}

impl OutputFormat {
    /// Resolves a caller-supplied format name.
    ///
    /// Matching ignores case and surrounding whitespace. An empty name means
    /// PNG; `jpg` is accepted as an alias for JPEG.
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            _ => Err(RenderError::UnsupportedOutputFormat(name.to_string())),
        }
    }

    /// MIME type for the HTTP `Content-Type` header.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => f.write_str("png"),
            Self::Jpeg => f.write_str("jpeg"),
        }
    }
}

/// Encodes the buffer in the requested format.
///
/// The buffer is consumed; nothing is returned on failure.
pub fn encode(buffer: PixelBuffer, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let img = buffer.into_image();
    let (width, height) = img.dimensions();
    let mut bytes = Vec::new();

    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut bytes).write_image(
                img.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(img).into_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, jpeg_quality).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn checkerboard() -> PixelBuffer {
        PixelBuffer::new(RgbaImage::from_fn(16, 16, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba([0x11, 0x22, 0x33, 255])
            } else {
                Rgba([0xee, 0xdd, 0xcc, 255])
            }
        }))
    }

    #[test]
    fn parse_names() {
        assert_eq!(OutputFormat::parse("").unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::parse("PNG").unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::parse("jpeg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse("JPG").unwrap(), OutputFormat::Jpeg);
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
    }

    #[test]
    fn unknown_formats_fail() {
        for name in ["bmp", "svg", "gif", "webp"] {
            assert!(matches!(
                OutputFormat::parse(name),
                Err(RenderError::UnsupportedOutputFormat(_))
            ));
        }
    }

    #[test]
    fn content_types() {
        assert_eq!(OutputFormat::Png.content_type(), "image/png");
        assert_eq!(OutputFormat::Jpeg.content_type(), "image/jpeg");
    }

    #[test]
    fn png_is_lossless() {
        let buffer = checkerboard();
        let expected = buffer.image().clone();
        let bytes = encode(buffer, OutputFormat::Png, 90).unwrap();

        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn png_reencode_is_idempotent() {
        let first = encode(checkerboard(), OutputFormat::Png, 90).unwrap();
        let decoded = image::load_from_memory(&first).unwrap().to_rgba8();
        let second = encode(PixelBuffer::new(decoded.clone()), OutputFormat::Png, 90).unwrap();
        let redecoded = image::load_from_memory(&second).unwrap().to_rgba8();
        assert_eq!(redecoded, decoded);
    }

    #[test]
    fn jpeg_has_soi_marker_and_size() {
        let bytes = encode(checkerboard(), OutputFormat::Jpeg, 90).unwrap();
        assert!(bytes.starts_with(&[0xff, 0xd8]));
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }
}
