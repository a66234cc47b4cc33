//! Rasterization of a [`QrMatrix`] into a square RGBA buffer.

use image::RgbaImage;

use crate::color::{Rgb, to_rgba};
use crate::error::{RenderError, Result};
use crate::pixels::PixelBuffer;
use crate::symbol::QrMatrix;

/// Parameters for [`rasterize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Output edge length in pixels.
    pub size: u32,
    /// Dark module color.
    pub foreground: Rgb,
    /// Light module, quiet zone and residual padding color.
    pub background: Rgb,
    /// Quiet-zone width in modules on each side. Zero disables the border.
    pub quiet_zone: u32,
}

/// Pixel edge length of one module, or `None` if `size` cannot hold one
/// pixel per module.
pub fn module_pixels(matrix_side: usize, quiet_zone: u32, size: u32) -> Option<u32> {
    let modules = u32::try_from(matrix_side)
        .ok()?
        .checked_add(quiet_zone.checked_mul(2)?)?;
    match size / modules {
        0 => None,
        px => Some(px),
    }
}

/// Renders the matrix to exactly `size × size` opaque pixels.
///
/// Module size is rounded down so modules stay square; the pixels left over
/// on the right and bottom edges are filled with the background color.
pub fn rasterize(matrix: &QrMatrix, options: &RasterOptions) -> Result<PixelBuffer> {
    let Some(module_px) = module_pixels(matrix.side(), options.quiet_zone, options.size) else {
        return Err(RenderError::invalid_input(format!(
            "size {}px is too small for a {}-module symbol with a {}-module border",
            options.size,
            matrix.side(),
            options.quiet_zone
        )));
    };

    let fg = to_rgba(options.foreground);
    let bg = to_rgba(options.background);
    let border = options.quiet_zone as usize;

    let img = RgbaImage::from_fn(options.size, options.size, |x, y| {
        let mx = (x / module_px) as usize;
        let my = (y / module_px) as usize;
        let dark = mx >= border && my >= border && matrix.is_dark(mx - border, my - border);
        if dark { fg } else { bg }
    });

    tracing::debug!(
        size = options.size,
        module_px,
        residual = options.size - module_px * (matrix.side() as u32 + 2 * options.quiet_zone),
        "rasterized symbol"
    );

    Ok(PixelBuffer::new(img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
    use crate::symbol::{ErrorCorrection, encode_symbol};

    fn options(size: u32, quiet_zone: u32) -> RasterOptions {
        RasterOptions {
            size,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            quiet_zone,
        }
    }

    fn example() -> QrMatrix {
        encode_symbol("https://example.com", ErrorCorrection::High).unwrap()
    }

    #[test]
    fn module_size_rounds_down() {
        // 29 modules + 8 border = 37
        assert_eq!(module_pixels(29, 4, 256), Some(6));
        assert_eq!(module_pixels(29, 4, 255), Some(6));
        assert_eq!(module_pixels(29, 4, 37), Some(1));
        assert_eq!(module_pixels(29, 4, 36), None);
        assert_eq!(module_pixels(29, 0, 29), Some(1));
    }

    #[test]
    fn output_is_exact_size_and_opaque() {
        for size in [37, 100, 255, 256, 513] {
            let buffer = rasterize(&example(), &options(size, 4)).unwrap();
            assert_eq!(buffer.image().dimensions(), (size, size));
            assert!(buffer.is_opaque());
        }
    }

    #[test]
    fn border_and_residual_are_background() {
        let buffer = rasterize(&example(), &options(255, 4)).unwrap();
        let img = buffer.image();
        let bg = to_rgba(DEFAULT_BACKGROUND);

        // quiet zone: 4 modules * 6px
        for i in 0..24 {
            assert_eq!(*img.get_pixel(i, 100), bg);
            assert_eq!(*img.get_pixel(100, i), bg);
        }
        // 37 * 6 = 222; pixels 222..255 are residual
        for i in 222..255 {
            assert_eq!(*img.get_pixel(i, 100), bg);
            assert_eq!(*img.get_pixel(100, i), bg);
        }
    }

    #[test]
    fn modules_are_square_blocks() {
        let matrix = example();
        let buffer = rasterize(&matrix, &options(255, 4)).unwrap();
        let img = buffer.image();
        let fg = to_rgba(DEFAULT_FOREGROUND);

        for my in 0..matrix.side() {
            for mx in 0..matrix.side() {
                let x0 = (mx as u32 + 4) * 6;
                let y0 = (my as u32 + 4) * 6;
                let expected = matrix.is_dark(mx, my);
                for dy in 0..6 {
                    for dx in 0..6 {
                        let dark = *img.get_pixel(x0 + dx, y0 + dy) == fg;
                        assert_eq!(dark, expected, "module ({mx},{my}) pixel ({dx},{dy})");
                    }
                }
            }
        }
    }

    #[test]
    fn disabling_border_starts_symbol_at_origin() {
        let matrix = example();
        let buffer = rasterize(&matrix, &options(58, 0)).unwrap();
        // top-left finder pattern is dark at (0, 0)
        assert_eq!(*buffer.image().get_pixel(0, 0), to_rgba(DEFAULT_FOREGROUND));
    }

    #[test]
    fn too_small_is_invalid_input() {
        let err = rasterize(&example(), &options(20, 4)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput(_)));
    }
}
