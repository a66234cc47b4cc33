//! Rounded-corner alpha mask.

use image::{GrayImage, Luma};

const OPAQUE: Luma<u8> = Luma([255]);
const CLEAR: Luma<u8> = Luma([0]);

/// Per-pixel opacity for a square logo with circular corner cut-outs.
///
/// Edges are hard: every value is either 0 or 255.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    data: GrayImage,
}

impl AlphaMask {
    /// Builds a `side × side` mask whose corners are rounded with `radius`.
    ///
    /// A radius of zero or less produces a fully opaque mask.
    pub fn rounded(side: u32, radius: f64) -> Self {
        let data = GrayImage::from_fn(side, side, |x, y| {
            if covered(x, y, side, side, radius) {
                OPAQUE
            } else {
                CLEAR
            }
        });
        Self { data }
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Opacity at `(x, y)`; out-of-range reads as transparent.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.data.get_pixel_checked(x, y).map_or(0, |p| p[0])
    }
}

/// Whether `(x, y)` survives the corner cut.
///
/// A pixel at least `radius` away from either the nearest vertical or the
/// nearest horizontal edge sits outside every corner square and is kept.
/// Inside a corner square it is kept when it falls within the corner circle.
fn covered(x: u32, y: u32, width: u32, height: u32, radius: f64) -> bool {
    let dx = x.min(width - 1 - x) as f64;
    let dy = y.min(height - 1 - y) as f64;

    if dx >= radius || dy >= radius {
        return true;
    }

    (radius - dx).hypot(radius - dy) <= radius
}
