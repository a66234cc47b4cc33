//! QR symbol encoding.
//!
//! The bit-matrix construction itself comes from the `qrcode` crate; this
//! module pins the error-correction policy, maps its failures onto
//! [`RenderError`], and freezes the result into an immutable [`QrMatrix`].

use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

// ============================================================================
// ErrorCorrection
// ============================================================================

/// QR error-correction level.
///
/// Higher levels survive more obscured modules at the cost of capacity.
/// Logos cover the center of the symbol, so the default is [`High`](Self::High).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    /// Recovers roughly 7% of codewords.
    Low,
    /// Recovers roughly 15% of codewords.
    Medium,
    /// Recovers roughly 25% of codewords.
    Quartile,
    /// Recovers roughly 30% of codewords.
    #[default]
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

// ============================================================================
// QrMatrix
// ============================================================================

/// An immutable square grid of QR modules (`true` = dark).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    side: usize,
    version: i16,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Number of modules along one edge, excluding any quiet zone.
    pub fn side(&self) -> usize {
        self.side
    }

    /// The symbol version selected for the payload (1..=40).
    pub fn version(&self) -> i16 {
        self.version
    }

    /// Returns whether the module at column `x`, row `y` is dark.
    ///
    /// Coordinates outside the symbol read as light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.side && y < self.side && self.modules[y * self.side + x]
    }

    /// Count of dark modules.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes `payload` into a QR symbol at the given error-correction level.
///
/// The smallest version that fits is chosen. Identical inputs always yield
/// identical matrices.
pub fn encode_symbol(payload: &str, level: ErrorCorrection) -> Result<QrMatrix> {
    if payload.is_empty() {
        return Err(RenderError::invalid_input("target url must not be empty"));
    }

    let code = QrCode::with_error_correction_level(payload.as_bytes(), level.into()).map_err(
        |e| match e {
            QrError::DataTooLong => RenderError::PayloadTooLarge(format!(
                "{} bytes exceed symbol capacity at {level:?} error correction",
                payload.len()
            )),
            other => RenderError::encoding_failure(format!("qr encoder: {other}")),
        },
    )?;

    let version = match code.version() {
        Version::Normal(v) | Version::Micro(v) => v,
    };

    let side = code.width();
    let modules = code
        .to_colors()
        .into_iter()
        .map(|c| c == Color::Dark)
        .collect();

    tracing::debug!(version, side, "encoded qr symbol");

    Ok(QrMatrix {
        side,
        version,
        modules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_url_fits_version_three_at_high() {
        let matrix = encode_symbol("https://example.com", ErrorCorrection::High).unwrap();
        assert_eq!(matrix.version(), 3);
        assert_eq!(matrix.side(), 29);
        assert_eq!(matrix.side(), matrix.version() as usize * 4 + 17);
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = encode_symbol("https://example.com/a?b=c", ErrorCorrection::High).unwrap();
        let b = encode_symbol("https://example.com/a?b=c", ErrorCorrection::High).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn finder_pattern_corner_is_dark() {
        let matrix = encode_symbol("hello", ErrorCorrection::High).unwrap();
        assert!(matrix.is_dark(0, 0));
        assert!(matrix.is_dark(6, 6));
        assert!(!matrix.is_dark(1, 1));
        assert!(!matrix.is_dark(matrix.side(), 0));
        assert!(matrix.dark_count() > 0);
    }

    #[test]
    fn empty_payload_is_invalid_input() {
        let err = encode_symbol("", ErrorCorrection::High).unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput(_)));
    }

    #[test]
    fn oversized_payload_is_rejected_not_truncated() {
        // Version 40-H holds 1273 bytes.
        let long = format!("https://example.com/{}", "a".repeat(1300));
        let err = encode_symbol(&long, ErrorCorrection::High).unwrap_err();
        assert!(matches!(err, RenderError::PayloadTooLarge(_)), "{err}");
    }

    #[test]
    fn lower_levels_fit_more() {
        let payload = format!("https://example.com/{}", "a".repeat(1300));
        assert!(encode_symbol(&payload, ErrorCorrection::Low).is_ok());
    }
}
