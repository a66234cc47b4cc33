//! Renderer configuration.
//!
//! Every policy constant of the pipeline lives here with its default, so a
//! deployment can override them from JSON without touching code.
//!
//! ```json
//! {
//!   "policy": { "errorCorrection": "high", "jpegQuality": 90 },
//!   "fetch": { "timeoutMs": 3000 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::symbol::ErrorCorrection;

/// Quiet-zone width the QR standard asks for.
pub const DEFAULT_QUIET_ZONE_MODULES: u32 = 4;

/// The logo footprint is `size / DEFAULT_LOGO_DIVISOR`.
pub const DEFAULT_LOGO_DIVISOR: u32 = 4;

/// The logo corner radius is `footprint / DEFAULT_CORNER_RADIUS_DIVISOR`.
pub const DEFAULT_CORNER_RADIUS_DIVISOR: u32 = 6;

/// Largest output edge accepted from a request.
pub const DEFAULT_MAX_SIZE_PX: u32 = 4096;

/// JPEG output quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Upper bound on a single logo fetch.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

/// Largest logo body accepted.
pub const DEFAULT_MAX_LOGO_BYTES: u64 = 5 * 1024 * 1024;

// ============================================================================
// RenderPolicy
// ============================================================================

/// Fixed proportions and codec settings applied to every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderPolicy {
    /// Error-correction level of every symbol.
    pub error_correction: ErrorCorrection,

    /// Quiet-zone width in modules when the border is enabled.
    pub quiet_zone_modules: u32,

    /// Divides the symbol size to get the logo footprint.
    pub logo_divisor: u32,

    /// Divides the logo footprint to get its corner radius.
    pub corner_radius_divisor: u32,

    /// Quality for JPEG output (1-100).
    pub jpeg_quality: u8,

    /// Requests with a larger `size_px` are rejected before any work.
    pub max_size_px: u32,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::High,
            quiet_zone_modules: DEFAULT_QUIET_ZONE_MODULES,
            logo_divisor: DEFAULT_LOGO_DIVISOR,
            corner_radius_divisor: DEFAULT_CORNER_RADIUS_DIVISOR,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_size_px: DEFAULT_MAX_SIZE_PX,
        }
    }
}

// ============================================================================
// FetchConfig
// ============================================================================

/// Settings for retrieving caller-supplied logos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchConfig {
    /// Total time budget for one logo request, in milliseconds.
    pub timeout_ms: u64,

    /// Bodies larger than this are rejected.
    pub max_logo_bytes: u64,

    /// `User-Agent` header sent to logo hosts.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            max_logo_bytes: DEFAULT_MAX_LOGO_BYTES,
            user_agent: concat!("linkcode-renderer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// ============================================================================
// RendererConfig
// ============================================================================

/// Complete renderer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RendererConfig {
    pub policy: RenderPolicy,
    pub fetch: FetchConfig,
}

impl RendererConfig {
    /// Rejects settings that would make every render fail or hang.
    pub fn validate(&self) -> Result<()> {
        if self.policy.logo_divisor == 0 {
            return Err(RenderError::invalid_input("logoDivisor must be non-zero"));
        }
        if self.policy.corner_radius_divisor == 0 {
            return Err(RenderError::invalid_input(
                "cornerRadiusDivisor must be non-zero",
            ));
        }
        if !(1..=100).contains(&self.policy.jpeg_quality) {
            return Err(RenderError::invalid_input(format!(
                "jpegQuality {} is outside 1..=100",
                self.policy.jpeg_quality
            )));
        }
        if self.policy.max_size_px == 0 {
            return Err(RenderError::invalid_input("maxSizePx must be non-zero"));
        }
        if self.fetch.timeout_ms == 0 {
            return Err(RenderError::invalid_input("timeoutMs must be non-zero"));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a config from a JSON string; missing fields take defaults.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
