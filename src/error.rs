//! Error types for the render pipeline.

use thiserror::Error;

use crate::color::ColorError;

/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that terminate a render request.
///
/// Every stage returns one of these and the renderer surfaces the first one
/// unchanged. None of them is retried internally.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The caller sent something that can never render.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The target URL does not fit in a symbol at the chosen error-correction level.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// The logo URL is malformed, has no host, or is not http/https.
    #[error("unsupported logo url: {0}")]
    UnsupportedLogoScheme(String),

    /// The logo host could not be reached, timed out, or answered with a non-2xx status.
    #[error("logo fetch failed: {0}")]
    LogoFetchFailed(String),

    /// The logo bytes are not a recognizable image.
    #[error("logo decode failed: {0}")]
    LogoDecodeFailed(String),

    /// The requested output format is neither PNG nor JPEG.
    #[error("unsupported output format: {0:?}")]
    UnsupportedOutputFormat(String),

    /// A symbol or image codec failed unexpectedly.
    #[error("encoding failure: {0}")]
    EncodingFailure(String),
}

/// Coarse grouping of [`RenderError`] for transport-level status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The request itself is wrong; resending it unchanged fails again.
    InvalidRequest,
    /// A remote resource (the logo host) misbehaved.
    Upstream,
    /// Something inside the codecs broke.
    Internal,
}

impl RenderError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unsupported_logo_scheme(msg: impl Into<String>) -> Self {
        Self::UnsupportedLogoScheme(msg.into())
    }

    pub fn logo_fetch_failed(msg: impl Into<String>) -> Self {
        Self::LogoFetchFailed(msg.into())
    }

    pub fn logo_decode_failed(msg: impl Into<String>) -> Self {
        Self::LogoDecodeFailed(msg.into())
    }

    pub fn encoding_failure(msg: impl Into<String>) -> Self {
        Self::EncodingFailure(msg.into())
    }

    /// Returns which side of the exchange is responsible for the failure.
    pub fn class(&self) -> FailureClass {
        match self {
            Self::InvalidInput(_)
            | Self::PayloadTooLarge(_)
            | Self::UnsupportedLogoScheme(_)
            | Self::LogoDecodeFailed(_)
            | Self::UnsupportedOutputFormat(_) => FailureClass::InvalidRequest,
            Self::LogoFetchFailed(_) => FailureClass::Upstream,
            Self::EncodingFailure(_) => FailureClass::Internal,
        }
    }
}

impl From<ColorError> for RenderError {
    fn from(err: ColorError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        Self::EncodingFailure(err.to_string())
    }
}
