//! The render pipeline.

use std::fmt;
use std::sync::Arc;

use crate::color::contrast_ratio;
use crate::config::RendererConfig;
use crate::error::{FailureClass, RenderError, Result};
use crate::logo::{
    HttpLogoSource, LogoPlacement, LogoSource, decode_logo, embed_logo, validate_logo_url,
};
use crate::output::{OutputFormat, encode};
use crate::raster::{RasterOptions, rasterize};
use crate::request::{RenderRequest, RenderRequestSettings};
use crate::symbol::encode_symbol;

/// Below this contrast ratio a symbol is likely to scan poorly.
const LOW_CONTRAST_WARNING: f32 = 1.5;

// ============================================================================
// RenderStage
// ============================================================================

/// Pipeline stages, in execution order.
///
/// Logo stages only run when a logo was requested. A failure in any stage
/// moves to the terminal `Failed` state; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderStage {
    Validating,
    Encoding,
    Rasterizing,
    FetchingLogo,
    Compositing,
    EncodingOutput,
    Done,
    Failed(FailureClass),
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Encoding => "encoding",
            Self::Rasterizing => "rasterizing",
            Self::FetchingLogo => "fetching-logo",
            Self::Compositing => "compositing",
            Self::EncodingOutput => "encoding-output",
            Self::Done => "done",
            Self::Failed(FailureClass::InvalidRequest) => "failed(invalid-request)",
            Self::Failed(FailureClass::Upstream) => "failed(upstream)",
            Self::Failed(FailureClass::Internal) => "failed(internal)",
        };
        f.write_str(name)
    }
}

// ============================================================================
// RenderResult
// ============================================================================

/// Encoded image bytes and their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    bytes: Vec<u8>,
    format: OutputFormat,
}

impl RenderResult {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// `image/png` or `image/jpeg`.
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

// ============================================================================
// QrRenderer
// ============================================================================

/// Turns render requests into encoded QR images.
///
/// A renderer holds only immutable configuration and a logo source, so one
/// instance can serve any number of threads at once.
///
/// # Example
///
/// ```no_run
/// use linkcode_renderer::{QrRenderer, RenderRequest, RendererConfig};
///
/// let renderer = QrRenderer::new(RendererConfig::default()).unwrap();
/// let result = renderer
///     .render(
///         &RenderRequest::new("https://example.com", 256)
///             .with_logo("https://example.com/logo.png"),
///     )
///     .unwrap();
/// assert_eq!(result.content_type(), "image/png");
/// ```
#[derive(Clone)]
pub struct QrRenderer {
    config: RendererConfig,
    logos: Arc<dyn LogoSource>,
}

impl fmt::Debug for QrRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrRenderer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QrRenderer {
    /// Creates a renderer that fetches logos over HTTP.
    ///
    /// The HTTP client is blocking. Inside an async runtime, create and call
    /// the renderer from `tokio::task::spawn_blocking` or a dedicated thread;
    /// the client panics when built or driven on a runtime worker.
    pub fn new(config: RendererConfig) -> Result<Self> {
        config.validate()?;
        let logos = HttpLogoSource::new(&config.fetch)?;
        Ok(Self {
            config,
            logos: Arc::new(logos),
        })
    }

    /// Creates a renderer with a custom logo source.
    pub fn with_logo_source(config: RendererConfig, logos: Arc<dyn LogoSource>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, logos })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Renders a black-on-white PNG with a border and no logo.
    pub fn render_plain(&self, target_url: &str, size_px: u32) -> Result<RenderResult> {
        self.render(&RenderRequest::new(target_url, size_px))
    }

    /// Validates wire settings, then renders them.
    pub fn render_settings(&self, settings: RenderRequestSettings) -> Result<RenderResult> {
        let request = settings.into_request()?;
        self.render(&request)
    }

    /// Runs the full pipeline for one request.
    ///
    /// The first failing stage's error is returned unchanged. A logo fetch
    /// blocks the calling thread for up to the configured timeout, so async
    /// callers must run this off the runtime's worker threads.
    #[tracing::instrument(
        skip_all,
        fields(
            size = request.size_px,
            format = %request.output_format,
            has_logo = request.logo_url.is_some(),
        )
    )]
    pub fn render(&self, request: &RenderRequest) -> Result<RenderResult> {
        let mut stage = RenderStage::Validating;
        let outcome = self.run(request, &mut stage);
        match &outcome {
            Ok(result) => tracing::debug!(bytes = result.bytes.len(), "render done"),
            Err(err) => {
                tracing::warn!(%stage, class = ?err.class(), error = %err, "render failed");
                advance(&mut stage, RenderStage::Failed(err.class()));
            }
        }
        outcome
    }

    fn run(&self, request: &RenderRequest, stage: &mut RenderStage) -> Result<RenderResult> {
        let policy = &self.config.policy;

        request.validate()?;
        if request.size_px > policy.max_size_px {
            return Err(RenderError::invalid_input(format!(
                "size_px {} exceeds the limit of {}",
                request.size_px, policy.max_size_px
            )));
        }
        let logo = match request.logo_url.as_deref() {
            Some(raw) => Some((
                validate_logo_url(raw)?,
                LogoPlacement::for_canvas(
                    request.size_px,
                    policy.logo_divisor,
                    policy.corner_radius_divisor,
                )?,
            )),
            None => None,
        };
        let contrast = contrast_ratio(request.foreground, request.background);
        if contrast < LOW_CONTRAST_WARNING {
            tracing::warn!(contrast, "foreground and background are hard to tell apart");
        }

        advance(stage, RenderStage::Encoding);
        let matrix = encode_symbol(&request.target_url, policy.error_correction)?;

        advance(stage, RenderStage::Rasterizing);
        let options = RasterOptions {
            size: request.size_px,
            foreground: request.foreground,
            background: request.background,
            quiet_zone: if request.include_border {
                policy.quiet_zone_modules
            } else {
                0
            },
        };
        let mut buffer = rasterize(&matrix, &options)?;

        if let Some((url, placement)) = logo {
            advance(stage, RenderStage::FetchingLogo);
            let bytes = self.logos.fetch(&url)?;
            let decoded = decode_logo(&bytes)?;

            advance(stage, RenderStage::Compositing);
            buffer = embed_logo(buffer, &decoded, &placement);
        }

        advance(stage, RenderStage::EncodingOutput);
        let bytes = encode(buffer, request.output_format, policy.jpeg_quality)?;

        advance(stage, RenderStage::Done);
        Ok(RenderResult {
            bytes,
            format: request.output_format,
        })
    }
}

fn advance(stage: &mut RenderStage, next: RenderStage) {
    tracing::debug!(from = %stage, to = %next, "stage");
    *stage = next;
}
