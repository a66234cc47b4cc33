//! Logo URL validation, retrieval and decoding.
//!
//! Validation always runs before any network access: only absolute
//! `http`/`https` URLs with a host are ever handed to a [`LogoSource`].

use std::io::Read;
use std::time::Duration;

use image::RgbaImage;
use reqwest::blocking::Client;
use url::Url;

use crate::config::FetchConfig;
use crate::error::{RenderError, Result};

/// Parses and checks a caller-supplied logo URL.
///
/// Rejects unparsable input, hostless URLs, and every scheme other than
/// `http` and `https` with [`RenderError::UnsupportedLogoScheme`].
pub fn validate_logo_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| RenderError::unsupported_logo_scheme(format!("{raw:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(RenderError::unsupported_logo_scheme(format!(
            "scheme {:?} is not http or https",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(RenderError::unsupported_logo_scheme(format!(
            "{raw:?} has no host"
        ))),
    }
}

/// Retrieves raw logo bytes for an already validated URL.
///
/// Implementations must bound the time they spend and return
/// [`RenderError::LogoFetchFailed`] on any transport or status failure.
pub trait LogoSource: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// [`LogoSource`] backed by a blocking HTTP client with a hard timeout.
#[derive(Debug, Clone)]
pub struct HttpLogoSource {
    client: Client,
    max_bytes: u64,
}

impl HttpLogoSource {
    /// Builds a client honoring the timeout, user agent and size limit in `config`.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                RenderError::logo_fetch_failed(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            max_bytes: config.max_logo_bytes,
        })
    }
}

impl LogoSource for HttpLogoSource {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| RenderError::logo_fetch_failed(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::logo_fetch_failed(format!(
                "GET {url} returned {status}"
            )));
        }

        if let Some(len) = response.content_length().filter(|&len| len > self.max_bytes) {
            return Err(RenderError::logo_fetch_failed(format!(
                "logo is {len} bytes, limit is {}",
                self.max_bytes
            )));
        }

        let mut body = Vec::new();
        response
            .take(self.max_bytes + 1)
            .read_to_end(&mut body)
            .map_err(|e| {
                RenderError::logo_fetch_failed(format!("failed to read body of {url}: {e}"))
            })?;

        if body.len() as u64 > self.max_bytes {
            return Err(RenderError::logo_fetch_failed(format!(
                "logo exceeds {} bytes",
                self.max_bytes
            )));
        }

        tracing::debug!(%url, bytes = body.len(), "fetched logo");
        Ok(body)
    }
}

/// Decodes logo bytes of any format the `image` crate can sniff.
pub fn decode_logo(bytes: &[u8]) -> Result<RgbaImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| RenderError::logo_decode_failed(e.to_string()))?;
    Ok(decoded.to_rgba8())
}
