use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use linkcode_renderer::{QrRenderer, RenderRequestSettings, RendererConfig};
use tracing_subscriber::EnvFilter;

/// Render a QR code for a URL to an image file.
#[derive(Parser, Debug)]
#[command(name = "linkcode", version)]
struct Cli {
    /// URL to encode.
    target_url: String,

    /// Output edge length in pixels.
    #[arg(long)]
    size: i64,

    /// Dark module color as #RRGGBB.
    #[arg(long, default_value = "#000000")]
    fg: String,

    /// Background color as #RRGGBB.
    #[arg(long, default_value = "#ffffff")]
    bg: String,

    /// http(s) URL of a logo to embed at the center.
    #[arg(long)]
    logo: Option<String>,

    /// png or jpeg.
    #[arg(long, default_value = "png")]
    format: String,

    /// Omit the quiet-zone border.
    #[arg(long)]
    no_border: bool,

    /// JSON renderer config overriding policy and fetch defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            RendererConfig::from_json(&json)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => RendererConfig::default(),
    };

    let renderer = QrRenderer::new(config).context("build renderer")?;

    let settings = RenderRequestSettings {
        target_url: cli.target_url,
        size_px: cli.size,
        logo_url: cli.logo,
        foreground_color: cli.fg,
        background_color: cli.bg,
        output_format: cli.format,
        include_border: !cli.no_border,
    };

    let result = renderer.render_settings(settings).context("render qr code")?;

    std::fs::write(&cli.out, result.bytes())
        .with_context(|| format!("write {}", cli.out.display()))?;

    eprintln!(
        "wrote {} ({}, {} bytes)",
        cli.out.display(),
        result.content_type(),
        result.bytes().len()
    );
    Ok(())
}
