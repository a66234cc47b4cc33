//! Logo retrieval against a local HTTP server.

use std::io::Cursor;
use std::thread;
use std::time::{Duration, Instant};

use image::{ImageFormat, Rgba, RgbaImage};
use linkcode_renderer::logo::validate_logo_url;
use linkcode_renderer::{
    FailureClass, FetchConfig, HttpLogoSource, LogoSource, QrRenderer, RenderError, RenderRequest,
    RendererConfig,
};
use tiny_http::{Header, Response, Server, StatusCode};

fn logo_png() -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(32, 32, Rgba([0, 128, 255, 255]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Starts a server on an ephemeral port and returns its base URL.
fn start_server() -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    thread::spawn(move || {
        for request in server.incoming_requests() {
            thread::spawn(move || {
                let png: Header = "Content-Type: image/png".parse().unwrap();
                let _ = match request.url() {
                    "/logo.png" => request.respond(Response::from_data(logo_png()).with_header(png)),
                    "/slow.png" => {
                        thread::sleep(Duration::from_millis(1500));
                        request.respond(Response::from_data(logo_png()).with_header(png))
                    }
                    // Under tiny_http's chunking threshold, so Content-Length is sent.
                    "/sized.png" => request.respond(Response::from_data(vec![0u8; 20 * 1024])),
                    // No length given: the body is streamed chunked.
                    "/stream.png" => request.respond(Response::new(
                        StatusCode(200),
                        vec![],
                        Cursor::new(vec![0u8; 64 * 1024]),
                        None,
                        None,
                    )),
                    "/stream-logo.png" => request.respond(Response::new(
                        StatusCode(200),
                        vec![png],
                        Cursor::new(logo_png()),
                        None,
                        None,
                    )),
                    "/page.html" => request.respond(Response::from_string("<html></html>")),
                    _ => request.respond(Response::from_string("missing").with_status_code(404)),
                };
            });
        }
    });

    format!("http://127.0.0.1:{port}")
}

fn fetch_config() -> FetchConfig {
    FetchConfig {
        timeout_ms: 300,
        max_logo_bytes: 16 * 1024,
        ..FetchConfig::default()
    }
}

fn fetch(url: &str) -> Result<Vec<u8>, RenderError> {
    let source = HttpLogoSource::new(&fetch_config()).unwrap();
    source.fetch(&validate_logo_url(url).unwrap())
}

#[test]
fn fetches_logo_bytes() {
    let base = start_server();
    let bytes = fetch(&format!("{base}/logo.png")).unwrap();
    assert_eq!(bytes, logo_png());
}

#[test]
fn non_success_status_fails() {
    let base = start_server();
    let err = fetch(&format!("{base}/nope.png")).unwrap_err();
    assert!(matches!(err, RenderError::LogoFetchFailed(_)), "{err}");
    assert_eq!(err.class(), FailureClass::Upstream);
}

#[test]
fn slow_host_times_out() {
    let base = start_server();
    let started = Instant::now();
    let err = fetch(&format!("{base}/slow.png")).unwrap_err();
    assert!(matches!(err, RenderError::LogoFetchFailed(_)), "{err}");
    assert!(started.elapsed() < Duration::from_millis(1400));
}

#[test]
fn declared_length_over_limit_is_rejected_up_front() {
    let base = start_server();
    let err = fetch(&format!("{base}/sized.png")).unwrap_err();
    assert!(matches!(err, RenderError::LogoFetchFailed(_)), "{err}");
    assert!(err.to_string().contains("20480 bytes"), "{err}");
}

#[test]
fn chunked_body_over_limit_is_cut_off() {
    let base = start_server();
    let err = fetch(&format!("{base}/stream.png")).unwrap_err();
    assert!(matches!(err, RenderError::LogoFetchFailed(_)), "{err}");
    assert!(err.to_string().contains("exceeds 16384 bytes"), "{err}");
}

#[test]
fn chunked_body_under_limit_is_read_whole() {
    let base = start_server();
    let bytes = fetch(&format!("{base}/stream-logo.png")).unwrap();
    assert_eq!(bytes, logo_png());
}

#[test]
fn unreachable_host_fails() {
    // Bind and drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = fetch(&format!("http://127.0.0.1:{port}/logo.png")).unwrap_err();
    assert!(matches!(err, RenderError::LogoFetchFailed(_)), "{err}");
}

fn renderer() -> QrRenderer {
    QrRenderer::new(RendererConfig {
        fetch: fetch_config(),
        ..RendererConfig::default()
    })
    .unwrap()
}

#[test]
fn render_embeds_fetched_logo() {
    let base = start_server();
    let request =
        RenderRequest::new("https://example.com", 256).with_logo(format!("{base}/logo.png"));

    let result = renderer().render(&request).unwrap();
    let img = image::load_from_memory(result.bytes()).unwrap().to_rgba8();

    assert_eq!(img.dimensions(), (256, 256));
    assert_eq!(img.get_pixel(128, 128).0, [0, 128, 255, 255]);
}

#[test]
fn render_with_html_logo_is_decode_failure() {
    let base = start_server();
    let request =
        RenderRequest::new("https://example.com", 256).with_logo(format!("{base}/page.html"));

    let err = renderer().render(&request).unwrap_err();
    assert!(matches!(err, RenderError::LogoDecodeFailed(_)), "{err}");
}

#[test]
fn render_with_missing_logo_does_not_fall_back() {
    let base = start_server();
    let request =
        RenderRequest::new("https://example.com", 256).with_logo(format!("{base}/gone.png"));

    let err = renderer().render(&request).unwrap_err();
    assert!(matches!(err, RenderError::LogoFetchFailed(_)), "{err}");
}
