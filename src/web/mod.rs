//! Embedded web dashboard.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with area/occupancy filters, KPIs, four charts,
//!   and the insights panel
//! - JSON API endpoints for the dashboard refresh, areas, insights, config,
//!   and health
//!
//! Launched via `campus-energy serve` (default: `http://127.0.0.1:8501`).

mod api;
mod frontend;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::DashboardConfig;
use crate::data::Dataset;

/// Everything a request handler may read. Built once at startup and never
/// mutated, so every request is an independent evaluation.
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub dataset: Dataset,
    pub config: DashboardConfig,
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on `ctx.config.web.addr`.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user dashboard). Errors are answered per request without
/// stopping the server.
pub fn serve(ctx: &ServerContext) -> Result<()> {
    let addr = ctx.config.web.addr.as_str();
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("campus energy dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if ctx.config.web.open_browser {
        // Best-effort
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let response = match dispatch(ctx, &method, &url, body.as_deref()) {
            Ok(resp) => resp,
            Err(e) => error_response(500, &format!("{e:#}")),
        };
        let status = response.status_code().0;
        let _ = request.respond(response);

        // Brief access log
        println!(
            "{} {} {} {}",
            chrono::Local::now().format("%H:%M:%S"),
            method,
            url,
            status
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    ctx: &ServerContext,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API: Dashboard
        (&Method::Get, "/api/areas") => api::get_areas(ctx),
        (&Method::Get, "/api/dashboard") => api::get_dashboard(ctx),
        (&Method::Post, "/api/dashboard") => api::post_dashboard(ctx, body.unwrap_or("{}")),
        (&Method::Get, "/api/insights") => api::get_insights(),

        // API: Configuration
        (&Method::Get, "/api/config") => api::get_config(),
        (&Method::Put, "/api/config") => api::put_config(body.unwrap_or("{}")),
        (&Method::Post, "/api/config/reset") => api::post_config_reset(),

        // API: Health
        (&Method::Get, "/api/health") => api::get_health(ctx),

        _ => Ok(error_response(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// JSON `{"error": ...}` response with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    header("Content-Type", "application/json; charset=utf-8")
}

/// HTML content type header.
fn content_type_html() -> Header {
    header("Content-Type", "text/html; charset=utf-8")
}

fn header(name: &'static str, value: &'static str) -> Header {
    Header::from_bytes(name, value).expect("static header is valid ASCII")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
