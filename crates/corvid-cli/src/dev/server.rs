//! HTTP server for the public directory, with a status endpoint the
//! reload client polls.
//!
//! The same router backs `dev` and `serve`: the only difference is whether
//! a [`BuildCoordinator`] is attached. Without one the status endpoint
//! answers 404 and HTML is served untouched, so plain serving never smuggles
//! a dead reload script into the page.

use crate::dev::coordinator::BuildCoordinator;
use crate::error::{CliError, Result};
use axum::{
    extract::{Request, State},
    http::{header, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Route the reload client script is served from.
pub const RELOAD_SCRIPT_ROUTE: &str = "/__corvid_reload__.js";

/// Reload client, embedded at compile time.
const RELOAD_SCRIPT: &str = include_str!("../../assets/dev/reload-client.js");

/// Shared state behind every route.
#[derive(Clone)]
pub struct ServerState {
    /// Present in dev mode; absent for plain serving
    pub coordinator: Option<Arc<BuildCoordinator>>,
    /// Directory files are served from
    pub public_dir: PathBuf,
}

/// Payload of `GET /api/status`.
#[derive(Debug, Serialize)]
struct StatusSnapshot {
    building: bool,
    wasm_hash: Option<String>,
    timestamp: String,
}

/// Build the router with all routes and layers.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route(RELOAD_SCRIPT_ROUTE, get(handle_reload_script))
        .route("/api/status", get(handle_status))
        .fallback(handle_static)
        .layer(middleware::from_fn(apply_artifact_headers))
        .layer(
            // CORS: allow all origins for local dev
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and run the server until it errors or the task is dropped.
pub async fn serve(state: ServerState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    crate::ui::success(&format!("Serving at http://{}", addr));

    axum::serve(listener, app)
        .await
        .map_err(|e| CliError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Forbid caching of the wasm artifact so a reload always refetches it.
async fn apply_artifact_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let is_wasm = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/wasm"));

    if is_wasm {
        let headers = response.headers_mut();
        headers.insert(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        headers.insert(
            header::PRAGMA,
            header::HeaderValue::from_static("no-cache"),
        );
        headers.insert(header::EXPIRES, header::HeaderValue::from_static("0"));
    }

    response
}

/// Serve index.html, with the reload script injected in dev mode.
async fn handle_index(State(state): State<ServerState>) -> Response {
    let index = state.public_dir.join("index.html");

    match tokio::fs::read(&index).await {
        Ok(content) => {
            let body = if state.coordinator.is_some() {
                inject_reload_script(&content)
            } else {
                content
            };
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                body,
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::NOT_FOUND,
            format!("index.html not found in {}", state.public_dir.display()),
        )
            .into_response(),
    }
}

/// Serve the embedded reload client script.
async fn handle_reload_script() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        RELOAD_SCRIPT,
    )
}

/// Report build state and the published artifact fingerprint.
async fn handle_status(State(state): State<ServerState>) -> Response {
    match &state.coordinator {
        Some(coordinator) => Json(StatusSnapshot {
            building: coordinator.is_building(),
            wasm_hash: coordinator.fingerprint(),
            timestamp: Local::now().to_rfc3339(),
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve any other file from the public directory.
async fn handle_static(State(state): State<ServerState>, uri: Uri) -> Response {
    let rel = uri.path().trim_start_matches('/');

    // Keep requests inside the public directory
    if rel.split('/').any(|segment| segment == "..") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let file_path = state.public_dir.join(rel);
    match tokio::fs::read(&file_path).await {
        Ok(content) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type_for_path(rel)),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            content,
        )
            .into_response(),
        Err(_) => {
            (StatusCode::NOT_FOUND, format!("File not found: /{}", rel)).into_response()
        }
    }
}

/// Inject the reload client script tag into HTML.
///
/// Inserted before the closing `</body>` tag, or appended when the page has
/// none. Pages that already reference the script are left unchanged.
fn inject_reload_script(content: &[u8]) -> Vec<u8> {
    let html = String::from_utf8_lossy(content);
    let script_tag = format!(r#"<script src="{}"></script>"#, RELOAD_SCRIPT_ROUTE);

    if html.contains(RELOAD_SCRIPT_ROUTE) {
        return content.to_vec();
    }

    if let Some(pos) = html.rfind("</body>") {
        let mut result = String::with_capacity(html.len() + script_tag.len() + 10);
        result.push_str(&html[..pos]);
        result.push_str("\n  ");
        result.push_str(&script_tag);
        result.push('\n');
        result.push_str(&html[pos..]);
        return result.into_bytes();
    }

    let mut result = html.into_owned();
    result.push('\n');
    result.push_str(&script_tag);
    result.into_bytes()
}

/// Determine content type from file extension.
fn content_type_for_path(path: &str) -> &'static str {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "wasm" => "application/wasm",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "map" => "application/json",
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_reload_script_before_body_close() {
        let html = b"<html><body><h1>App</h1></body></html>";
        let result = String::from_utf8(inject_reload_script(html)).unwrap();

        let script_pos = result.find(RELOAD_SCRIPT_ROUTE).unwrap();
        let body_pos = result.find("</body>").unwrap();
        assert!(script_pos < body_pos);
    }

    #[test]
    fn test_inject_reload_script_without_body_appends() {
        let html = b"<html><h1>App</h1></html>";
        let result = String::from_utf8(inject_reload_script(html)).unwrap();
        assert!(result.contains(RELOAD_SCRIPT_ROUTE));
    }

    #[test]
    fn test_inject_reload_script_is_idempotent() {
        let html = b"<html><body></body></html>";
        let once = inject_reload_script(html);
        let twice = inject_reload_script(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for_path("App-v2.wasm"), "application/wasm");
        assert_eq!(content_type_for_path("index.js"), "application/javascript");
        assert_eq!(content_type_for_path("style.css"), "text/css");
        assert_eq!(content_type_for_path("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for_path("unknown.bin"), "application/octet-stream");
    }

    #[test]
    fn test_reload_script_polls_status_endpoint() {
        assert!(RELOAD_SCRIPT.contains("/api/status"));
        assert!(RELOAD_SCRIPT.contains("wasm_hash"));
    }
}
