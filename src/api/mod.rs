// API module entry
// Routes assistant HTTP requests and writes the access log

mod frontend;
mod handlers;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{AppState, HttpConfig};
use crate::http;
use crate::logger::{self, AccessLogEntry};

const ASK_PATH: &str = "/api/ask";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let mut response = respond_within_deadline(req, &state).await;
    apply_common_headers(&mut response, &state.config.http);

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Run the route under `performance.write_timeout`; 0 disables the deadline
async fn respond_within_deadline<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let limit = state.config.performance.write_timeout;
    if limit == 0 {
        return route(req, state).await;
    }

    let path = req.uri().path().to_string();
    match tokio::time::timeout(Duration::from_secs(limit), route(req, state)).await {
        Ok(response) => response,
        Err(_) => {
            logger::log_warning(&format!("Request to {path} exceeded {limit}s, aborted"));
            http::error_response(StatusCode::SERVICE_UNAVAILABLE, "Request timed out")
        }
    }
}

/// Dispatch on method and path
async fn route<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    if method == Method::OPTIONS {
        return http::build_options_response(state.config.http.enable_cors);
    }

    match (method, path.as_str()) {
        (Method::POST, ASK_PATH) => handlers::handle_ask(req, state).await,
        (_, ASK_PATH) => {
            logger::log_debug(&format!("Method not allowed on {ASK_PATH}: {}", req.method()));
            http::build_405_response("POST, OPTIONS")
        }
        (Method::GET | Method::HEAD, "/" | "/index.html") => frontend::serve_page(is_head),
        (Method::GET | Method::HEAD, p) if p == state.config.http.health_path => {
            http::build_health_response()
        }
        _ => http::build_404_response(&state.config.http.health_path),
    }
}

fn apply_common_headers(response: &mut Response<Full<Bytes>>, http_config: &HttpConfig) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&http_config.server_name) {
        headers.insert(SERVER, value);
    }
    if http_config.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}
