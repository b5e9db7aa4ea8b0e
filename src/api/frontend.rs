// Front-end page - single form posting to /api/ask

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http;

const PAGE: &str = include_str!("frontend.html");

/// Serve the question form
pub fn serve_page(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(PAGE, is_head)
}
