// Ask endpoint handler

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use std::error::Error as StdError;

use super::types::{AskRequest, AskResponse};
use crate::config::AppState;
use crate::http;
use crate::logger;

type BoxError = Box<dyn StdError + Send + Sync>;

/// `POST /api/ask`: validate the question and return the assistant's answer
pub async fn handle_ask<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let max_body_size = state.config.http.max_body_size;

    if let Some(resp) = check_declared_length(&req, max_body_size) {
        return resp;
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let whole_body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_warning(&format!(
                "Request body exceeded {max_body_size} bytes on /api/ask"
            ));
            return http::build_413_response();
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return http::error_response(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    let ask: AskRequest = match serde_json::from_slice(&whole_body) {
        Ok(r) => r,
        Err(e) => {
            return http::error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON: {e}"));
        }
    };

    match state.assistant.ask(ask.question.as_deref()).await {
        Ok(response) => http::json_response(StatusCode::OK, &AskResponse { response }),
        Err(e) => http::error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

/// Reject a declared Content-Length over the limit before reading the body
fn check_declared_length<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let size = req
        .headers()
        .get(hyper::header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()?;

    if size > max_body_size {
        logger::log_warning(&format!(
            "Request body too large: {size} bytes (max: {max_body_size})"
        ));
        return Some(http::build_413_response());
    }
    None
}
