//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of characters of a body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Content types whose bodies are logged as text. Everything else, e.g.
/// multipart uploads, receipts and CSV files, is logged by length only.
const TEXT_CONTENT_TYPES: [&str; 4] = [
    "text/html",
    "text/plain",
    "application/json",
    "application/x-www-form-urlencoded",
];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &body_bytes);

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_text(headers: &HeaderMap) -> bool {
    match headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()) {
        Some(content_type) => TEXT_CONTENT_TYPES
            .iter()
            .any(|text_type| content_type.starts_with(text_type)),
        None => true,
    }
}

/// The text to log for a body and, if it was cut short, the full text.
fn describe_body(headers: &HeaderMap, body: &Bytes) -> (String, Option<String>) {
    if !is_text(headers) {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        return (format!("<{} bytes of {content_type}>", body.len()), None);
    }

    let text = String::from_utf8_lossy(body);

    match text.char_indices().nth(LOG_BODY_LENGTH_LIMIT) {
        Some((end, _)) => (format!("{}...", &text[..end]), Some(text.into_owned())),
        None => (format!("{text:?}"), None),
    }
}

fn log_request(parts: &axum::http::request::Parts, body: &Bytes) {
    let (summary, full) = describe_body(&parts.headers, body);

    tracing::info!("Received request: {parts:#?}\nbody: {summary}");

    if let Some(full) = full {
        tracing::debug!("Full request body: {full:?}");
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &Bytes) {
    let (summary, full) = describe_body(&parts.headers, body);

    tracing::info!("Sending response: {parts:#?}\nbody: {summary}");

    if let Some(full) = full {
        tracing::debug!("Full response body: {full:?}");
    }
}
