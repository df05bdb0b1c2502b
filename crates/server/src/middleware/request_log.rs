//! # Request Logging
//!
//! Assigns every request an id (reusing a well-formed `x-request-id` from the
//! caller), runs the request inside a span carrying it, echoes it back and
//! logs the outcome.

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use logging::{RequestId, REQUEST_ID_HEADER};
use tracing::Instrument;

pub async fn request_log_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(RequestId::from_header)
        .unwrap_or_default();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    logging::log_api_request!(
        request_id,
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_millis()
    );

    response
}
