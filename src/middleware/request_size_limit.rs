// src/middleware/request_size_limit.rs

use axum::{
    body::Body,
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Largest accepted request body. A groups document is a few KiB in practice.
pub const MAX_REQUEST_SIZE: usize = 1024 * 1024;

/// Rejects bodies whose declared length exceeds [`MAX_REQUEST_SIZE`].
pub async fn request_size_limit_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let method = request.method();
    if matches!(*method, Method::POST | Method::PUT | Method::PATCH) {
        let declared = request
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());

        if let Some(length) = declared.filter(|len| *len > MAX_REQUEST_SIZE) {
            warn!(
                content_length = length,
                max_size = MAX_REQUEST_SIZE,
                method = %method,
                "Request rejected: body size exceeds limit"
            );
            return Err(StatusCode::PAYLOAD_TOO_LARGE);
        }
    }

    Ok(next.run(request).await)
}
