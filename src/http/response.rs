//! Captured responses.
//!
//! # Responsibilities
//! - Hold a fully buffered backend response (status, headers, body)
//! - Classify success (2xx) for the translation layer
//! - Relay a captured response to the caller verbatim
//!
//! # Design Decisions
//! - Bodies are buffered completely, never truncated
//! - Relay keeps status, body and Content-Type; other headers belong to
//!   the internal exchange, not to the caller's

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

/// In-memory record of a backend response issued on the adapter's behalf.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CapturedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Whether the status is in the 2xx class.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl IntoResponse for CapturedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.headers.get(header::CONTENT_TYPE) {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type.clone());
        }
        response
    }
}
