//! Translation errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::forwarder::ForwardError;
use crate::http::response::CapturedResponse;
use crate::transform::login::CredentialError;

/// Why a transformer stopped before completing its exchange.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read the request body: {0}")]
    ReadBody(#[source] axum::Error),

    #[error("request path `{0}` does not address a single resource")]
    NotAResource(String),

    #[error("failed to parse the resource model for its `id` field: {0}")]
    ResourceModel(#[source] serde_json::Error),

    #[error("failed to parse the request body as a JSON object: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("failed to rewrite the request path: {0}")]
    Rewrite(#[from] axum::http::uri::InvalidUri),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("failed to parse the token response: {0}")]
    TokenResponse(#[source] serde_json::Error),

    #[error("failed to encode the outgoing body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Non-2xx answer to an internal request, relayed as is.
    #[error("backend answered {}", .0.status)]
    Upstream(CapturedResponse),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl TransformError {
    /// Status the caller receives for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            TransformError::Upstream(captured) => captured.status,
            TransformError::Forward(_) => StatusCode::BAD_GATEWAY,
            TransformError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for TransformError {
    fn into_response(self) -> Response {
        match self {
            TransformError::Upstream(captured) => captured.into_response(),
            TransformError::Forward(_) => {
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
            other => (other.status(), other.to_string()).into_response(),
        }
    }
}
