//! Backend forwarding.
//!
//! # Responsibilities
//! - Send a request to the backend and stream its response back (`forward`)
//! - Send a request and buffer the whole response for inspection (`capture`)
//!
//! # Design Decisions
//! - One pooled hyper client shared by every request
//! - No retries and no timeout beyond the transport's own
//! - Dropping the returned future cancels the in-flight backend call

use axum::{
    body::Body,
    http::{Request, Response, Version},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::http::request::{strip_hop_by_hop, upstream_headers, upstream_uri, UpstreamUriError};
use crate::http::response::CapturedResponse;

/// Errors talking to the backend.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error(transparent)]
    Uri(#[from] UpstreamUriError),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream response body: {0}")]
    Body(#[from] axum::Error),
}

/// Single-backend reverse-proxy primitive.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    base_url: Arc<Url>,
}

impl Forwarder {
    /// Create a forwarder targeting `base_url`.
    pub fn new(base_url: Url) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            base_url: Arc::new(base_url),
        }
    }

    /// Forward `request` and hand the backend response back unbuffered.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ForwardError> {
        let request = self.prepare(request)?;
        let response: Response<Incoming> = self.client.request(request).await?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }

    /// Forward `request` and buffer the complete backend response.
    pub async fn capture(&self, request: Request<Body>) -> Result<CapturedResponse, ForwardError> {
        let request = self.prepare(request)?;
        let response = self.client.request(request).await?;

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), usize::MAX).await?;
        Ok(CapturedResponse::new(parts.status, parts.headers, body))
    }

    fn prepare(&self, request: Request<Body>) -> Result<Request<Body>, ForwardError> {
        let (mut parts, body) = request.into_parts();
        parts.uri = upstream_uri(&self.base_url, &parts.uri)?;
        parts.headers = upstream_headers(&self.base_url, &parts.headers);
        // The pooled connector speaks HTTP/1.1 to the backend.
        parts.version = Version::HTTP_11;
        Ok(Request::from_parts(parts, body))
    }
}
