//! PUT → GET + POST translation.
//!
//! The backend has no update verb; it upserts on `POST <collection>` when the
//! payload carries the resource's `id`. A caller's `PUT <collection>/<id>`
//! is served by fetching the current resource, copying its `id` into the
//! caller's payload and posting the result to the collection.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, Request, Response, Uri},
};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde_json::value::RawValue;

use crate::http::forwarder::Forwarder;
use crate::transform::error::TransformError;

/// Name of the identifier member in resources and payloads.
pub const ID_FIELD: &str = "id";

/// JSON object with top-level members kept as raw JSON in their original order.
type Payload = IndexMap<String, Box<RawValue>>;

/// Update-merge transformer.
#[derive(Clone)]
pub struct UpsertTransformer {
    forwarder: Forwarder,
    max_body_bytes: usize,
}

impl UpsertTransformer {
    pub fn new(forwarder: Forwarder, max_body_bytes: usize) -> Self {
        Self {
            forwarder,
            max_body_bytes,
        }
    }

    /// Serve a PUT by fetching the resource id and posting the merged payload.
    pub async fn handle(&self, request: Request<Body>) -> Result<Response<Body>, TransformError> {
        let path = request.uri().path().to_string();
        let collection = collection_path(&path)
            .ok_or_else(|| TransformError::NotAResource(path.clone()))?
            .to_string();

        let (mut parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(TransformError::ReadBody)?;

        let mut fetch = Request::new(Body::empty());
        *fetch.method_mut() = Method::GET;
        *fetch.uri_mut() = parts.uri.clone();
        *fetch.headers_mut() = without_body_framing(&parts.headers);

        let fetched = self.forwarder.capture(fetch).await?;
        if !fetched.is_success() {
            tracing::debug!(path = %path, status = %fetched.status, "Resource fetch rejected by backend");
            return Err(TransformError::Upstream(fetched));
        }

        let payload = merge_identifier(&fetched.body, &body)?;
        tracing::debug!(path = %path, collection = %collection, "Posting merged payload");

        parts.method = Method::POST;
        parts.uri = with_path(&parts.uri, &collection)?;
        parts.headers.remove(header::TRANSFER_ENCODING);
        parts
            .headers
            .insert(header::CONTENT_LENGTH, HeaderValue::from(payload.len()));

        let response = self
            .forwarder
            .forward(Request::from_parts(parts, Body::from(payload)))
            .await?;
        Ok(response)
    }
}

/// Collection path for a single-resource path: `/a/b/<id>` → `/a/b`.
///
/// `None` unless the path has at least two non-empty segments and no
/// trailing slash.
pub fn collection_path(path: &str) -> Option<&str> {
    let segments = path.strip_prefix('/')?;
    if segments.split('/').any(str::is_empty) || segments.split('/').count() < 2 {
        return None;
    }
    path.rsplit_once('/').map(|(parent, _)| parent)
}

/// Copy the fetched resource's `id` into the caller payload and re-encode it.
///
/// The `id` is carried as raw JSON text and every other member keeps its
/// original text and position.
pub fn merge_identifier(resource: &[u8], payload: &[u8]) -> Result<Bytes, TransformError> {
    let id = resource_identifier(resource)?;
    let mut payload: Payload =
        serde_json::from_slice(payload).map_err(TransformError::Payload)?;

    payload.insert(ID_FIELD.to_string(), id);

    serde_json::to_vec(&payload)
        .map(Bytes::from)
        .map_err(TransformError::Encode)
}

/// Raw `id` member of a fetched resource, which must be a JSON object.
fn resource_identifier(resource: &[u8]) -> Result<Box<RawValue>, TransformError> {
    let mut model: Payload =
        serde_json::from_slice(resource).map_err(TransformError::ResourceModel)?;
    model
        .swap_remove(ID_FIELD)
        .ok_or_else(|| TransformError::ResourceModel(serde_json::Error::missing_field(ID_FIELD)))
}

fn without_body_framing(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::TRANSFER_ENCODING);
    headers
}

fn with_path(uri: &Uri, path: &str) -> Result<Uri, TransformError> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    let uri: Uri = path_and_query.parse()?;
    Ok(uri)
}
