//! Password-grant login translation.
//!
//! Callers send the OAuth2 form (`username=..&password=..`); the backend wants
//! `{"username": .., "password": ..}` and answers `{"token", "refreshToken"}`,
//! which is handed back as `{"access_token", "refresh_token"}`.

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, Response},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

use crate::http::forwarder::Forwarder;
use crate::transform::error::TransformError;

const USERNAME: &str = "username";
const PASSWORD: &str = "password";

/// Defect in the caller's credential form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("failed to parse the request body as url encoded value: {0}")]
    Malformed(String),

    #[error("failed to identify `{0}` in the request: field is missing")]
    Missing(&'static str),

    #[error("failed to identify `{0}` in the request: field is given more than once")]
    Duplicate(&'static str),

    #[error("failed to identify `{0}` in the request: field is empty")]
    Empty(&'static str),
}

/// Credential pair in the backend's login schema.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Extract the credential pair from an url-encoded form body.
    pub fn from_form(body: &[u8]) -> Result<Self, CredentialError> {
        let text = std::str::from_utf8(body)
            .map_err(|e| CredentialError::Malformed(format!("invalid UTF-8: {}", e)))?;
        check_escapes(text)?;

        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(text.as_bytes())
            .into_owned()
            .collect();

        Ok(Self {
            username: single_value(&pairs, USERNAME)?,
            password: single_value(&pairs, PASSWORD)?,
        })
    }

    /// Encode as the backend expects: `{"username": "..", "password": ".."}`.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
        self.serialize(&mut ser)?;
        Ok(out)
    }
}

/// Compact JSON with a space after every `:` and `,` between members.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Every `%` must start a two-digit hex escape.
fn check_escapes(text: &str) -> Result<(), CredentialError> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Err(CredentialError::Malformed(format!(
                    "invalid URL escape {:?}",
                    String::from_utf8_lossy(&bytes[i..end])
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

fn single_value(pairs: &[(String, String)], field: &'static str) -> Result<String, CredentialError> {
    let mut values = pairs.iter().filter(|(k, _)| k == field).map(|(_, v)| v);
    let value = values.next().ok_or(CredentialError::Missing(field))?;
    if values.next().is_some() {
        return Err(CredentialError::Duplicate(field));
    }
    if value.is_empty() {
        return Err(CredentialError::Empty(field));
    }
    Ok(value.clone())
}

/// Backend token response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendTokens {
    pub token: String,
    pub refresh_token: String,
}

/// OAuth2 token response returned to the caller.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<BackendTokens> for TokenResponse {
    fn from(tokens: BackendTokens) -> Self {
        Self {
            access_token: tokens.token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Login transformer.
#[derive(Clone)]
pub struct LoginTransformer {
    forwarder: Forwarder,
    max_body_bytes: usize,
}

impl LoginTransformer {
    pub fn new(forwarder: Forwarder, max_body_bytes: usize) -> Self {
        Self {
            forwarder,
            max_body_bytes,
        }
    }

    /// Exchange form credentials for backend tokens in OAuth2 shape.
    pub async fn handle(&self, request: Request<Body>) -> Result<Response<Body>, TransformError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(TransformError::ReadBody)?;

        let credentials = Credentials::from_form(&body)?;
        let payload = credentials.to_json().map_err(TransformError::Encode)?;
        tracing::debug!(username = %credentials.username, "Exchanging credentials with backend");

        let content_length = HeaderValue::from(payload.len());
        let mut exchange = Request::new(Body::from(payload));
        *exchange.method_mut() = Method::POST;
        *exchange.uri_mut() = parts.uri;
        let headers = exchange.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::CONTENT_LENGTH, content_length);

        let captured = self.forwarder.capture(exchange).await?;
        if !captured.is_success() {
            tracing::debug!(username = %credentials.username, status = %captured.status, "Login rejected by backend");
            return Err(TransformError::Upstream(captured));
        }

        let tokens = reshape_tokens(&captured.body)?;
        Ok((
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            tokens,
        )
            .into_response())
    }
}

/// Decode the backend token body and re-encode it in OAuth2 field names.
pub fn reshape_tokens(body: &[u8]) -> Result<Vec<u8>, TransformError> {
    let tokens: BackendTokens =
        serde_json::from_slice(body).map_err(TransformError::TokenResponse)?;
    serde_json::to_vec(&TokenResponse::from(tokens)).map_err(TransformError::Encode)
}
