//! Upstream request preparation.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the backend base URL
//! - Rewrite the Host header to the backend authority
//! - Strip hop-by-hop headers before forwarding
//!
//! # Design Decisions
//! - Base path and request path are joined with exactly one slash
//! - Base query and request query are joined with `&` when both exist
//! - Everything else (method, end-to-end headers, body) is untouched

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Uri};
use url::Url;

/// Headers that describe a single transport hop and are never forwarded.
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Error building the upstream URI.
#[derive(Debug, thiserror::Error)]
#[error("invalid upstream URI `{uri}`: {source}")]
pub struct UpstreamUriError {
    uri: String,
    #[source]
    source: axum::http::uri::InvalidUri,
}

/// Join two path fragments with exactly one slash between them.
pub fn join_path(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

/// Map a caller URI (path and query only) onto the backend base URL.
pub fn upstream_uri(base: &Url, uri: &Uri) -> Result<Uri, UpstreamUriError> {
    let mut target = format!("{}://{}", base.scheme(), authority(base));
    target.push_str(&join_path(base.path(), uri.path()));

    match (base.query().filter(|q| !q.is_empty()), uri.query().filter(|q| !q.is_empty())) {
        (Some(b), Some(q)) => {
            target.push('?');
            target.push_str(b);
            target.push('&');
            target.push_str(q);
        }
        (Some(q), None) | (None, Some(q)) => {
            target.push('?');
            target.push_str(q);
        }
        (None, None) => {}
    }

    target.parse().map_err(|source| UpstreamUriError {
        uri: target.clone(),
        source,
    })
}

/// `host[:port]` of the backend, as sent in the Host header.
pub fn authority(base: &Url) -> String {
    let host = base.host_str().unwrap_or_default();
    match base.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

/// Prepare caller headers for the backend: hop-by-hop removed, Host rewritten.
pub fn upstream_headers(base: &Url, headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();
    strip_hop_by_hop(&mut headers);
    if let Ok(host) = HeaderValue::from_str(&authority(base)) {
        headers.insert(header::HOST, host);
    }
    headers
}
