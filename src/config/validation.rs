//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap handles syntactic)
//! - Check the backend URL is usable as a forwarding target
//! - Validate value ranges (body limit > 0, login path absolute)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Every error is fatal at startup

use thiserror::Error;
use url::Url;

/// A single semantic defect in the startup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend URL `{input}` is invalid: {reason}")]
    BackendUrl { input: String, reason: String },

    #[error("backend URL `{0}` must use the http scheme")]
    BackendScheme(String),

    #[error("backend URL `{0}` has no host")]
    BackendHost(String),

    #[error("login path `{0}` must start with `/`")]
    LoginPath(String),

    #[error("listen address `{0}` is empty")]
    ListenAddress(String),

    #[error("max body size must be greater than zero")]
    MaxBodySize,
}

/// Parse and check the backend base URL.
pub fn validate_backend_url(input: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(input).map_err(|e| ValidationError::BackendUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" {
        return Err(ValidationError::BackendScheme(input.to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::BackendHost(input.to_string()));
    }

    Ok(url)
}

/// Validate the remaining startup values, collecting every defect.
pub fn validate_settings(
    bind_address: &str,
    login_path: &str,
    max_body_bytes: usize,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if bind_address.trim().is_empty() {
        errors.push(ValidationError::ListenAddress(bind_address.to_string()));
    }
    if !login_path.starts_with('/') {
        errors.push(ValidationError::LoginPath(login_path.to_string()));
    }
    if max_body_bytes == 0 {
        errors.push(ValidationError::MaxBodySize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_url_accepted() {
        let url = validate_backend_url("http://127.0.0.1:8080/base").unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(8080));
        assert_eq!(url.path(), "/base");
    }

    #[test]
    fn test_backend_url_rejected() {
        assert!(matches!(
            validate_backend_url("not a url"),
            Err(ValidationError::BackendUrl { .. })
        ));
        assert!(matches!(
            validate_backend_url(""),
            Err(ValidationError::BackendUrl { .. })
        ));
        assert_eq!(
            validate_backend_url("https://tb.example.com"),
            Err(ValidationError::BackendScheme("https://tb.example.com".into()))
        );
        assert!(validate_backend_url("mailto:ops@example.com").is_err());
    }

    #[test]
    fn test_settings_collects_all_errors() {
        let errors = validate_settings(" ", "api/auth/login", 0).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::MaxBodySize));
        assert!(validate_settings("0.0.0.0:12345", "/api/auth/login", 1).is_ok());
    }
}
