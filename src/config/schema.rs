//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the adapter.
//! Everything except the backend base URL has a default; the backend is
//! required and carried as a parsed [`Url`].

use std::net::SocketAddr;
use url::Url;

/// Backend login endpoint intercepted for the password grant.
pub const DEFAULT_LOGIN_PATH: &str = "/api/auth/login";

/// Root configuration for the adapter.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single upstream REST backend.
    pub backend: BackendConfig,

    /// Login endpoint translation settings.
    pub login: LoginConfig,

    /// Request limits applied to buffered bodies.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl AdapterConfig {
    /// Configuration for `base_url` with every other section defaulted.
    pub fn new(base_url: Url) -> Self {
        Self {
            listener: ListenerConfig::default(),
            backend: BackendConfig { base_url },
            login: LoginConfig::default(),
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:12345").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:12345".to_string(),
        }
    }
}

/// Backend configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL every request is forwarded under (e.g., "http://127.0.0.1:8080").
    pub base_url: Url,
}

/// Login translation configuration.
#[derive(Debug, Clone)]
pub struct LoginConfig {
    /// Exact request path treated as the login endpoint for POST.
    pub path: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Maximum caller body size buffered by a transformer, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines for development.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,

    /// Prometheus scrape listener; metrics export is off when `None`.
    pub metrics_address: Option<SocketAddr>,
}
