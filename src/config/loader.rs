//! Configuration loading from the command line.

use clap::Parser;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{
    AdapterConfig, BackendConfig, LimitsConfig, ListenerConfig, LogFormat, LoginConfig,
    ObservabilityConfig, DEFAULT_LOGIN_PATH,
};
use crate::config::validation::{validate_backend_url, validate_settings, ValidationError};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "rest-adapter")]
#[command(about = "HTTP adapter translating PUT updates and password-grant logins for a REST backend", long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:12345")]
    pub laddr: String,

    /// Backend API base URL (e.g. http://127.0.0.1:8080)
    #[arg(long)]
    pub taddr: String,

    /// Path of the backend login endpoint
    #[arg(long, default_value = DEFAULT_LOGIN_PATH)]
    pub login_path: String,

    /// Largest caller body buffered for translation, in bytes
    #[arg(long, default_value_t = 2 * 1024 * 1024)]
    pub max_body_bytes: usize,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    pub metrics_address: Option<SocketAddr>,
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate parsed arguments into the immutable adapter configuration.
pub fn load_config(cli: Cli) -> Result<AdapterConfig, ConfigError> {
    let mut errors = Vec::new();

    let base_url = match validate_backend_url(&cli.taddr) {
        Ok(url) => Some(url),
        Err(e) => {
            errors.push(e);
            None
        }
    };
    if let Err(mut more) = validate_settings(&cli.laddr, &cli.login_path, cli.max_body_bytes) {
        errors.append(&mut more);
    }

    match base_url {
        Some(base_url) if errors.is_empty() => Ok(AdapterConfig {
            listener: ListenerConfig {
                bind_address: cli.laddr,
            },
            backend: BackendConfig { base_url },
            login: LoginConfig {
                path: cli.login_path,
            },
            limits: LimitsConfig {
                max_body_bytes: cli.max_body_bytes,
            },
            observability: ObservabilityConfig {
                log_format: cli.log_format,
                metrics_address: cli.metrics_address,
            },
        }),
        _ => Err(ConfigError::Validation(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rest-adapter").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--taddr", "http://127.0.0.1:8080"]).unwrap();
        let config = load_config(cli).unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:12345");
        assert_eq!(config.login.path, "/api/auth/login");
        assert_eq!(config.limits.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert!(config.observability.metrics_address.is_none());
        assert_eq!(config.backend.base_url.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_backend_is_required() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_invalid_backend_is_fatal() {
        let cli = parse(&["--taddr", "::not-a-url::"]).unwrap();
        let err = load_config(cli).unwrap_err();
        let ConfigError::Validation(errors) = err;
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::BackendUrl { .. }));
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&[
            "--laddr",
            "127.0.0.1:9000",
            "--taddr",
            "http://backend:8080",
            "--login-path",
            "/auth",
            "--log-format",
            "json",
            "--metrics-address",
            "127.0.0.1:9100",
        ])
        .unwrap();
        let config = load_config(cli).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.login.path, "/auth");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(
            config.observability.metrics_address,
            Some("127.0.0.1:9100".parse().unwrap())
        );
    }
}
