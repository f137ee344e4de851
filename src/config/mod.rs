//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line
//!     → loader.rs (clap parse)
//!     → validation.rs (semantic checks)
//!     → AdapterConfig (validated, immutable)
//!     → shared by value into the HTTP server state
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields except the backend URL have defaults
//! - Validation separates syntactic (clap) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, Cli, ConfigError};
pub use schema::AdapterConfig;
pub use schema::BackendConfig;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
