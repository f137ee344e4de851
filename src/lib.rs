//! REST backend adapter library.
//!
//! Sits in front of a REST backend and passes traffic through unchanged,
//! except for two translated exchanges:
//! - `PUT <collection>/<id>` becomes `GET` for the resource id, then `POST <collection>`
//! - the form-encoded password-grant login becomes the backend's JSON login

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;
pub mod transform;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::AdapterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
