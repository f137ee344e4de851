//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, dispatch)
//!     → [transformers or plain forwarding]
//!     → request.rs (URI/Host rewrite, hop-by-hop strip)
//!     → forwarder.rs (backend call: streamed or captured)
//!     → response.rs (captured responses, verbatim relay)
//!     → Send to client
//! ```

pub mod forwarder;
pub mod request;
pub mod response;
pub mod server;

pub use forwarder::{ForwardError, Forwarder};
pub use response::CapturedResponse;
pub use server::HttpServer;
