//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered rule lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: Upsert, Login or PassThrough
//! ```
//!
//! # Design Decisions
//! - Rules built at startup, immutable at runtime
//! - Deterministic: same input always selects the same route
//! - The body is never read while routing

pub mod matcher;
pub mod router;

pub use router::{Dispatcher, Route};
