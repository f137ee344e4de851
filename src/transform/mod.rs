//! Request/response translation layer.
//!
//! # Data Flow
//! ```text
//! PUT <collection>/<id>
//!     → upsert.rs: GET <collection>/<id> (captured)
//!     → merge fetched `id` into caller payload
//!     → POST <collection> (streamed to caller)
//!
//! POST <login path> (form)
//!     → login.rs: POST <login path> as JSON (captured)
//!     → token/refreshToken → access_token/refresh_token
//! ```
//!
//! # Design Decisions
//! - Internal requests are awaited in full before deciding the response
//! - A non-2xx internal answer is relayed, never wrapped
//! - Either the whole translation completes or nothing is written upstream

pub mod error;
pub mod login;
pub mod upsert;

pub use error::TransformError;
pub use login::{CredentialError, LoginTransformer};
pub use upsert::UpsertTransformer;
