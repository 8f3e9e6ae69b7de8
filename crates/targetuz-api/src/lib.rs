//! TargetUZ API
//!
//! REST surface over the settlement engine and the database layer.
//! Callers are trusted collaborators (web frontends, background jobs) that
//! supply validated actor identities with every request; there is no
//! session state anywhere in this crate.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
