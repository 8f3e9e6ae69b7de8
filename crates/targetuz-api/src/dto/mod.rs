//! Request and response DTOs
//!
//! Requests are validated here, before anything touches the store; the
//! bounds mirror what the public forms enforce.

mod order;
mod user;
mod wallet;

pub use order::*;
pub use user::*;
pub use wallet::*;
