// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the account backend.

pub mod session;

pub use session::{require_session, ACCESS_TOKEN_HEADER};
