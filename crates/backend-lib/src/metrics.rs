// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_SUCCEEDED: &str = "auth.login.succeeded";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const SESSION_ACCEPTED: &str = "auth.session.accepted";
pub const SESSION_REJECTED: &str = "auth.session.rejected";
pub const RESET_TOKEN_ISSUED: &str = "auth.reset.issued";
pub const PASSWORD_RESET: &str = "auth.reset.completed";
