// ============================
// accountgate-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
pub mod token;
pub mod token_generator;
mod service;
mod service_impl;

pub use password::{hash_password, hash_password_secure, verify_password, HashCost};
pub use token::{ResetClaims, SessionClaims, TokenCodec, TokenError};
pub use token_generator::{generate_auth_key, generate_object_id};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
