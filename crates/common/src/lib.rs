// ================
// common/src/lib.rs
// ================
//! Wire types shared between the account backend and its clients.
//!
//! Request forms keep every field optional so that a missing field can be
//! reported as a bad request instead of a decode failure. The backend turns
//! them into checked requests before doing any work.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/auth/login`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginForm {
    /// Username, email or account id
    #[serde(alias = "identifier")]
    pub username: Option<String>,
    /// Plaintext password
    pub password: Option<String>,
}

/// Body of `POST /v1/auth/reset-password`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ResetPasswordForm {
    /// New plaintext password
    pub password: Option<String>,
    /// Reset token delivered by email
    pub token: Option<String>,
}

/// Successful login response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}

/// Generic confirmation, e.g. `{"message": "ok"}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            message: "ok".to_string(),
        }
    }
}

/// Error body returned by every handler
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human readable message from a fixed catalog
    pub message: String,
    /// Numeric code; ranges are segmented per handler
    pub code: u16,
}

/// Public view of an account, as returned to its owner
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountView {
    pub id: String,
    pub username: String,
    pub email: String,
    /// `"User"` or `"Organization"`
    #[serde(rename = "type")]
    pub account_type: String,
    pub is_email_verified: bool,
}
