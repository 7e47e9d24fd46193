// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
//!
//! Handlers report an [`AppError`] and tag it with the [`ErrorScope`] it
//! happened in; the scope picks the wire code from a fixed catalog. Clients
//! only ever see the catalog message, never the error's own text.
use accountgate_common::ErrorBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::validation::ValidationError;

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Code shared by every handler for missing fields and undecodable bodies
pub const BAD_REQUEST_CODE: u16 = 4050;
const BAD_REQUEST_MESSAGE: &str = "Bad Request (Bad request.)";

/// Application error taxonomy
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No token provided")]
    MissingToken,

    /// Bad signature, expiry, auth key mismatch or unknown account
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Email not verified")]
    EmailNotVerified,

    /// Unknown identifier or wrong password
    #[error("Invalid login")]
    InvalidLogin,

    /// Bad signature or no longer the pending reset token
    #[error("Invalid reset token: {0}")]
    InvalidResetToken(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Which handler an error came from; each owns a code range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// Session verification middleware, 30xx
    Session,
    /// Login, 31xx
    Login,
    /// Password reset, 32xx
    Reset,
}

impl ErrorScope {
    fn internal(self) -> (StatusCode, u16, &'static str) {
        match self {
            // fallback only; session verification reports store failures as AuthFailed
            ErrorScope::Session => (
                StatusCode::INTERNAL_SERVER_ERROR,
                3002,
                "Internal Server Error (Problem finding account)",
            ),
            ErrorScope::Login => (StatusCode::INTERNAL_SERVER_ERROR, 3100, INTERNAL_SERVER_ERROR),
            ErrorScope::Reset => (StatusCode::INTERNAL_SERVER_ERROR, 3200, INTERNAL_SERVER_ERROR),
        }
    }
}

impl AppError {
    /// Attach the handler scope so the error can become a response
    pub fn in_scope(self, scope: ErrorScope) -> ScopedError {
        ScopedError { scope, error: self }
    }

    /// Status, code and client message for this error within `scope`
    pub fn catalog(&self, scope: ErrorScope) -> (StatusCode, u16, &'static str) {
        use ErrorScope::{Login, Reset, Session};

        match (scope, self) {
            (_, AppError::BadRequest(_)) => (StatusCode::BAD_REQUEST, BAD_REQUEST_CODE, BAD_REQUEST_MESSAGE),
            (Session, AppError::MissingToken) => (StatusCode::UNAUTHORIZED, 3000, "No token provided."),
            (Session, AppError::AuthFailed(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                3001,
                "Failed to authenticate token.",
            ),
            (Session, AppError::EmailNotVerified) => (
                StatusCode::UNAUTHORIZED,
                3003,
                "Unauthorized (Email not verified.)",
            ),
            (Login, AppError::InvalidLogin) => (StatusCode::BAD_REQUEST, 3101, "Invalid login."),
            (Login, AppError::EmailNotVerified) => (
                StatusCode::BAD_REQUEST,
                3102,
                "Bad Request (Email not verified.)",
            ),
            (Reset, AppError::InvalidResetToken(_)) => {
                (StatusCode::BAD_REQUEST, 3201, "Invalid reset token.")
            },
            (Reset, AppError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                3202,
                "Not Found (Account not found.)",
            ),
            // Anything else in a scope that does not expect it is a bug on
            // our side, not the caller's.
            (scope, _) => scope.internal(),
        }
    }

    /// Whether the error comes from our side rather than the caller's input
    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::Internal(_))
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// An [`AppError`] bound to the handler that produced it
#[derive(Error, Debug)]
#[error("{scope:?}: {error}")]
pub struct ScopedError {
    pub scope: ErrorScope,
    pub error: AppError,
}

impl ScopedError {
    pub fn body(&self) -> (StatusCode, ErrorBody) {
        let (status, code, message) = self.error.catalog(self.scope);
        (
            status,
            ErrorBody {
                message: message.to_string(),
                code,
            },
        )
    }
}

impl IntoResponse for ScopedError {
    fn into_response(self) -> Response {
        if self.error.is_internal() {
            tracing::error!(scope = ?self.scope, error = %self.error, "request failed");
        } else {
            tracing::debug!(scope = ?self.scope, error = %self.error, "request rejected");
        }

        let (status, body) = self.body();
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "request rejected");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: BAD_REQUEST_MESSAGE.to_string(),
                code: BAD_REQUEST_CODE,
            }),
        )
            .into_response()
    }
}
