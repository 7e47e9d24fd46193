use async_trait::async_trait;

use crate::account::Account;
use crate::error::AppError;

/// Account authentication operations used by the HTTP layer
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a session token
    async fn login(&self, identifier: &str, password: &str) -> Result<String, AppError>;

    /// Resolve a session token to its live, verified account
    async fn verify_session(&self, token: &str) -> Result<Account, AppError>;

    /// Issue a reset token for the account and record it as pending.
    /// Delivering it is up to the caller.
    async fn issue_reset_token(&self, identifier: &str) -> Result<String, AppError>;

    /// Consume a pending reset token and set a new password
    async fn reset_password(&self, reset_token: &str, new_password: String) -> Result<(), AppError>;
}
