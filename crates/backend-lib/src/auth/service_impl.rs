use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use tracing::{debug, info};

use crate::account::Account;
use crate::auth::{
    generate_auth_key, hash_password_secure, verify_password, AuthService, HashCost, ResetClaims,
    SessionClaims, TokenCodec,
};
use crate::config::Settings;
use crate::error::AppError;
use crate::metrics::{
    LOGIN_FAILED, LOGIN_SUCCEEDED, PASSWORD_RESET, RESET_TOKEN_ISSUED, SESSION_ACCEPTED,
    SESSION_REJECTED,
};
use crate::store::{AccountFilter, AccountStore, StoreError};

/// [`AuthService`] backed by a credential store and a token codec
pub struct DefaultAuth {
    store: Arc<dyn AccountStore>,
    codec: TokenCodec,
    token_ttl: Duration,
    reset_token_ttl: Duration,
    hash_cost: HashCost,
}

impl DefaultAuth {
    pub fn new(store: Arc<dyn AccountStore>, settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            store,
            codec: TokenCodec::new(&settings.jwt_secret)?,
            token_ttl: settings.token_ttl(),
            reset_token_ttl: settings.reset_token_ttl(),
            hash_cost: settings.hash_cost,
        })
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Look up an account where a missing one is the caller's problem
    async fn find_for_reset(&self, identifier: &str) -> Result<Account, AppError> {
        match self.store.find_one(&AccountFilter::for_identifier(identifier)).await {
            Ok(account) => Ok(account),
            Err(StoreError::NotFound) => Err(AppError::NotFound(format!("account {identifier}"))),
            Err(e) => Err(AppError::Internal(format!("account lookup: {e}"))),
        }
    }

    /// Resolve a login identifier, trying each login filter in turn
    async fn find_for_login(&self, identifier: &str) -> Result<Account, StoreError> {
        for filter in AccountFilter::login(identifier) {
            match self.store.find_one(&filter).await {
                Err(StoreError::NotFound) => continue,
                found => return found,
            }
        }
        Err(StoreError::NotFound)
    }

    async fn save(&self, account: &Account) -> Result<(), AppError> {
        self.store
            .update(&AccountFilter::Id(account.id().to_string()), account)
            .await
            .map_err(|e| AppError::Internal(format!("saving {} {}: {e}", account.account_type(), account.id())))
    }

    async fn check_password(&self, hash: String, plain: String) -> Result<bool, AppError> {
        tokio::task::spawn_blocking(move || verify_password(&hash, &plain))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn hash_new_password(&self, mut plain: String) -> Result<String, AppError> {
        let cost = self.hash_cost;
        tokio::task::spawn_blocking(move || hash_password_secure(&mut plain, &cost))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(format!("hashing password: {e}")))
    }

    async fn login_inner(&self, identifier: &str, password: &str) -> Result<String, AppError> {
        // Unknown identifiers and store failures look the same to the caller
        let account = match self.find_for_login(identifier).await {
            Ok(account) => account,
            Err(StoreError::NotFound) => {
                debug!("login for unknown identifier");
                return Err(AppError::InvalidLogin);
            },
            Err(e) => {
                debug!(error = %e, "account lookup failed during login");
                return Err(AppError::InvalidLogin);
            },
        };

        let credentials = account.credentials();
        if !self
            .check_password(credentials.password_hash.clone(), password.to_string())
            .await?
        {
            return Err(AppError::InvalidLogin);
        }

        // only after the password, so a wrong password never reveals this
        if !credentials.is_email_verified {
            return Err(AppError::EmailNotVerified);
        }

        let claims = SessionClaims {
            username: credentials.username.clone(),
            authkey: credentials.auth_key.clone(),
        };
        let token = self
            .codec
            .issue(&claims, self.token_ttl)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        info!(account_id = %credentials.id, "login succeeded");
        Ok(token)
    }

    async fn verify_session_inner(&self, token: &str) -> Result<Account, AppError> {
        let claims: SessionClaims = self
            .codec
            .verify(token)
            .map_err(|e| AppError::AuthFailed(e.to_string()))?;

        let account = self
            .store
            .find_one(&AccountFilter::Username(claims.username.clone()))
            .await
            .map_err(|e| AppError::AuthFailed(format!("account lookup for {}: {e}", claims.username)))?;

        if account.credentials().auth_key != claims.authkey {
            return Err(AppError::AuthFailed("auth key has been rotated".to_string()));
        }

        if !account.credentials().is_email_verified {
            return Err(AppError::EmailNotVerified);
        }

        Ok(account)
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn login(&self, identifier: &str, password: &str) -> Result<String, AppError> {
        let result = self.login_inner(identifier, password).await;
        match result {
            Ok(_) => counter!(LOGIN_SUCCEEDED).increment(1),
            Err(_) => counter!(LOGIN_FAILED).increment(1),
        }
        result
    }

    async fn verify_session(&self, token: &str) -> Result<Account, AppError> {
        let result = self.verify_session_inner(token).await;
        match result {
            Ok(_) => counter!(SESSION_ACCEPTED).increment(1),
            Err(_) => counter!(SESSION_REJECTED).increment(1),
        }
        result
    }

    async fn issue_reset_token(&self, identifier: &str) -> Result<String, AppError> {
        let mut account = self.find_for_reset(identifier).await?;

        let claims = ResetClaims {
            id: account.id().to_string(),
        };
        let token = self
            .codec
            .issue(&claims, self.reset_token_ttl)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        account.credentials_mut().password_reset_token = token.clone();
        self.save(&account).await?;

        counter!(RESET_TOKEN_ISSUED).increment(1);
        info!(account_id = %account.id(), "password reset requested");
        Ok(token)
    }

    async fn reset_password(&self, reset_token: &str, new_password: String) -> Result<(), AppError> {
        let claims: ResetClaims = self
            .codec
            .verify(reset_token)
            .map_err(|e| AppError::InvalidResetToken(e.to_string()))?;

        let mut account = self.find_for_reset(&claims.id).await?;

        // Binds the token to the reset that is still pending
        let pending = &account.credentials().password_reset_token;
        if pending.is_empty() || pending != reset_token {
            return Err(AppError::InvalidResetToken(
                "token is not the pending reset token".to_string(),
            ));
        }

        let password_hash = self.hash_new_password(new_password).await?;

        let credentials = account.credentials_mut();
        credentials.password_hash = password_hash;
        credentials.auth_key = generate_auth_key();
        credentials.password_reset_token.clear();
        self.save(&account).await?;

        counter!(PASSWORD_RESET).increment(1);
        info!(account_id = %account.id(), "password reset");
        Ok(())
    }
}
