// ============================
// accountgate-backend-lib/src/auth/token.rs
// ============================
//! Signed token codec.
//!
//! Every token in the system, session or reset, goes through [`TokenCodec`],
//! which signs with HS256 over a shared secret and accepts nothing else.
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token codec failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// Claims carried by a session token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject of the session
    pub username: String,
    /// Snapshot of the account's auth key at issuance
    pub authkey: String,
}

/// Claims carried by a password reset token
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResetClaims {
    /// Account id or email
    pub id: String,
}

/// Claims plus the absolute expiry, as they appear on the wire
#[derive(Serialize, Deserialize)]
struct Expiring<C> {
    #[serde(flatten)]
    claims: C,
    exp: u64,
}

/// Encodes and decodes signed claims
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec for the given shared secret
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Signing("secret must not be empty".to_string()));
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Sign `claims`, expiring `ttl` from now
    pub fn issue<C: Serialize>(&self, claims: &C, ttl: Duration) -> Result<String, TokenError> {
        let expiry = (Utc::now().timestamp().max(0) as u64)
            .checked_add(ttl.as_secs())
            .ok_or_else(|| TokenError::Signing(format!("ttl of {}s overflows the expiry", ttl.as_secs())))?;
        self.issue_until(claims, expiry)
    }

    /// Sign `claims` with an absolute expiry in unix seconds
    pub fn issue_until<C: Serialize>(&self, claims: &C, expiry: u64) -> Result<String, TokenError> {
        let wire = Expiring { claims, exp: expiry };
        encode(&Header::new(ALGORITHM), &wire, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check signature, algorithm and expiry, then parse the claims
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        decode::<Expiring<C>>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}
