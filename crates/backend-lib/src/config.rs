// ============================
// accountgate-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::HashCost;

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "accountgate.toml";

/// Prefix of environment overrides, e.g. `ACCOUNTGATE_JWT_SECRET`
pub const ENV_PREFIX: &str = "ACCOUNTGATE_";

/// Upper bound for any token TTL: ten years
pub const MAX_TTL_SECS: u64 = 60 * 60 * 24 * 365 * 10;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Settings validation failures
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("jwt_secret must be set")]
    MissingSecret,

    #[error("{0} must be greater than zero")]
    ZeroTtl(&'static str),

    #[error("{0} must be at most ten years")]
    TtlTooLarge(&'static str),

    #[error("unknown log level: {0}")]
    InvalidLogLevel(String),

    #[error("invalid hash cost: {0}")]
    InvalidHashCost(String),
}

/// Which credential store backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Memory,
    FlatFile,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory for the flat-file store
    pub data_dir: PathBuf,
    /// Log level; `debug` also logs masked store and token failures
    pub log_level: String,
    /// Shared HS256 secret
    pub jwt_secret: String,
    /// Session token TTL in seconds
    pub token_ttl_secs: u64,
    /// Reset token TTL in seconds
    pub reset_token_ttl_secs: u64,
    /// scrypt cost for new password hashes
    pub hash_cost: HashCost,
    /// Credential store backend
    pub store: StoreKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            jwt_secret: String::new(),
            token_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            reset_token_ttl_secs: 60 * 60,
            hash_cost: HashCost::default(),
            store: StoreKind::FlatFile,
        }
    }
}

impl Settings {
    /// Load from defaults, `accountgate.toml` and the environment
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from defaults, the given TOML file (if present) and the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(settings)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        for (name, ttl) in [
            ("token_ttl_secs", self.token_ttl_secs),
            ("reset_token_ttl_secs", self.reset_token_ttl_secs),
        ] {
            if ttl == 0 {
                return Err(ConfigError::ZeroTtl(name));
            }
            if ttl > MAX_TTL_SECS {
                return Err(ConfigError::TtlTooLarge(name));
            }
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }
        self.hash_cost
            .params()
            .map_err(|e| ConfigError::InvalidHashCost(e.to_string()))?;
        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn reset_token_ttl(&self) -> Duration {
        Duration::from_secs(self.reset_token_ttl_secs)
    }
}
