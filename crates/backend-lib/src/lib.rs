// ============================
// accountgate-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the account authentication server.

pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod store;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth};
use crate::config::{Settings, StoreKind};
use crate::store::{AccountStore, FlatFileStore, MemoryStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state over the given store
    pub fn new(store: Arc<dyn AccountStore>, settings: Settings) -> anyhow::Result<Self> {
        let auth = Arc::new(DefaultAuth::new(store, &settings)?);
        Ok(Self::with_auth(auth, settings))
    }

    /// Create a state around an existing auth service
    pub fn with_auth(auth: Arc<dyn AuthService>, settings: Settings) -> Self {
        Self {
            auth,
            settings: Arc::new(settings),
        }
    }

    /// Create a new application state with the store the settings ask for
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn AccountStore> = match settings.store {
            StoreKind::Memory => Arc::new(MemoryStore::new()),
            StoreKind::FlatFile => Arc::new(FlatFileStore::new(&settings.data_dir)?),
        };
        Self::new(store, settings)
    }
}
