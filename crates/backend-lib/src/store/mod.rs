// ============================
// accountgate-backend-lib/src/store/mod.rs
// ============================
//! Credential store abstraction with in-memory and flat-file backends.
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

use crate::account::Account;

mod flat_file;
mod memory;

pub use flat_file::FlatFileStore;
pub use memory::MemoryStore;

static OBJECT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("object id pattern"));

/// Percent-encoded `@`, as it arrives from some mail clients
const ENCODED_AT: &str = "%40";

/// Store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lookup criteria for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    Id(String),
    Username(String),
    Email(String),
}

impl AccountFilter {
    /// Build a filter from an identifier that is either an email or an id.
    ///
    /// Anything containing `@` (or `%40`) or not shaped like an object id
    /// is treated as an email; `%40` is decoded first.
    pub fn for_identifier(identifier: &str) -> Self {
        if identifier.contains(ENCODED_AT)
            || identifier.contains('@')
            || !OBJECT_ID_REGEX.is_match(identifier)
        {
            AccountFilter::Email(identifier.replace(ENCODED_AT, "@"))
        } else {
            AccountFilter::Id(identifier.to_ascii_lowercase())
        }
    }

    /// Filters tried at login, in order: the identifier may be a username,
    /// then an email or id. The first filter that finds an account wins.
    pub fn login(identifier: &str) -> [Self; 2] {
        [
            AccountFilter::Username(identifier.to_string()),
            AccountFilter::for_identifier(identifier),
        ]
    }

    pub fn matches(&self, account: &Account) -> bool {
        let credentials = account.credentials();
        match self {
            AccountFilter::Id(id) => credentials.id == *id,
            AccountFilter::Username(username) => credentials.username == *username,
            AccountFilter::Email(email) => credentials.email == *email,
        }
    }
}

/// Trait for credential store backends
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// First account matching `filter`
    async fn find_one(&self, filter: &AccountFilter) -> Result<Account, StoreError>;

    /// Account with the given id
    async fn find_by_id(&self, id: &str) -> Result<Account, StoreError>;

    /// Replace the account matching `filter` with `account`, whole
    async fn update(&self, filter: &AccountFilter, account: &Account) -> Result<(), StoreError>;

    /// Add a new account; id, username and email must all be unused
    async fn insert(&self, account: Account) -> Result<(), StoreError>;
}

/// Reject `candidate` if it collides with `existing` on a unique field
pub(crate) fn check_unique(existing: &Account, candidate: &Account) -> Result<(), StoreError> {
    let (a, b) = (existing.credentials(), candidate.credentials());
    if a.id == b.id {
        return Err(StoreError::Conflict(format!("id {} already exists", b.id)));
    }
    if a.username == b.username {
        return Err(StoreError::Conflict(format!("username {} already taken", b.username)));
    }
    if a.email == b.email {
        return Err(StoreError::Conflict(format!("email {} already taken", b.email)));
    }
    // usernames and emails share one login namespace
    if a.email == b.username {
        return Err(StoreError::Conflict(format!("username {} is another account's email", b.username)));
    }
    if a.username == b.email {
        return Err(StoreError::Conflict(format!("email {} is another account's username", b.email)));
    }
    Ok(())
}

/// Reject a replacement that would change immutable fields of `current`
pub(crate) fn check_replacement(current: &Account, replacement: &Account) -> Result<(), StoreError> {
    if current.id() != replacement.id() {
        return Err(StoreError::Conflict("account id is immutable".to_string()));
    }
    if current.account_type() != replacement.account_type() {
        return Err(StoreError::Conflict("account type is immutable".to_string()));
    }
    Ok(())
}
