// ============================
// accountgate-backend-lib/src/account.rs
// ============================
//! Account records as persisted by the credential store.
//!
//! All account kinds share the same [`Credentials`]; each kind is its own
//! record shape and is written back whole.
use std::fmt;

use accountgate_common::AccountView;
use serde::{Deserialize, Serialize};

use crate::auth::token_generator::{generate_auth_key, generate_object_id};

/// Authentication fields common to every account kind
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Immutable object-id shaped identifier
    pub id: String,
    pub username: String,
    pub email: String,
    /// scrypt PHC string
    pub password_hash: String,
    /// Rotated on every password change; session tokens embed it
    pub auth_key: String,
    #[serde(default)]
    pub is_email_verified: bool,
    /// Pending one-time reset token, empty when no reset is in progress
    #[serde(default)]
    pub password_reset_token: String,
}

impl Credentials {
    /// Fresh credentials with a generated id and auth key
    pub fn new(username: impl Into<String>, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: generate_object_id(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            auth_key: generate_auth_key(),
            is_email_verified: false,
            password_reset_token: String::new(),
        }
    }
}

/// An individual's account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// An organization's account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OrganizationAccount {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub organization_name: String,
    #[serde(default)]
    pub is_organization_verified: bool,
}

/// Account kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    User,
    Organization,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::User => "User",
            AccountType::Organization => "Organization",
        }
    }

    /// Name of the collection holding records of this kind
    pub fn collection(self) -> &'static str {
        match self {
            AccountType::User => "users",
            AccountType::Organization => "organizations",
        }
    }

    pub fn all() -> [AccountType; 2] {
        [AccountType::User, AccountType::Organization]
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored account of any kind
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Account {
    User(UserAccount),
    Organization(OrganizationAccount),
}

impl Account {
    pub fn credentials(&self) -> &Credentials {
        match self {
            Account::User(user) => &user.credentials,
            Account::Organization(org) => &org.credentials,
        }
    }

    pub fn credentials_mut(&mut self) -> &mut Credentials {
        match self {
            Account::User(user) => &mut user.credentials,
            Account::Organization(org) => &mut org.credentials,
        }
    }

    pub fn account_type(&self) -> AccountType {
        match self {
            Account::User(_) => AccountType::User,
            Account::Organization(_) => AccountType::Organization,
        }
    }

    pub fn id(&self) -> &str {
        &self.credentials().id
    }

    /// What the account owner gets to see about themselves
    pub fn view(&self) -> AccountView {
        let credentials = self.credentials();
        AccountView {
            id: credentials.id.clone(),
            username: credentials.username.clone(),
            email: credentials.email.clone(),
            account_type: self.account_type().to_string(),
            is_email_verified: credentials.is_email_verified,
        }
    }
}

impl From<UserAccount> for Account {
    fn from(user: UserAccount) -> Self {
        Account::User(user)
    }
}

impl From<OrganizationAccount> for Account {
    fn from(org: OrganizationAccount) -> Self {
        Account::Organization(org)
    }
}
