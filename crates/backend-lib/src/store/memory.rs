use async_trait::async_trait;
use dashmap::DashMap;

use super::{check_replacement, check_unique, AccountFilter, AccountStore, StoreError};
use crate::account::Account;

/// In-memory store keyed by account id
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: DashMap<String, Account>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_one(&self, filter: &AccountFilter) -> Result<Account, StoreError> {
        self.accounts
            .iter()
            .find(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, id: &str) -> Result<Account, StoreError> {
        self.accounts
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, filter: &AccountFilter, account: &Account) -> Result<(), StoreError> {
        let current = self.find_one(filter).await?;
        check_replacement(&current, account)?;
        // last writer wins
        self.accounts.insert(account.id().to_string(), account.clone());
        Ok(())
    }

    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        for entry in self.accounts.iter() {
            check_unique(entry.value(), &account)?;
        }
        self.accounts.insert(account.id().to_string(), account);
        Ok(())
    }
}
