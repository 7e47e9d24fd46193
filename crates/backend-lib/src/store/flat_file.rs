use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs as tokio_fs;

use super::{check_replacement, check_unique, AccountFilter, AccountStore, StoreError, OBJECT_ID_REGEX};
use crate::account::{Account, AccountType};

/// Flat-file store: one pretty-printed JSON document per account, under a
/// directory per account kind (`users/`, `organizations/`).
#[derive(Clone, Debug)]
pub struct FlatFileStore {
    root: PathBuf,
}

impl FlatFileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        for kind in AccountType::all() {
            fs::create_dir_all(root.join(kind.collection()))?;
        }
        Ok(Self { root })
    }

    fn record_path(&self, kind: AccountType, id: &str) -> PathBuf {
        self.root.join(kind.collection()).join(format!("{id}.json"))
    }

    async fn read_record(path: &Path) -> Result<Account, StoreError> {
        let content = tokio_fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Every stored account, in directory order
    async fn load_all(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts = Vec::new();
        for kind in AccountType::all() {
            let mut entries = tokio_fs::read_dir(self.root.join(kind.collection())).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                    continue;
                }
                accounts.push(Self::read_record(&path).await?);
            }
        }
        Ok(accounts)
    }

    /// Write the record into its kind's directory.
    ///
    /// Each writer gets its own temp file in the target directory, so
    /// concurrent writers of one record end with the last rename winning.
    async fn write_record(&self, account: &Account) -> Result<(), StoreError> {
        let dir = self.root.join(account.account_type().collection());
        let path = self.record_path(account.account_type(), account.id());
        let json = serde_json::to_vec_pretty(account)?;

        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&json)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
    }
}

#[async_trait]
impl AccountStore for FlatFileStore {
    async fn find_one(&self, filter: &AccountFilter) -> Result<Account, StoreError> {
        if let AccountFilter::Id(id) = filter {
            return self.find_by_id(id).await;
        }
        self.load_all()
            .await?
            .into_iter()
            .find(|account| filter.matches(account))
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, id: &str) -> Result<Account, StoreError> {
        // ids double as file names
        if !OBJECT_ID_REGEX.is_match(id) {
            return Err(StoreError::NotFound);
        }
        for kind in AccountType::all() {
            let path = self.record_path(kind, id);
            if tokio_fs::try_exists(&path).await? {
                return Self::read_record(&path).await;
            }
        }
        Err(StoreError::NotFound)
    }

    async fn update(&self, filter: &AccountFilter, account: &Account) -> Result<(), StoreError> {
        let current = self.find_one(filter).await?;
        check_replacement(&current, account)?;
        self.write_record(account).await
    }

    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        if !OBJECT_ID_REGEX.is_match(account.id()) {
            return Err(StoreError::Conflict(format!("invalid account id {}", account.id())));
        }
        for existing in self.load_all().await? {
            check_unique(&existing, &account)?;
        }
        self.write_record(&account).await
    }
}
