use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use vocab_core::model::{Statistics, StudyStatus, UserKey, WordEntry};

/// Errors surfaced by storage adapters.
///
/// A missing row is never an error; read paths return `None` or a default.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }
}

/// Row-level access to per-user word entries.
///
/// Rows are addressed by `(user, key)` where the key is `WordEntry::key()`.
/// Every call is scoped to a single user namespace.
#[async_trait]
pub trait WordStatusRepository: Send + Sync {
    /// Check that the namespace of `user` can be read and written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the backend cannot serve the namespace.
    async fn open_namespace(&self, user: &UserKey) -> Result<(), StorageError>;

    /// Insert or replace the row at `entry.key()`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::WriteFailed` if the row cannot be stored.
    async fn upsert_entry(&self, user: &UserKey, entry: &WordEntry) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. Absence is `Ok(None)`.
    async fn get_entry(&self, user: &UserKey, key: &str)
    -> Result<Option<WordEntry>, StorageError>;

    /// Delete the row at `key`. Deleting a missing row succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::WriteFailed` if the delete fails.
    async fn delete_entry(&self, user: &UserKey, key: &str) -> Result<(), StorageError>;

    /// Rows with `status`, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_by_status(
        &self,
        user: &UserKey,
        status: StudyStatus,
    ) -> Result<Vec<WordEntry>, StorageError>;

    /// Every row in the namespace, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn all_entries(&self, user: &UserKey) -> Result<Vec<WordEntry>, StorageError>;

    /// Count every row once under its status.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn aggregate(&self, user: &UserKey) -> Result<Statistics, StorageError>;
}

/// Registration data of a learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub key: UserKey,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl UserRecord {
    #[must_use]
    pub fn new(key: UserKey, now: DateTime<Utc>) -> Self {
        Self {
            key,
            created_at: now,
            last_login_at: now,
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. Absence is `Ok(None)`.
    async fn get_user(&self, key: &UserKey) -> Result<Option<UserRecord>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::WriteFailed` if the user cannot be stored.
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError>;

    /// Remove the user and every word entry in their namespace.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::WriteFailed` if the delete fails.
    async fn delete_user(&self, key: &UserKey) -> Result<(), StorageError>;
}

type EntryMap = HashMap<(UserKey, String), WordEntry>;

/// In-memory backend for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<EntryMap>>,
    users: Arc<Mutex<HashMap<UserKey, UserRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, EntryMap>, StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    fn users(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<UserKey, UserRecord>>, StorageError> {
        self.users
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

fn sort_recent_first(entries: &mut [WordEntry]) {
    entries.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.key().cmp(&b.key()))
    });
}

#[async_trait]
impl WordStatusRepository for InMemoryRepository {
    async fn open_namespace(&self, _user: &UserKey) -> Result<(), StorageError> {
        self.entries().map(|_| ())
    }

    async fn upsert_entry(&self, user: &UserKey, entry: &WordEntry) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        guard.insert((user.clone(), entry.key()), entry.clone());
        Ok(())
    }

    async fn get_entry(
        &self,
        user: &UserKey,
        key: &str,
    ) -> Result<Option<WordEntry>, StorageError> {
        let guard = self.entries()?;
        Ok(guard.get(&(user.clone(), key.to_owned())).cloned())
    }

    async fn delete_entry(&self, user: &UserKey, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        guard.remove(&(user.clone(), key.to_owned()));
        Ok(())
    }

    async fn list_by_status(
        &self,
        user: &UserKey,
        status: StudyStatus,
    ) -> Result<Vec<WordEntry>, StorageError> {
        let guard = self.entries()?;
        let mut found: Vec<WordEntry> = guard
            .iter()
            .filter(|((owner, _), entry)| owner == user && entry.status == status)
            .map(|(_, entry)| entry.clone())
            .collect();
        sort_recent_first(&mut found);
        Ok(found)
    }

    async fn all_entries(&self, user: &UserKey) -> Result<Vec<WordEntry>, StorageError> {
        let guard = self.entries()?;
        Ok(guard
            .iter()
            .filter(|((owner, _), _)| owner == user)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn aggregate(&self, user: &UserKey) -> Result<Statistics, StorageError> {
        let guard = self.entries()?;
        Ok(guard
            .iter()
            .filter(|((owner, _), _)| owner == user)
            .map(|(_, entry)| entry.status)
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, key: &UserKey) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.users()?.get(key).cloned())
    }

    async fn upsert_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        self.users()?.insert(user.key.clone(), user.clone());
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let mut users: Vec<_> = self.users()?.values().cloned().collect();
        users.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(users)
    }

    async fn delete_user(&self, key: &UserKey) -> Result<(), StorageError> {
        self.users()?.remove(key);
        self.entries()?.retain(|(owner, _), _| owner != key);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub words: Arc<dyn WordStatusRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let words: Arc<dyn WordStatusRepository> = Arc::new(repo.clone());
        let users: Arc<dyn UserRepository> = Arc::new(repo);
        Self { words, users }
    }
}
