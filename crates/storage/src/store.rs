use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use vocab_core::Clock;
use vocab_core::model::{
    Outcome, Statistics, StudyStatus, UserKey, WordEntry, WordId, WordRecord,
};

use crate::repository::{Storage, StorageError, WordStatusRepository};

/// Handle to one learner's word entries.
///
/// Obtained through `WordStore::open`; every operation is confined to the
/// namespace of the key it was opened with. Dropping the handle closes it.
#[derive(Clone)]
pub struct WordStore {
    user: UserKey,
    clock: Clock,
    words: Arc<dyn WordStatusRepository>,
}

impl WordStore {
    /// Open (creating if needed) the namespace of `user`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the backend cannot serve the namespace.
    pub async fn open(
        words: Arc<dyn WordStatusRepository>,
        user: UserKey,
        clock: Clock,
    ) -> Result<Self, StorageError> {
        words.open_namespace(&user).await.map_err(|err| {
            if err.is_unavailable() {
                err
            } else {
                StorageError::Unavailable(err.to_string())
            }
        })?;
        tracing::debug!(user = %user, "opened word store");
        Ok(Self { user, clock, words })
    }

    #[must_use]
    pub fn user(&self) -> &UserKey {
        &self.user
    }

    /// Release the handle.
    pub fn close(self) {
        tracing::debug!(user = %self.user, "closed word store");
    }

    fn entry(&self, word: &WordRecord, status: StudyStatus) -> WordEntry {
        WordEntry {
            id: word.id.clone(),
            word: word.word.clone(),
            meaning: word.meaning.clone(),
            group: word.group,
            status,
            updated_at: self.clock.now(),
        }
    }

    /// Upsert the status row of `word`. The starred row is left alone.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::WriteFailed` if the row cannot be stored.
    pub async fn put_status(
        &self,
        word: &WordRecord,
        outcome: Outcome,
    ) -> Result<(), StorageError> {
        let entry = self.entry(word, StudyStatus::from(outcome));
        self.words.upsert_entry(&self.user, &entry).await
    }

    /// Status of `id`, `Unknown` when the word was never studied.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn get_status(&self, id: &WordId) -> Result<StudyStatus, StorageError> {
        let entry = self.words.get_entry(&self.user, id.as_str()).await?;
        Ok(entry.map_or(StudyStatus::Unknown, |e| e.status))
    }

    /// Rows with `status`, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn list_by_status(
        &self,
        status: StudyStatus,
    ) -> Result<Vec<WordEntry>, StorageError> {
        self.words.list_by_status(&self.user, status).await
    }

    /// # Errors
    ///
    /// Returns `StorageError::WriteFailed` if the row cannot be stored.
    pub async fn put_starred(&self, word: &WordRecord) -> Result<(), StorageError> {
        let entry = self.entry(word, StudyStatus::Starred);
        self.words.upsert_entry(&self.user, &entry).await
    }

    /// # Errors
    ///
    /// Returns `StorageError::WriteFailed` if the delete fails.
    pub async fn remove_starred(&self, id: &WordId) -> Result<(), StorageError> {
        self.words.delete_entry(&self.user, &id.starred_key()).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn is_starred(&self, id: &WordId) -> Result<bool, StorageError> {
        Ok(self
            .words
            .get_entry(&self.user, &id.starred_key())
            .await?
            .is_some())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn aggregate(&self) -> Result<Statistics, StorageError> {
        self.words.aggregate(&self.user).await
    }

    /// Row key to status for every row in the namespace.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn status_map(&self) -> Result<HashMap<String, StudyStatus>, StorageError> {
        let entries = self.words.all_entries(&self.user).await?;
        Ok(entries.into_iter().map(|e| (e.key(), e.status)).collect())
    }
}

impl fmt::Debug for WordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordStore")
            .field("user", &self.user)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Storage {
    /// Open the word store of `user` on this backend.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the namespace cannot be opened.
    pub async fn open(&self, user: UserKey, clock: Clock) -> Result<WordStore, StorageError> {
        WordStore::open(Arc::clone(&self.words), user, clock).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use vocab_core::model::GroupId;
    use vocab_core::time::{fixed_clock, fixed_now};

    fn word(id: &str) -> WordRecord {
        WordRecord::new(WordId::new(id), format!("w{id}"), "m", GroupId::Day(1))
    }

    async fn open(storage: &Storage, name: &str) -> WordStore {
        storage
            .open(UserKey::new(name).unwrap(), fixed_clock())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn missing_status_reads_as_unknown() {
        let store = open(&Storage::in_memory(), "alice").await;
        assert_eq!(
            store.get_status(&WordId::new("9_9")).await.unwrap(),
            StudyStatus::Unknown
        );
        assert!(!store.is_starred(&WordId::new("9_9")).await.unwrap());
    }

    #[tokio::test]
    async fn starring_is_independent_of_status() {
        let store = open(&Storage::in_memory(), "alice").await;
        let w = word("1_1");

        store.put_starred(&w).await.unwrap();
        assert!(store.is_starred(&w.id).await.unwrap());

        store.put_status(&w, Outcome::Known).await.unwrap();
        assert!(store.is_starred(&w.id).await.unwrap());
        assert_eq!(store.get_status(&w.id).await.unwrap(), StudyStatus::Known);

        store.remove_starred(&w.id).await.unwrap();
        assert!(!store.is_starred(&w.id).await.unwrap());
        assert_eq!(store.get_status(&w.id).await.unwrap(), StudyStatus::Known);
    }

    #[tokio::test]
    async fn aggregate_counts_each_row_once() {
        let store = open(&Storage::in_memory(), "alice").await;
        let outcomes = [Outcome::Known, Outcome::Known, Outcome::Learned, Outcome::Unknown];
        for (i, outcome) in outcomes.into_iter().enumerate() {
            store
                .put_status(&word(&format!("1_{}", i + 1)), outcome)
                .await
                .unwrap();
        }
        for i in 1..=3 {
            store.put_starred(&word(&format!("2_{i}"))).await.unwrap();
        }

        assert_eq!(
            store.aggregate().await.unwrap(),
            Statistics {
                known: 2,
                learned: 1,
                unknown: 1,
                starred: 3
            }
        );
    }

    #[tokio::test]
    async fn status_overwrite_refreshes_timestamp() {
        let storage = Storage::in_memory();
        let user = UserKey::new("alice").unwrap();
        let early = storage.open(user.clone(), fixed_clock()).await.unwrap();
        let late = storage
            .open(user, Clock::fixed(fixed_now() + Duration::hours(1)))
            .await
            .unwrap();

        early.put_status(&word("1_1"), Outcome::Unknown).await.unwrap();
        early.put_status(&word("1_2"), Outcome::Unknown).await.unwrap();
        late.put_status(&word("1_1"), Outcome::Unknown).await.unwrap();

        let unknown = early.list_by_status(StudyStatus::Unknown).await.unwrap();
        assert_eq!(unknown.len(), 2);
        assert_eq!(unknown[0].id, WordId::new("1_1"));
        assert_eq!(unknown[0].updated_at, fixed_now() + Duration::hours(1));
    }

    #[tokio::test]
    async fn status_map_covers_both_row_kinds() {
        let store = open(&Storage::in_memory(), "alice").await;
        let w = word("3_1");
        store.put_status(&w, Outcome::Learned).await.unwrap();
        store.put_starred(&w).await.unwrap();

        let map = store.status_map().await.unwrap();
        assert_eq!(map.get("3_1"), Some(&StudyStatus::Learned));
        assert_eq!(map.get("starred_3_1"), Some(&StudyStatus::Starred));
    }

    #[tokio::test]
    async fn handles_for_different_users_do_not_share_rows() {
        let storage = Storage::in_memory();
        let alice = open(&storage, "alice").await;
        let bob = open(&storage, "bob").await;

        alice.put_status(&word("1_1"), Outcome::Known).await.unwrap();
        alice.put_starred(&word("1_1")).await.unwrap();

        assert_eq!(
            bob.get_status(&WordId::new("1_1")).await.unwrap(),
            StudyStatus::Unknown
        );
        assert!(!bob.is_starred(&WordId::new("1_1")).await.unwrap());
        assert_eq!(bob.aggregate().await.unwrap(), Statistics::default());
        bob.close();
    }
}
