use std::sync::Arc;

use serde::Serialize;
use storage::WordStore;
use storage::repository::{UserRepository, WordStatusRepository};
use vocab_core::Clock;
use vocab_core::model::{Statistics, StudyStatus, UserKey, WordEntry};

use crate::user_service::record_activity;

/// Everything the statistics view shows for one learner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatisticsReport {
    pub statistics: Statistics,
    pub total_studied: u32,
    pub progress_percentage: u32,
    /// Most recently updated first.
    pub unknown_words: Vec<WordEntry>,
    pub starred_words: Vec<WordEntry>,
    /// Read failures, one line each. The matching sections are left empty.
    pub warnings: Vec<String>,
}

impl StatisticsReport {
    fn with_statistics(mut self, statistics: Statistics) -> Self {
        self.total_studied = statistics.total_studied();
        self.progress_percentage = statistics.progress_percentage();
        self.statistics = statistics;
        self
    }
}

/// Read-only view over a learner's stored rows, independent of any session.
///
/// Viewing statistics counts as activity for the inactive-user cleanup.
#[derive(Clone)]
pub struct StatisticsService {
    clock: Clock,
    words: Arc<dyn WordStatusRepository>,
    users: Arc<dyn UserRepository>,
}

impl StatisticsService {
    #[must_use]
    pub fn new(
        clock: Clock,
        words: Arc<dyn WordStatusRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            clock,
            words,
            users,
        }
    }

    /// Build the report for `user`.
    ///
    /// Never fails: an unreadable store yields an empty report with warnings.
    pub async fn report(&self, user: UserKey) -> StatisticsReport {
        let mut report = StatisticsReport::default();
        let store = match WordStore::open(Arc::clone(&self.words), user, self.clock).await {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(error = %err, "statistics unavailable");
                report.warnings.push(format!("statistics unavailable: {err}"));
                return report;
            }
        };

        let activity = record_activity(self.users.as_ref(), store.user(), self.clock.now()).await;
        if let Err(err) = activity {
            tracing::warn!(user = %store.user(), error = %err, "failed to record activity");
            report.warnings.push(format!("last login not refreshed: {err}"));
        }

        match store.aggregate().await {
            Ok(statistics) => report = report.with_statistics(statistics),
            Err(err) => {
                tracing::warn!(
                    user = %store.user(),
                    error = %err,
                    "failed to aggregate statistics"
                );
                report.warnings.push(format!("counts unavailable: {err}"));
            }
        }

        report.unknown_words = Self::list(&store, StudyStatus::Unknown, &mut report.warnings).await;
        report.starred_words = Self::list(&store, StudyStatus::Starred, &mut report.warnings).await;
        store.close();
        report
    }

    async fn list(
        store: &WordStore,
        status: StudyStatus,
        warnings: &mut Vec<String>,
    ) -> Vec<WordEntry> {
        store.list_by_status(status).await.unwrap_or_else(|err| {
            tracing::warn!(
                user = %store.user(),
                status = %status,
                error = %err,
                "failed to list words"
            );
            warnings.push(format!("{status} words unavailable: {err}"));
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use storage::StorageError;
    use storage::repository::InMemoryRepository;
    use vocab_core::model::{GroupId, Outcome, WordId, WordRecord};
    use vocab_core::time::{fixed_clock, fixed_now};

    fn alice() -> UserKey {
        UserKey::new("alice").unwrap()
    }

    #[tokio::test]
    async fn report_folds_rows_into_counts_and_lists() {
        let repo = InMemoryRepository::new();
        let store = WordStore::open(Arc::new(repo.clone()), alice(), fixed_clock())
            .await
            .unwrap();
        let outcomes = [
            ("1_1", Outcome::Known),
            ("1_2", Outcome::Known),
            ("1_3", Outcome::Learned),
            ("1_4", Outcome::Unknown),
        ];
        for (id, outcome) in outcomes {
            let word = WordRecord::new(WordId::new(id), id, "m", GroupId::Day(1));
            store.put_status(&word, outcome).await.unwrap();
        }
        let starred = WordRecord::new(WordId::new("1_1"), "1_1", "m", GroupId::Day(1));
        store.put_starred(&starred).await.unwrap();

        let report = StatisticsService::new(fixed_clock(), Arc::new(repo.clone()), Arc::new(repo))
            .report(alice())
            .await;

        assert!(report.warnings.is_empty());
        assert_eq!(report.total_studied, 4);
        assert_eq!(report.progress_percentage, 75);
        assert_eq!(report.statistics.starred, 1);
        assert_eq!(report.unknown_words.len(), 1);
        assert_eq!(report.unknown_words[0].id, WordId::new("1_4"));
        assert_eq!(report.starred_words[0].id, WordId::new("1_1"));
    }

    #[tokio::test]
    async fn fresh_user_reports_zero_progress() {
        let repo = Arc::new(InMemoryRepository::new());
        let report = StatisticsService::new(fixed_clock(), repo.clone(), repo)
            .report(alice())
            .await;
        assert_eq!(report, StatisticsReport::default());
    }

    #[tokio::test]
    async fn viewing_statistics_refreshes_last_login() {
        let repo = Arc::new(InMemoryRepository::new());
        let later = fixed_now() + Duration::days(9);
        StatisticsService::new(Clock::fixed(later), repo.clone(), repo.clone())
            .report(alice())
            .await;

        let user = repo.get_user(&alice()).await.unwrap().expect("registered");
        assert_eq!(user.last_login_at, later);
    }

    struct ReadFailing;

    #[async_trait]
    impl WordStatusRepository for ReadFailing {
        async fn open_namespace(&self, _user: &UserKey) -> Result<(), StorageError> {
            Ok(())
        }
        async fn upsert_entry(&self, _: &UserKey, _: &WordEntry) -> Result<(), StorageError> {
            Ok(())
        }
        async fn get_entry(&self, _: &UserKey, _: &str) -> Result<Option<WordEntry>, StorageError> {
            Ok(None)
        }
        async fn delete_entry(&self, _: &UserKey, _: &str) -> Result<(), StorageError> {
            Ok(())
        }
        async fn list_by_status(
            &self,
            _: &UserKey,
            _: StudyStatus,
        ) -> Result<Vec<WordEntry>, StorageError> {
            Err(StorageError::ReadFailed("disk".into()))
        }
        async fn all_entries(&self, _: &UserKey) -> Result<Vec<WordEntry>, StorageError> {
            Err(StorageError::ReadFailed("disk".into()))
        }
        async fn aggregate(&self, _: &UserKey) -> Result<Statistics, StorageError> {
            Err(StorageError::ReadFailed("disk".into()))
        }
    }

    #[tokio::test]
    async fn read_failures_become_warnings() {
        let users = Arc::new(InMemoryRepository::new());
        let report = StatisticsService::new(fixed_clock(), Arc::new(ReadFailing), users)
            .report(alice())
            .await;

        assert_eq!(report.statistics, Statistics::default());
        assert_eq!(report.progress_percentage, 0);
        assert!(report.unknown_words.is_empty());
        assert!(report.starred_words.is_empty());
        assert_eq!(report.warnings.len(), 3);
    }
}
