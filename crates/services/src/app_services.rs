use std::sync::Arc;

use storage::repository::Storage;
use vocab_core::wordlist::WordLibrary;

use crate::error::AppServicesError;
use crate::statistics_service::StatisticsService;
use crate::study::StudyLoopService;
use crate::user_service::UserService;
use crate::Clock;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    study_loop: Arc<StudyLoopService>,
    statistics: Arc<StatisticsService>,
    users: Arc<UserService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        library: WordLibrary,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, library))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, library: WordLibrary) -> Self {
        let study_loop = Arc::new(StudyLoopService::new(
            clock,
            Arc::clone(&storage.words),
            Arc::clone(&storage.users),
            Arc::new(library),
        ));
        let statistics = Arc::new(StatisticsService::new(
            clock,
            Arc::clone(&storage.words),
            Arc::clone(&storage.users),
        ));
        let users = Arc::new(UserService::new(clock, Arc::clone(&storage.users)));
        Self {
            study_loop,
            statistics,
            users,
        }
    }

    /// Replace the study loop with one that shuffles from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.study_loop = Arc::new(self.study_loop.as_ref().clone().with_seed(seed));
        self
    }

    #[must_use]
    pub fn study_loop(&self) -> Arc<StudyLoopService> {
        Arc::clone(&self.study_loop)
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsService> {
        Arc::clone(&self.statistics)
    }

    #[must_use]
    pub fn users(&self) -> Arc<UserService> {
        Arc::clone(&self.users)
    }
}
