//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use vocab_core::model::UserKeyError;
use vocab_core::study::StudyError;

/// Errors emitted by the study loop.
///
/// Write failures during a resolve are not errors; they travel on
/// `StepResult::write_error` instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Study(#[from] StudyError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `UserService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UserServiceError {
    #[error(transparent)]
    UserKey(#[from] UserKeyError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
