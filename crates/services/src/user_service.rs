use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use storage::repository::{StorageError, UserRecord, UserRepository};
use vocab_core::Clock;
use vocab_core::model::UserKey;

use crate::error::UserServiceError;

/// Learners who have not logged in for this many days are removed by `cleanup_inactive`.
pub const INACTIVE_AFTER_DAYS: i64 = 14;

/// Result of a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: UserRecord,
    /// `true` if the key was registered by this login.
    pub is_new: bool,
}

/// Registers learners and tracks their activity.
#[derive(Clone)]
pub struct UserService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
}

impl UserService {
    #[must_use]
    pub fn new(clock: Clock, users: Arc<dyn UserRepository>) -> Self {
        Self { clock, users }
    }

    /// Validate `raw` as a user key, registering it on first use and
    /// refreshing its last login otherwise.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::UserKey` for a malformed key, or
    /// `UserServiceError::Storage` if the registry cannot be read or written.
    pub async fn login(&self, raw: &str) -> Result<LoginOutcome, UserServiceError> {
        let key = UserKey::new(raw.trim())?;
        let (user, is_new) = record_activity(self.users.as_ref(), &key, self.clock.now()).await?;
        Ok(LoginOutcome { user, is_new })
    }

    /// Remove learners inactive for more than `INACTIVE_AFTER_DAYS`, together
    /// with every row they stored. Returns the removed keys.
    ///
    /// # Errors
    ///
    /// Returns `UserServiceError::Storage` if the registry cannot be read or a
    /// delete fails. Users removed before the failure stay removed.
    pub async fn cleanup_inactive(&self) -> Result<Vec<UserKey>, UserServiceError> {
        let cutoff = self.clock.now() - Duration::days(INACTIVE_AFTER_DAYS);
        let mut removed = Vec::new();
        for user in self.users.list_users().await? {
            if user.last_login_at >= cutoff {
                continue;
            }
            self.users.delete_user(&user.key).await?;
            tracing::info!(
                user = %user.key,
                last_login_at = %user.last_login_at,
                "removed inactive user"
            );
            removed.push(user.key);
        }
        Ok(removed)
    }
}

/// Register `key` if unknown, otherwise move its last login to `now`.
///
/// Every keyed entry point goes through here so studying or reading
/// statistics keeps a learner clear of `cleanup_inactive`.
pub(crate) async fn record_activity(
    users: &dyn UserRepository,
    key: &UserKey,
    now: DateTime<Utc>,
) -> Result<(UserRecord, bool), StorageError> {
    let (user, is_new) = match users.get_user(key).await? {
        Some(mut existing) => {
            existing.last_login_at = now;
            (existing, false)
        }
        None => (UserRecord::new(key.clone(), now), true),
    };
    users.upsert_user(&user).await?;

    if is_new {
        tracing::info!(user = %user.key, "registered new user");
    } else {
        tracing::debug!(user = %user.key, "recorded user activity");
    }
    Ok((user, is_new))
}
