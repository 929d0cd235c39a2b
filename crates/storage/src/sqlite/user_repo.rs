use async_trait::async_trait;
use vocab_core::model::UserKey;

use super::SqliteRepository;
use super::mapping::{map_user_row, read_err, write_err};
use crate::repository::{StorageError, UserRecord, UserRepository};

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, key: &UserKey) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_key, created_at, last_login_at
            FROM users
            WHERE user_key = ?1
            ",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_err)?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn upsert_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO users (user_key, created_at, last_login_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_key) DO UPDATE SET
                -- keep created_at from the first registration
                last_login_at = excluded.last_login_at
            ",
        )
        .bind(user.key.as_str())
        .bind(user.created_at)
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT user_key, created_at, last_login_at
            FROM users
            ORDER BY user_key ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_err)?;

        rows.iter().map(map_user_row).collect()
    }

    async fn delete_user(&self, key: &UserKey) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(write_err)?;

        sqlx::query("DELETE FROM word_entries WHERE user_key = ?1")
            .bind(key.as_str())
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;

        sqlx::query("DELETE FROM users WHERE user_key = ?1")
            .bind(key.as_str())
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;

        tx.commit().await.map_err(write_err)?;
        Ok(())
    }
}
