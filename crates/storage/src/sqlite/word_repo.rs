use async_trait::async_trait;
use sqlx::Row;
use vocab_core::model::{Statistics, StudyStatus, UserKey, WordEntry};

use super::SqliteRepository;
use super::mapping::{map_entry_row, parse_status, read_err, ser, write_err};
use crate::repository::{StorageError, WordStatusRepository};

#[async_trait]
impl WordStatusRepository for SqliteRepository {
    async fn open_namespace(&self, user: &UserKey) -> Result<(), StorageError> {
        sqlx::query("SELECT COUNT(*) FROM word_entries WHERE user_key = ?1")
            .bind(user.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn upsert_entry(&self, user: &UserKey, entry: &WordEntry) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO word_entries (
                user_key, entry_key, word_id, word, meaning, group_id, status, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(user_key, entry_key) DO UPDATE SET
                word_id = excluded.word_id,
                word = excluded.word,
                meaning = excluded.meaning,
                group_id = excluded.group_id,
                status = excluded.status,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user.as_str())
        .bind(entry.key())
        .bind(entry.id.as_str())
        .bind(entry.word.as_str())
        .bind(entry.meaning.as_str())
        .bind(entry.group.to_string())
        .bind(entry.status.as_str())
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(())
    }

    async fn get_entry(
        &self,
        user: &UserKey,
        key: &str,
    ) -> Result<Option<WordEntry>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT word_id, word, meaning, group_id, status, updated_at
            FROM word_entries
            WHERE user_key = ?1 AND entry_key = ?2
            ",
        )
        .bind(user.as_str())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_err)?;

        row.as_ref().map(map_entry_row).transpose()
    }

    async fn delete_entry(&self, user: &UserKey, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM word_entries WHERE user_key = ?1 AND entry_key = ?2")
            .bind(user.as_str())
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(write_err)?;
        Ok(())
    }

    async fn list_by_status(
        &self,
        user: &UserKey,
        status: StudyStatus,
    ) -> Result<Vec<WordEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT word_id, word, meaning, group_id, status, updated_at
            FROM word_entries
            WHERE user_key = ?1 AND status = ?2
            ORDER BY updated_at DESC, entry_key ASC
            ",
        )
        .bind(user.as_str())
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(read_err)?;

        rows.iter().map(map_entry_row).collect()
    }

    async fn all_entries(&self, user: &UserKey) -> Result<Vec<WordEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT word_id, word, meaning, group_id, status, updated_at
            FROM word_entries
            WHERE user_key = ?1
            ",
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(read_err)?;

        rows.iter().map(map_entry_row).collect()
    }

    async fn aggregate(&self, user: &UserKey) -> Result<Statistics, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT status, COUNT(*) AS n
            FROM word_entries
            WHERE user_key = ?1
            GROUP BY status
            ",
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(read_err)?;

        let mut stats = Statistics::default();
        for row in rows {
            let status: String = row.try_get("status").map_err(ser)?;
            let n: i64 = row.try_get("n").map_err(ser)?;
            let n = u32::try_from(n).map_err(|_| ser(format!("invalid count: {n}")))?;
            let slot = match parse_status(&status)? {
                StudyStatus::Known => &mut stats.known,
                StudyStatus::Learned => &mut stats.learned,
                StudyStatus::Unknown => &mut stats.unknown,
                StudyStatus::Starred => &mut stats.starred,
            };
            *slot = n;
        }
        Ok(stats)
    }
}
