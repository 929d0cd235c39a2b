use sqlx::Row;
use vocab_core::model::{GroupId, StudyStatus, UserKey, WordEntry, WordId};

use crate::repository::{StorageError, UserRecord};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn read_err(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::Unavailable(e.to_string())
        }
        other => StorageError::ReadFailed(other.to_string()),
    }
}

pub(crate) fn write_err(e: sqlx::Error) -> StorageError {
    StorageError::WriteFailed(e.to_string())
}

pub(crate) fn parse_status(s: &str) -> Result<StudyStatus, StorageError> {
    s.parse::<StudyStatus>().map_err(ser)
}

pub(crate) fn parse_group(s: &str) -> Result<GroupId, StorageError> {
    s.parse::<GroupId>().map_err(ser)
}

pub(crate) fn map_entry_row(row: &sqlx::sqlite::SqliteRow) -> Result<WordEntry, StorageError> {
    let status: String = row.try_get("status").map_err(ser)?;
    let group: String = row.try_get("group_id").map_err(ser)?;

    Ok(WordEntry {
        id: WordId::new(row.try_get::<String, _>("word_id").map_err(ser)?),
        word: row.try_get("word").map_err(ser)?,
        meaning: row.try_get("meaning").map_err(ser)?,
        group: parse_group(&group)?,
        status: parse_status(&status)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(crate) fn map_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserRecord, StorageError> {
    let key: String = row.try_get("user_key").map_err(ser)?;
    Ok(UserRecord {
        key: UserKey::new(key).map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
        last_login_at: row.try_get("last_login_at").map_err(ser)?,
    })
}
