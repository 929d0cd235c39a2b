use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{GroupId, WordId};
use crate::model::status::StudyStatus;
use crate::model::word::WordRecord;

/// A stored row: either the status row of a word or its starred row.
///
/// `id` is always the word id. The row key is derived from it, so a word can
/// hold a status row and a starred row at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub id: WordId,
    pub word: String,
    pub meaning: String,
    pub group: GroupId,
    pub status: StudyStatus,
    pub updated_at: DateTime<Utc>,
}

impl WordEntry {
    #[must_use]
    pub fn is_starred_row(&self) -> bool {
        self.status == StudyStatus::Starred
    }

    /// Storage key of this row.
    #[must_use]
    pub fn key(&self) -> String {
        if self.is_starred_row() {
            self.id.starred_key()
        } else {
            self.id.as_str().to_owned()
        }
    }

    /// Turn a stored row back into a studyable word.
    #[must_use]
    pub fn to_record(&self) -> WordRecord {
        WordRecord::new(
            self.id.clone(),
            self.word.clone(),
            self.meaning.clone(),
            self.group,
        )
    }
}
