use serde::{Deserialize, Serialize};

use crate::model::ids::{GroupId, WordId};

/// A single word/meaning pair as produced by a word source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: WordId,
    pub word: String,
    pub meaning: String,
    pub group: GroupId,
}

impl WordRecord {
    #[must_use]
    pub fn new(
        id: WordId,
        word: impl Into<String>,
        meaning: impl Into<String>,
        group: GroupId,
    ) -> Self {
        Self {
            id,
            word: word.into(),
            meaning: meaning.into(),
            group,
        }
    }
}

/// Words of one study day, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordGroup {
    pub day: u32,
    pub words: Vec<WordRecord>,
}

impl WordGroup {
    #[must_use]
    pub fn new(day: u32) -> Self {
        Self {
            day,
            words: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
