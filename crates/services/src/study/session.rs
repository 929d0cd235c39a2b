use std::fmt;

use storage::WordStore;
use vocab_core::model::{UserKey, WordRecord};
use vocab_core::study::{DeckPhase, DeckProgress, DeckSession, DeckSummary, StudyError};

/// Where the words of a session came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudySource {
    /// Selected study days; empty means every day.
    Days(Vec<u32>),
    Supplementary,
    /// Words whose stored status is `Unknown`.
    UnknownList,
    StarredList,
    /// Caller-supplied words.
    Custom,
}

/// A running study session bound to one learner's store.
///
/// Created by `StudyLoopService`; all state-changing steps go through the
/// service so every resolve is persisted.
pub struct StudySession {
    pub(crate) deck: DeckSession,
    pub(crate) store: WordStore,
    source: StudySource,
}

impl StudySession {
    pub(crate) fn new(deck: DeckSession, store: WordStore, source: StudySource) -> Self {
        Self {
            deck,
            store,
            source,
        }
    }

    #[must_use]
    pub fn user(&self) -> &UserKey {
        self.store.user()
    }

    #[must_use]
    pub fn source(&self) -> &StudySource {
        &self.source
    }

    #[must_use]
    pub fn phase(&self) -> DeckPhase {
        self.deck.phase()
    }

    #[must_use]
    pub fn current(&self) -> Option<&WordRecord> {
        self.deck.current()
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.deck.is_revealed()
    }

    #[must_use]
    pub fn is_reviewing(&self) -> bool {
        self.deck.is_reviewing()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.deck.is_complete()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    #[must_use]
    pub fn progress(&self) -> DeckProgress {
        self.deck.progress()
    }

    #[must_use]
    pub fn summary(&self) -> DeckSummary {
        self.deck.summary()
    }

    /// Current word, or the reason there is none.
    pub(crate) fn require_current(&self) -> Result<&WordRecord, StudyError> {
        match self.deck.phase() {
            DeckPhase::NoCurrentWord => Err(StudyError::EmptyWordSet),
            DeckPhase::Complete => Err(StudyError::Completed),
            DeckPhase::Presenting { .. } | DeckPhase::Reviewing { .. } => {
                self.deck.current().ok_or(StudyError::Completed)
            }
        }
    }

    /// End the session and release the store handle.
    pub fn close(self) {
        self.store.close();
    }
}

impl fmt::Debug for StudySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySession")
            .field("source", &self.source)
            .field("deck", &self.deck)
            .field("store", &self.store)
            .finish()
    }
}
