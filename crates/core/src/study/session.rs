use std::fmt;
use thiserror::Error;

use crate::model::{Outcome, WordRecord};

use super::progress::{DeckProgress, DeckSummary};
use super::shuffle::Shuffler;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StudyError {
    #[error("no words to study")]
    EmptyWordSet,
    #[error("study session already completed")]
    Completed,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Which traversal the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    First,
    /// The single extra pass over words resolved `Unknown` in the first pass.
    Review,
}

/// Externally visible state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckPhase {
    /// Built from an empty word set. Not ready, and never `Complete`.
    NoCurrentWord,
    Presenting { revealed: bool },
    Reviewing { revealed: bool },
    Complete,
}

/// How the session moved after a resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Next word of the same pass.
    Next,
    /// First pass ended with unknown words; the review pass starts at position 0.
    ReviewStarted { words: usize },
    Completed,
}

/// A resolved study step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub word: WordRecord,
    pub outcome: Outcome,
    pub pass: Pass,
    pub advance: Advance,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory traversal of one word set.
///
/// The session never touches storage; callers persist each `Resolution` and
/// decide what to do about write failures.
pub struct DeckSession {
    shuffler: Box<dyn Shuffler>,
    order: Vec<WordRecord>,
    position: usize,
    revealed: bool,
    pending_review: Vec<WordRecord>,
    pass: Pass,
    complete: bool,
    first_pass_words: usize,
    review_words: usize,
}

impl DeckSession {
    /// Build a session over a shuffled copy of `words`.
    ///
    /// An empty `words` yields a session in `DeckPhase::NoCurrentWord`.
    #[must_use]
    pub fn new(words: Vec<WordRecord>, shuffler: Box<dyn Shuffler>) -> Self {
        let mut session = Self {
            shuffler,
            order: Vec::new(),
            position: 0,
            revealed: false,
            pending_review: Vec::new(),
            pass: Pass::First,
            complete: false,
            first_pass_words: 0,
            review_words: 0,
        };
        session.restart(words);
        session
    }

    /// Drop all progress and start over with a new word set.
    pub fn restart(&mut self, mut words: Vec<WordRecord>) {
        self.shuffler.shuffle(&mut words);
        self.first_pass_words = words.len();
        self.order = words;
        self.position = 0;
        self.revealed = false;
        self.pending_review.clear();
        self.pass = Pass::First;
        self.complete = false;
        self.review_words = 0;
    }

    #[must_use]
    pub fn phase(&self) -> DeckPhase {
        if self.complete {
            return DeckPhase::Complete;
        }
        if self.order.is_empty() {
            return DeckPhase::NoCurrentWord;
        }
        match self.pass {
            Pass::First => DeckPhase::Presenting {
                revealed: self.revealed,
            },
            Pass::Review => DeckPhase::Reviewing {
                revealed: self.revealed,
            },
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&WordRecord> {
        if self.complete {
            return None;
        }
        self.order.get(self.position)
    }

    /// True when the session was built from an empty word set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phase() == DeckPhase::NoCurrentWord
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn is_reviewing(&self) -> bool {
        self.pass == Pass::Review
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub fn pass(&self) -> Pass {
        self.pass
    }

    /// Words in the active order, current word included.
    #[must_use]
    pub fn order(&self) -> &[WordRecord] {
        &self.order
    }

    /// Words resolved `Unknown` so far in the first pass.
    #[must_use]
    pub fn pending_review(&self) -> &[WordRecord] {
        &self.pending_review
    }

    #[must_use]
    pub fn progress(&self) -> DeckProgress {
        DeckProgress {
            position: self.position,
            total: self.order.len(),
            reviewing: self.is_reviewing(),
            complete: self.complete,
        }
    }

    #[must_use]
    pub fn summary(&self) -> DeckSummary {
        DeckSummary {
            first_pass_words: self.first_pass_words,
            review_words: self.review_words,
            complete: self.complete,
        }
    }

    /// Show the meaning of the current word.
    ///
    /// Returns `true` if the state changed, `false` if it was already revealed.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::EmptyWordSet` or `StudyError::Completed` when there
    /// is no current word.
    pub fn reveal(&mut self) -> Result<bool, StudyError> {
        self.ensure_active()?;
        if self.revealed {
            return Ok(false);
        }
        self.revealed = true;
        Ok(true)
    }

    /// Record `outcome` for the current word and advance.
    ///
    /// First-pass `Unknown` outcomes are queued for the review pass. Review
    /// pass outcomes are never queued again.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::EmptyWordSet` or `StudyError::Completed` when there
    /// is no current word.
    pub fn resolve(&mut self, outcome: Outcome) -> Result<Resolution, StudyError> {
        self.ensure_active()?;
        let word = self
            .order
            .get(self.position)
            .cloned()
            .ok_or(StudyError::Completed)?;
        let pass = self.pass;

        if outcome == Outcome::Unknown && pass == Pass::First {
            self.pending_review.push(word.clone());
        }

        let advance = self.advance();
        Ok(Resolution {
            word,
            outcome,
            pass,
            advance,
        })
    }

    fn advance(&mut self) -> Advance {
        self.revealed = false;

        if self.position + 1 < self.order.len() {
            self.position += 1;
            return Advance::Next;
        }

        if self.pass == Pass::First && !self.pending_review.is_empty() {
            let mut review = std::mem::take(&mut self.pending_review);
            self.shuffler.shuffle(&mut review);
            self.review_words = review.len();
            self.order = review;
            self.position = 0;
            self.pass = Pass::Review;
            return Advance::ReviewStarted {
                words: self.review_words,
            };
        }

        self.position = self.order.len();
        self.complete = true;
        Advance::Completed
    }

    fn ensure_active(&self) -> Result<(), StudyError> {
        if self.complete {
            return Err(StudyError::Completed);
        }
        if self.order.is_empty() {
            return Err(StudyError::EmptyWordSet);
        }
        Ok(())
    }
}

impl fmt::Debug for DeckSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckSession")
            .field("order_len", &self.order.len())
            .field("position", &self.position)
            .field("revealed", &self.revealed)
            .field("pending_review_len", &self.pending_review.len())
            .field("pass", &self.pass)
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
