use std::sync::Arc;

use storage::WordStore;
use storage::repository::{StorageError, UserRepository, WordStatusRepository};
use vocab_core::Clock;
use vocab_core::gesture::{Gesture, GestureAction};
use vocab_core::model::{Outcome, StudyStatus, UserKey, WordRecord};
use vocab_core::study::{Advance, DeckProgress, DeckSession, Resolution, RngShuffler, Shuffler};
use vocab_core::wordlist::WordLibrary;

use super::session::{StudySession, StudySource};
use crate::error::SessionError;
use crate::user_service::record_activity;

/// Result of resolving a single word in a session.
#[derive(Debug)]
pub struct StepResult {
    pub resolution: Resolution,
    pub progress: DeckProgress,
    /// Set when the outcome could not be stored. The session advanced anyway.
    pub write_error: Option<StorageError>,
}

impl StepResult {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress.complete
    }
}

/// What a gesture did to the session.
#[derive(Debug)]
pub enum GestureStep {
    Revealed,
    /// Reveal on an already revealed card.
    Ignored,
    Resolved(StepResult),
}

/// Orchestrates session start and persisted resolving.
///
/// Starting a session counts as activity: the learner is registered if
/// needed and their last login is refreshed.
#[derive(Clone)]
pub struct StudyLoopService {
    clock: Clock,
    words: Arc<dyn WordStatusRepository>,
    users: Arc<dyn UserRepository>,
    library: Arc<WordLibrary>,
    seed: Option<u64>,
}

impl StudyLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        words: Arc<dyn WordStatusRepository>,
        users: Arc<dyn UserRepository>,
        library: Arc<WordLibrary>,
    ) -> Self {
        Self {
            clock,
            words,
            users,
            library,
            seed: None,
        }
    }

    /// Shuffle every session from a fixed seed instead of OS entropy.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn library(&self) -> &WordLibrary {
        &self.library
    }

    fn shuffler(&self) -> Box<dyn Shuffler> {
        match self.seed {
            Some(seed) => Box::new(RngShuffler::seeded(seed)),
            None => Box::new(RngShuffler::from_os_rng()),
        }
    }

    async fn open_store(&self, user: UserKey) -> Result<WordStore, SessionError> {
        let store = WordStore::open(Arc::clone(&self.words), user, self.clock).await?;
        record_activity(self.users.as_ref(), store.user(), self.clock.now()).await?;
        Ok(store)
    }

    //
    // ─── STARTING ──────────────────────────────────────────────────────────────
    //

    /// Start a session over caller-supplied words.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the learner's store cannot be opened.
    pub async fn start_words(
        &self,
        user: UserKey,
        words: Vec<WordRecord>,
    ) -> Result<StudySession, SessionError> {
        self.start_with(user, words, StudySource::Custom).await
    }

    async fn start_with(
        &self,
        user: UserKey,
        words: Vec<WordRecord>,
        source: StudySource,
    ) -> Result<StudySession, SessionError> {
        let store = self.open_store(user).await?;
        tracing::debug!(
            user = %store.user(),
            words = words.len(),
            source = ?source,
            "starting study session"
        );
        let deck = DeckSession::new(words, self.shuffler());
        Ok(StudySession::new(deck, store, source))
    }

    /// Start a session over the selected days; an empty selection means every day.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the learner's store cannot be opened.
    pub async fn start_days(
        &self,
        user: UserKey,
        days: &[u32],
    ) -> Result<StudySession, SessionError> {
        let words = self.library.select_days(days);
        self.start_with(user, words, StudySource::Days(days.to_vec()))
            .await
    }

    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the learner's store cannot be opened.
    pub async fn start_supplementary(&self, user: UserKey) -> Result<StudySession, SessionError> {
        let words = self.library.supplementary.clone();
        self.start_with(user, words, StudySource::Supplementary)
            .await
    }

    /// Start a session over the learner's stored unknown words.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be opened or read.
    pub async fn start_unknown(&self, user: UserKey) -> Result<StudySession, SessionError> {
        self.start_from_status(user, StudyStatus::Unknown, StudySource::UnknownList)
            .await
    }

    /// Start a session over the learner's starred words.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be opened or read.
    pub async fn start_starred(&self, user: UserKey) -> Result<StudySession, SessionError> {
        self.start_from_status(user, StudyStatus::Starred, StudySource::StarredList)
            .await
    }

    async fn start_from_status(
        &self,
        user: UserKey,
        status: StudyStatus,
        source: StudySource,
    ) -> Result<StudySession, SessionError> {
        let store = self.open_store(user).await?;
        let words: Vec<WordRecord> = store
            .list_by_status(status)
            .await?
            .iter()
            .map(|entry| entry.to_record())
            .collect();
        tracing::debug!(
            user = %store.user(),
            words = words.len(),
            status = %status,
            "starting stored-list session"
        );
        let deck = DeckSession::new(words, self.shuffler());
        Ok(StudySession::new(deck, store, source))
    }

    //
    // ─── STEPPING ──────────────────────────────────────────────────────────────
    //

    /// Reveal the meaning of the current word. Returns `false` if it was already shown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Study` when there is no current word.
    pub fn reveal(&self, session: &mut StudySession) -> Result<bool, SessionError> {
        Ok(session.deck.reveal()?)
    }

    /// Resolve the current word, persist the outcome, then advance.
    ///
    /// A failed write is logged and returned on `StepResult::write_error`;
    /// the session advances regardless.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Study` when there is no current word.
    pub async fn resolve(
        &self,
        session: &mut StudySession,
        outcome: Outcome,
    ) -> Result<StepResult, SessionError> {
        let word = session.require_current()?.clone();
        let write_error = session.store.put_status(&word, outcome).await.err();
        if let Some(err) = &write_error {
            tracing::warn!(
                user = %session.user(),
                word = %word.id,
                error = %err,
                "failed to store study outcome"
            );
        }

        let resolution = session.deck.resolve(outcome)?;
        if let Advance::ReviewStarted { words } = resolution.advance {
            tracing::info!(user = %session.user(), words, "starting review pass");
        }

        Ok(StepResult {
            resolution,
            progress: session.deck.progress(),
            write_error,
        })
    }

    /// Drive the session with a swipe gesture.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Study` when there is no current word.
    pub async fn apply_gesture(
        &self,
        session: &mut StudySession,
        gesture: Gesture,
    ) -> Result<GestureStep, SessionError> {
        session.require_current()?;
        match gesture.action(session.is_revealed()) {
            GestureAction::Reveal => {
                self.reveal(session)?;
                Ok(GestureStep::Revealed)
            }
            GestureAction::Ignore => Ok(GestureStep::Ignored),
            GestureAction::Resolve(outcome) => {
                Ok(GestureStep::Resolved(self.resolve(session, outcome).await?))
            }
        }
    }

    /// Flip the starred flag of the current word and return the new flag.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Study` when there is no current word, or
    /// `SessionError::Storage` if the flag cannot be read or written.
    pub async fn toggle_star(&self, session: &mut StudySession) -> Result<bool, SessionError> {
        let word = session.require_current()?.clone();
        if session.store.is_starred(&word.id).await? {
            session.store.remove_starred(&word.id).await?;
            Ok(false)
        } else {
            session.store.put_starred(&word).await?;
            Ok(true)
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::Study` when there is no current word, or
    /// `SessionError::Storage` if the flag cannot be read.
    pub async fn is_current_starred(&self, session: &StudySession) -> Result<bool, SessionError> {
        let word = session.require_current()?;
        Ok(session.store.is_starred(&word.id).await?)
    }
}
