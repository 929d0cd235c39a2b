//! Swipe gestures and the study step each one triggers.

use crate::model::Outcome;

/// Gesture vocabulary of the study card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Swipe down: show the meaning.
    Reveal,
    Left,
    Right,
}

/// What a gesture asks the deck to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Reveal,
    Resolve(Outcome),
    /// Reveal gesture on an already revealed card.
    Ignore,
}

impl Gesture {
    /// Map this gesture to a deck action given the current reveal state.
    ///
    /// Swiping either way before revealing yields `Learned`: the learner claims
    /// recall without checking the meaning. After revealing, left is `Unknown`
    /// and right is `Known`.
    #[must_use]
    pub fn action(self, revealed: bool) -> GestureAction {
        match (self, revealed) {
            (Gesture::Reveal, false) => GestureAction::Reveal,
            (Gesture::Reveal, true) => GestureAction::Ignore,
            (Gesture::Left | Gesture::Right, false) => GestureAction::Resolve(Outcome::Learned),
            (Gesture::Left, true) => GestureAction::Resolve(Outcome::Unknown),
            (Gesture::Right, true) => GestureAction::Resolve(Outcome::Known),
        }
    }
}
