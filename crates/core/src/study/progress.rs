use serde::Serialize;

/// Snapshot of where a session stands, for progress bars and headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeckProgress {
    /// Index of the current word in the active order.
    pub position: usize,
    /// Length of the active order (first pass or review pass).
    pub total: usize,
    pub reviewing: bool,
    pub complete: bool,
}

impl DeckProgress {
    /// `position / total`, or `0.0` for an empty session.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.position as f64 / self.total as f64
    }
}

/// What a finished (or abandoned) session went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub first_pass_words: usize,
    pub review_words: usize,
    pub complete: bool,
}

impl DeckSummary {
    #[must_use]
    pub fn reviewed(&self) -> bool {
        self.review_words > 0
    }
}
