use serde::{Deserialize, Serialize};

use crate::model::status::StudyStatus;

/// Row counts per status. Always derived from stored rows, never stored itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub known: u32,
    pub learned: u32,
    pub unknown: u32,
    pub starred: u32,
}

impl Statistics {
    /// Count one row under its status.
    pub fn record(&mut self, status: StudyStatus) {
        let slot = match status {
            StudyStatus::Known => &mut self.known,
            StudyStatus::Learned => &mut self.learned,
            StudyStatus::Unknown => &mut self.unknown,
            StudyStatus::Starred => &mut self.starred,
        };
        *slot = slot.saturating_add(1);
    }

    /// Words with a study status. Starred rows are not part of the total.
    #[must_use]
    pub fn total_studied(&self) -> u32 {
        self.known
            .saturating_add(self.learned)
            .saturating_add(self.unknown)
    }

    /// Share of studied words that are known or learned, rounded half up.
    ///
    /// `0` when nothing has been studied yet.
    #[must_use]
    pub fn progress_percentage(&self) -> u32 {
        let total = u64::from(self.total_studied());
        if total == 0 {
            return 0;
        }
        let done = u64::from(self.known) + u64::from(self.learned);
        // (200 * done + total) / (2 * total) == round(100 * done / total)
        let pct = (200 * done + total) / (2 * total);
        u32::try_from(pct).unwrap_or(100)
    }
}

impl FromIterator<StudyStatus> for Statistics {
    fn from_iter<I: IntoIterator<Item = StudyStatus>>(iter: I) -> Self {
        let mut stats = Statistics::default();
        for status in iter {
            stats.record(status);
        }
        stats
    }
}
