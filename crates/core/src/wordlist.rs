//! Plain-text word sources.
//!
//! Two formats are supported:
//!
//! - grouped lists, where a line holding only a number opens a study day and
//!   each following line is `word meaning...` split at the first space
//! - supplementary lists, one `word|meaning` pair per line

use crate::model::{GroupId, WordGroup, WordId, WordRecord};

/// Parse a day-grouped word list.
///
/// Lines before the first day header, blank lines and lines without a space
/// are skipped. Ids are `"<day>_<n>"` where `n` counts accepted words of the day.
#[must_use]
pub fn parse_grouped(text: &str) -> Vec<WordGroup> {
    let mut groups = Vec::new();
    let mut current: Option<WordGroup> = None;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        if line.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(day) = line.parse::<u32>() {
                if let Some(done) = current.take() {
                    groups.push(done);
                }
                current = Some(WordGroup::new(day));
                continue;
            }
        }

        let Some(group) = current.as_mut() else {
            continue;
        };
        let Some((word, meaning)) = line.split_once(' ') else {
            continue;
        };
        let id = WordId::grouped(group.day, group.words.len() + 1);
        group
            .words
            .push(WordRecord::new(id, word, meaning, GroupId::Day(group.day)));
    }

    if let Some(done) = current {
        groups.push(done);
    }
    groups
}

/// Parse a `word|meaning` list.
///
/// Ids use the 1-based source line, so skipped lines leave gaps.
#[must_use]
pub fn parse_supplementary(text: &str) -> Vec<WordRecord> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let (word, meaning) = line.trim().split_once('|')?;
            let (word, meaning) = (word.trim(), meaning.trim());
            if word.is_empty() || meaning.is_empty() {
                return None;
            }
            Some(WordRecord::new(
                WordId::supplementary(idx + 1),
                word,
                meaning,
                GroupId::Supplementary,
            ))
        })
        .collect()
}

/// Every word source available to a learner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordLibrary {
    pub groups: Vec<WordGroup>,
    pub supplementary: Vec<WordRecord>,
}

impl WordLibrary {
    #[must_use]
    pub fn new(groups: Vec<WordGroup>, supplementary: Vec<WordRecord>) -> Self {
        Self {
            groups,
            supplementary,
        }
    }

    /// Build a library straight from the two text formats.
    #[must_use]
    pub fn parse(grouped: &str, supplementary: &str) -> Self {
        Self::new(parse_grouped(grouped), parse_supplementary(supplementary))
    }

    #[must_use]
    pub fn day_numbers(&self) -> Vec<u32> {
        self.groups.iter().map(|g| g.day).collect()
    }

    /// Words of the selected days, in library order.
    ///
    /// An empty selection means every day.
    #[must_use]
    pub fn select_days(&self, days: &[u32]) -> Vec<WordRecord> {
        self.groups
            .iter()
            .filter(|g| days.is_empty() || days.contains(&g.day))
            .flat_map(|g| g.words.iter().cloned())
            .collect()
    }

    #[must_use]
    pub fn word_count(&self, days: &[u32]) -> usize {
        self.groups
            .iter()
            .filter(|g| days.is_empty() || days.contains(&g.day))
            .map(WordGroup::len)
            .sum()
    }
}
