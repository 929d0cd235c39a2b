use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid study status: {0:?}")]
pub struct StatusParseError(pub String);

/// Persisted status of a stored row.
///
/// `Starred` only ever appears on starred rows; status rows carry one of the
/// other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyStatus {
    Known,
    Learned,
    Unknown,
    Starred,
}

impl StudyStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StudyStatus::Known => "known",
            StudyStatus::Learned => "learned",
            StudyStatus::Unknown => "unknown",
            StudyStatus::Starred => "starred",
        }
    }
}

impl fmt::Display for StudyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "known" => Ok(StudyStatus::Known),
            "learned" => Ok(StudyStatus::Learned),
            "unknown" => Ok(StudyStatus::Unknown),
            "starred" => Ok(StudyStatus::Starred),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

/// Result of one study step for the current word.
///
/// - `Known`: meaning revealed, learner knew it
/// - `Learned`: swiped without revealing the meaning
/// - `Unknown`: meaning revealed, learner did not know it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Known,
    Learned,
    Unknown,
}

impl From<Outcome> for StudyStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Known => StudyStatus::Known,
            Outcome::Learned => StudyStatus::Learned,
            Outcome::Unknown => StudyStatus::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_matches_storage_encoding() {
        for status in [
            StudyStatus::Known,
            StudyStatus::Learned,
            StudyStatus::Unknown,
            StudyStatus::Starred,
        ] {
            assert_eq!(status.as_str().parse::<StudyStatus>().unwrap(), status);
        }
        assert!("forgotten".parse::<StudyStatus>().is_err());
    }

    #[test]
    fn outcomes_never_map_to_starred() {
        assert_eq!(StudyStatus::from(Outcome::Unknown), StudyStatus::Unknown);
        assert_eq!(StudyStatus::from(Outcome::Learned), StudyStatus::Learned);
        assert_eq!(StudyStatus::from(Outcome::Known), StudyStatus::Known);
    }
}
