use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix of the row key that holds a word's starred flag.
pub const STARRED_KEY_PREFIX: &str = "starred_";

/// Prefix used for ids of the supplementary (ungrouped) word list.
pub const SUPPLEMENTARY_ID_PREFIX: &str = "olympic";

/// Stable identifier of a word inside one word source.
///
/// Grouped words use `"<day>_<ordinal>"`, supplementary words use
/// `"olympic_<line>"`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordId(String);

impl WordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the `ordinal`-th word (1-based) of study day `day`.
    #[must_use]
    pub fn grouped(day: u32, ordinal: usize) -> Self {
        Self(format!("{day}_{ordinal}"))
    }

    /// Id of a supplementary word found on `line` (1-based) of its source text.
    #[must_use]
    pub fn supplementary(line: usize) -> Self {
        Self(format!("{SUPPLEMENTARY_ID_PREFIX}_{line}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Row key of the starred entry for this word.
    #[must_use]
    pub fn starred_key(&self) -> String {
        format!("{STARRED_KEY_PREFIX}{}", self.0)
    }
}

impl fmt::Debug for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WordId({})", self.0)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Study group a word belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupId {
    /// A numbered study day.
    Day(u32),
    /// The flat supplementary list.
    Supplementary,
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Day(n) => write!(f, "{n}"),
            GroupId::Supplementary => f.write_str("supplementary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse {kind} from {raw:?}")]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

impl FromStr for GroupId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supplementary" | SUPPLEMENTARY_ID_PREFIX => Ok(GroupId::Supplementary),
            other => other.parse::<u32>().map(GroupId::Day).map_err(|_| ParseIdError {
                kind: "GroupId",
                raw: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum UserKeyError {
    #[error("user key cannot be empty")]
    Empty,
    #[error("user key may only contain ASCII letters: {0:?}")]
    InvalidCharacters(String),
}

/// Opaque key that namespaces every stored row of one learner.
///
/// Only ASCII letters are accepted; there is no length limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserKey(String);

impl UserKey {
    /// # Errors
    ///
    /// Returns `UserKeyError` if the key is empty or contains anything but ASCII letters.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserKeyError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(UserKeyError::Empty);
        }
        if !raw.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(UserKeyError::InvalidCharacters(raw));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserKey {
    type Err = UserKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_ids_follow_source_position() {
        assert_eq!(WordId::grouped(3, 12).as_str(), "3_12");
        assert_eq!(WordId::supplementary(7).as_str(), "olympic_7");
        assert_eq!(WordId::new("1_2").starred_key(), "starred_1_2");
    }

    #[test]
    fn group_id_parses_days_and_supplementary() {
        assert_eq!("14".parse::<GroupId>().unwrap(), GroupId::Day(14));
        assert_eq!("supplementary".parse::<GroupId>().unwrap(), GroupId::Supplementary);
        assert_eq!("olympic".parse::<GroupId>().unwrap(), GroupId::Supplementary);
        assert!("day-one".parse::<GroupId>().is_err());
        assert_eq!(GroupId::Day(2).to_string(), "2");
    }

    #[test]
    fn user_key_accepts_letters_only() {
        assert!(UserKey::new("alice").is_ok());
        assert!(UserKey::new("ALICEbob").is_ok());
        assert_eq!(UserKey::new(""), Err(UserKeyError::Empty));
        assert!(matches!(
            UserKey::new("alice1"),
            Err(UserKeyError::InvalidCharacters(_))
        ));
        assert!(UserKey::new("al ice").is_err());
        assert!(UserKey::new("j\u{e9}r\u{f4}me").is_err());
    }
}
