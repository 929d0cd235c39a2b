mod entry;
mod ids;
mod stats;
mod status;
mod word;

pub use entry::WordEntry;
pub use ids::{
    GroupId, ParseIdError, STARRED_KEY_PREFIX, SUPPLEMENTARY_ID_PREFIX, UserKey, UserKeyError,
    WordId,
};
pub use stats::Statistics;
pub use status::{Outcome, StatusParseError, StudyStatus};
pub use word::{WordGroup, WordRecord};
