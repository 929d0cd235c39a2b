mod progress;
mod session;
mod shuffle;

pub use progress::{DeckProgress, DeckSummary};
pub use session::{Advance, DeckPhase, DeckSession, Pass, Resolution, StudyError};
pub use shuffle::{InOrder, RngShuffler, Shuffler};
