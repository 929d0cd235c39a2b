use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::WordRecord;

/// Ordering capability handed to a `DeckSession`.
///
/// Called once when the session is built and once more when the review pass
/// starts.
pub trait Shuffler: Send {
    fn shuffle(&mut self, words: &mut [WordRecord]);
}

/// Uniform Fisher-Yates permutation driven by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngShuffler<R = StdRng> {
    rng: R,
}

impl RngShuffler<StdRng> {
    /// Unseeded generator: every session gets a fresh order.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible order for replaying a session.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R> RngShuffler<R> {
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> Shuffler for RngShuffler<R> {
    fn shuffle(&mut self, words: &mut [WordRecord]) {
        words.shuffle(&mut self.rng);
    }
}

/// Keeps source order. Useful for scripted walkthroughs.
#[derive(Debug, Clone, Copy, Default)]
pub struct InOrder;

impl Shuffler for InOrder {
    fn shuffle(&mut self, _words: &mut [WordRecord]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GroupId, WordId};

    fn words(n: usize) -> Vec<WordRecord> {
        (1..=n)
            .map(|i| WordRecord::new(WordId::grouped(1, i), format!("w{i}"), "m", GroupId::Day(1)))
            .collect()
    }

    fn ids(words: &[WordRecord]) -> Vec<String> {
        words.iter().map(|w| w.id.to_string()).collect()
    }

    #[test]
    fn same_seed_replays_same_order() {
        let mut a = words(20);
        let mut b = words(20);
        RngShuffler::seeded(7).shuffle(&mut a);
        RngShuffler::seeded(7).shuffle(&mut b);
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn in_order_is_identity() {
        let mut w = words(5);
        InOrder.shuffle(&mut w);
        assert_eq!(ids(&w), ids(&words(5)));
    }
}
