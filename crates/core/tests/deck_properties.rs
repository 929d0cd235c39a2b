use std::collections::HashMap;

use proptest::prelude::*;
use vocab_core::gesture::{Gesture, GestureAction};
use vocab_core::model::{GroupId, Outcome, WordId, WordRecord};
use vocab_core::study::{Advance, DeckPhase, DeckSession, Pass, RngShuffler};

fn words(n: usize) -> Vec<WordRecord> {
    (1..=n)
        .map(|i| WordRecord::new(WordId::grouped(1, i), format!("w{i}"), "m", GroupId::Day(1)))
        .collect()
}

fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Known),
        Just(Outcome::Learned),
        Just(Outcome::Unknown),
    ]
}

proptest! {
    #[test]
    fn shuffled_order_is_a_permutation(n in 1usize..40, seed in any::<u64>()) {
        let input = words(n);
        let session = DeckSession::new(input.clone(), Box::new(RngShuffler::seeded(seed)));

        let mut expected: Vec<_> = input.iter().map(|w| w.id.clone()).collect();
        let mut actual: Vec<_> = session.order().iter().map(|w| w.id.clone()).collect();
        expected.sort();
        actual.sort();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn full_session_visits_first_pass_once_and_unknowns_once_more(
        outcomes in proptest::collection::vec(outcome_strategy(), 1..30),
        review_outcome in outcome_strategy(),
        seed in any::<u64>(),
    ) {
        let n = outcomes.len();
        let mut session = DeckSession::new(words(n), Box::new(RngShuffler::seeded(seed)));

        let mut first_pass: HashMap<WordId, usize> = HashMap::new();
        let mut review_pass: HashMap<WordId, usize> = HashMap::new();
        let mut first_unknown = Vec::new();

        for outcome in &outcomes {
            let res = session.resolve(*outcome).unwrap();
            prop_assert_eq!(res.pass, Pass::First);
            *first_pass.entry(res.word.id.clone()).or_default() += 1;
            if *outcome == Outcome::Unknown {
                first_unknown.push(res.word.id.clone());
            }
        }

        prop_assert_eq!(first_pass.len(), n);
        prop_assert!(first_pass.values().all(|&c| c == 1));

        while !session.is_complete() {
            let res = session.resolve(review_outcome).unwrap();
            prop_assert_eq!(res.pass, Pass::Review);
            *review_pass.entry(res.word.id.clone()).or_default() += 1;
        }

        prop_assert_eq!(review_pass.len(), first_unknown.len());
        prop_assert!(review_pass.values().all(|&c| c == 1));
        for id in &first_unknown {
            prop_assert!(review_pass.contains_key(id));
        }
        prop_assert_eq!(session.phase(), DeckPhase::Complete);
    }

    #[test]
    fn unrevealed_swipes_resolve_learned(n in 1usize..15, left in any::<bool>()) {
        let mut session = DeckSession::new(words(n), Box::new(RngShuffler::seeded(n as u64)));
        let gesture = if left { Gesture::Left } else { Gesture::Right };
        while !session.is_complete() {
            let GestureAction::Resolve(outcome) = gesture.action(session.is_revealed()) else {
                panic!("swipe on a hidden card must resolve");
            };
            prop_assert_eq!(outcome, Outcome::Learned);
            let res = session.resolve(outcome).unwrap();
            prop_assert!(!matches!(res.advance, Advance::ReviewStarted { .. }), "unexpected ReviewStarted advance");
        }
        prop_assert!(!session.summary().reviewed());
    }
}
