//! Property-based tests for showdown resolution using proptest
//!
//! These tests pin down the invariants of the kicker tie-break across
//! randomly generated contender sets: determinism, independence from entry
//! order, and winners holding exactly the maximum kicker key.

use std::collections::BTreeSet;

use proptest::prelude::*;

use card_table::{Card, HandRanking, SessionId, ShowdownEntry, Suit};
use card_table::game::showdown::{kicker_key, resolve};

fn card_strategy() -> impl Strategy<Value = Card> {
    (1u8..=13, 0usize..4).prop_map(|(rank, suit_idx)| Card::new(rank, Suit::ALL[suit_idx]))
}

fn hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), 5)
}

// All contenders share one rank class, so resolution always reaches the
// kicker comparison.
fn entries_strategy() -> impl Strategy<Value = Vec<ShowdownEntry>> {
    prop::collection::vec(hand_strategy(), 2..6).prop_map(|hands| {
        hands
            .into_iter()
            .enumerate()
            .map(|(i, hand)| ShowdownEntry {
                session: SessionId::new(format!("s{i}")),
                name: format!("player {i}"),
                hand,
                ranking: HandRanking {
                    ordering: 0,
                    name: "High Card".to_string(),
                },
            })
            .collect()
    })
}

fn winner_set(entries: Vec<ShowdownEntry>) -> BTreeSet<SessionId> {
    resolve(entries)
        .expect("non-empty entries resolve")
        .winners
        .into_iter()
        .collect()
}

proptest! {
    #[test]
    fn winners_are_a_nonempty_subset_of_contenders(entries in entries_strategy()) {
        let sessions: BTreeSet<SessionId> =
            entries.iter().map(|entry| entry.session.clone()).collect();
        let winners = winner_set(entries);
        prop_assert!(!winners.is_empty());
        prop_assert!(winners.is_subset(&sessions));
    }

    #[test]
    fn resolution_ignores_entry_order(entries in entries_strategy(), rotation in 0usize..6) {
        let forward = winner_set(entries.clone());

        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(winner_set(reversed), forward.clone());

        let mut rotated = entries.clone();
        let len = rotated.len();
        rotated.rotate_left(rotation % len);
        prop_assert_eq!(winner_set(rotated), forward);
    }

    #[test]
    fn winners_hold_exactly_the_maximum_kicker_key(entries in entries_strategy()) {
        let best = entries
            .iter()
            .map(|entry| kicker_key(&entry.hand))
            .max()
            .unwrap();
        let winners = winner_set(entries.clone());
        for entry in &entries {
            let wins = winners.contains(&entry.session);
            prop_assert_eq!(wins, kicker_key(&entry.hand) == best);
        }
    }

    #[test]
    fn resolution_is_deterministic(entries in entries_strategy()) {
        prop_assert_eq!(winner_set(entries.clone()), winner_set(entries));
    }

    #[test]
    fn even_split_conserves_the_pot(entries in entries_strategy(), pot in 0.0f64..1000.0) {
        let winners = winner_set(entries);
        let share = pot / winners.len() as f64;
        let paid = share * winners.len() as f64;
        prop_assert!((paid - pot).abs() < 1e-9);
    }
}
