//! The winning-hand evaluator seam. The concrete poker ranking table lives
//! outside the engine; all the engine needs is a strict ordering key per
//! rank class and a name to show players.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::Card;

/// The rank class of an evaluated hand. Two hands with equal `ordering`
/// belong to the same class and fall through to kicker comparison; a
/// greater `ordering` beats a lesser one outright.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct HandRanking {
    pub ordering: u32,
    /// Class display name, e.g. "Pair" or "Straight".
    pub name: String,
}

impl fmt::Display for HandRanking {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// Capability that classifies a hand of up to five cards.
pub trait HandEvaluator: Send {
    fn evaluate(&self, hand: &[Card]) -> HandRanking;
}
