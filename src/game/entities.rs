use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Suit {
    Spades,
    Clubs,
    Diamonds,
    Hearts,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Clubs, Suit::Diamonds, Suit::Hearts];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Spades => "♠",
            Self::Clubs => "♣",
            Self::Diamonds => "♦",
            Self::Hearts => "♥",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CardColor {
    Black,
    Red,
}

/// A playing card: a rank from 1 (ace) to 13 (king) and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card {
    pub rank: u8,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: u8, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Rank as used for kicker comparisons, where the ace counts high.
    pub fn ace_high_value(&self) -> u8 {
        if self.rank == 1 { 14 } else { self.rank }
    }

    pub fn color(&self) -> CardColor {
        match self.suit {
            Suit::Spades | Suit::Clubs => CardColor::Black,
            Suit::Diamonds | Suit::Hearts => CardColor::Red,
        }
    }

    /// Display symbol for the rank: `A`, `2`..`10`, `J`, `Q`, `K`.
    pub fn symbol(&self) -> String {
        match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            rank => rank.to_string(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.symbol(), self.suit)
    }
}

/// Type alias for player money and the pot. Balances are plain dollars;
/// fractions only appear when an odd pot splits between winners.
pub type Money = f64;

/// A stable identity for one player session. A browser session keeps the
/// same id across every tab it opens, so several live connections may
/// share one `SessionId`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Everything the table tracks for one registered identity. Owned by the
/// member registry; round logic reads and writes it by session id and
/// never holds onto a copy.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRecord {
    /// Display name. Renames overwrite it without a uniqueness re-check.
    pub name: String,
    /// Current hand, replaced wholesale on submission.
    pub hand: Vec<Card>,
    pub submitted: bool,
    pub money: Money,
    pub anted: bool,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, stake: Money) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            submitted: false,
            money: stake,
            anted: false,
        }
    }

    /// Clear the per-round state after resolution.
    pub fn reset_round(&mut self) {
        self.hand.clear();
        self.submitted = false;
        self.anted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ace_counts_high_for_kickers_only() {
        let ace = Card::new(1, Suit::Hearts);
        assert_eq!(ace.rank, 1);
        assert_eq!(ace.ace_high_value(), 14);
        assert_eq!(Card::new(13, Suit::Spades).ace_high_value(), 13);
    }

    #[test]
    fn card_symbols() {
        assert_eq!(Card::new(1, Suit::Spades).to_string(), "A♠");
        assert_eq!(Card::new(10, Suit::Hearts).to_string(), "10♥");
        assert_eq!(Card::new(12, Suit::Diamonds).to_string(), "Q♦");
    }

    #[test]
    fn suit_colors() {
        assert_eq!(Card::new(2, Suit::Clubs).color(), CardColor::Black);
        assert_eq!(Card::new(2, Suit::Diamonds).color(), CardColor::Red);
    }

    #[test]
    fn card_wire_shape() {
        let card = Card::new(8, Suit::Clubs);
        let encoded = serde_json::to_string(&card).unwrap();
        assert_eq!(encoded, r#"{"rank":8,"suit":"CLUBS"}"#);
        let decoded: Card = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, card);
    }

    #[test]
    fn round_reset_clears_flags_and_hand() {
        let mut record = PlayerRecord::new("Lucky Ace", 20.0);
        record.hand = vec![Card::new(4, Suit::Spades)];
        record.submitted = true;
        record.anted = true;
        record.reset_round();
        assert!(record.hand.is_empty());
        assert!(!record.submitted);
        assert!(!record.anted);
        assert_eq!(record.money, 20.0);
    }
}
