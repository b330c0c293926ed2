//! The shared deck: an ordered, owned sequence of cards with draw/shuffle/add
//! notifications and an optional self-replenishment policy.
//!
//! The deck is expected to live behind a single owner (the table actor), so
//! every draw, including the replenish check it may trigger, runs as one
//! uninterrupted mutation.

use rand::seq::SliceRandom;
use thiserror::Error;

use super::constants::{DECK_REFILL_THRESHOLD, SHUFFLE_PASSES};
use super::entities::{Card, Suit};

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum DeckError {
    #[error("the deck is empty")]
    Empty,
}

/// Fixed-arity notification hooks fired synchronously from inside the
/// mutation that produced the event. Observers see the deck's effects but
/// can never re-enter it; replenishment is the deck's own policy.
pub trait DeckObserver: Send {
    fn on_add(&mut self, cards: &[Card]) {
        let _ = cards;
    }

    fn on_draw(&mut self, card: Card, remaining: usize) {
        let _ = (card, remaining);
    }

    fn on_shuffle(&mut self) {}
}

#[derive(Clone, Copy, Debug)]
pub struct DeckOptions {
    /// When set, a fresh 52-card set is appended and reshuffled whenever the
    /// size drops to the threshold or below, so draws never run dry.
    pub refill_threshold: Option<usize>,
    /// Passes made by [`Deck::true_random_shuffle`].
    pub shuffle_passes: usize,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            refill_threshold: None,
            shuffle_passes: SHUFFLE_PASSES,
        }
    }
}

/// All 52 cards of a single suit-set, in suit-then-rank order.
pub fn standard_cards() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in 1..=13 {
            cards.push(Card::new(rank, suit));
        }
    }
    cards
}

pub struct Deck {
    cards: Vec<Card>,
    refill_threshold: Option<usize>,
    shuffle_passes: usize,
    observer: Option<Box<dyn DeckObserver>>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self::with_options(cards, DeckOptions::default())
    }

    pub fn with_options(cards: Vec<Card>, options: DeckOptions) -> Self {
        Self {
            cards,
            refill_threshold: options.refill_threshold,
            shuffle_passes: options.shuffle_passes,
            observer: None,
        }
    }

    /// A single 52-card deck with no refill policy.
    pub fn standard() -> Self {
        Self::new(standard_cards())
    }

    /// A 52-card deck that tops itself up at the default threshold.
    pub fn standard_replenishing() -> Self {
        Self::with_options(
            standard_cards(),
            DeckOptions {
                refill_threshold: Some(DECK_REFILL_THRESHOLD),
                ..DeckOptions::default()
            },
        )
    }

    pub fn set_observer(&mut self, observer: Box<dyn DeckObserver>) {
        self.observer = Some(observer);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    /// Position of the first matching card, front of the deck first.
    pub fn position(&self, card: &Card) -> Option<usize> {
        self.cards.iter().position(|c| c == card)
    }

    /// Remove and return the card at the front of the deck, then apply the
    /// refill policy. Fails only when the deck is out of cards after any
    /// refill has had its chance.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        if self.cards.is_empty() {
            self.refill_if_needed();
        }
        if self.cards.is_empty() {
            return Err(DeckError::Empty);
        }
        let card = self.cards.remove(0);
        let remaining = self.cards.len();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_draw(card, remaining);
        }
        self.refill_if_needed();
        Ok(card)
    }

    /// Draw `count` cards from the front. All-or-nothing: when the deck runs
    /// out mid-way the drawn prefix is put back in its original order and the
    /// deck is left as if nothing had been drawn.
    pub fn draw_many(&mut self, count: usize) -> Result<Vec<Card>, DeckError> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            match self.draw() {
                Ok(card) => drawn.push(card),
                Err(error) => {
                    for card in drawn.into_iter().rev() {
                        self.cards.insert(0, card);
                    }
                    return Err(error);
                }
            }
        }
        Ok(drawn)
    }

    /// Randomize the ordering with a single pass.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
        if let Some(observer) = self.observer.as_mut() {
            observer.on_shuffle();
        }
    }

    /// Shuffle several times over to wash out weak single-pass artifacts.
    pub fn true_random_shuffle(&mut self) {
        for _ in 0..self.shuffle_passes {
            self.shuffle();
        }
    }

    pub fn add_cards(&mut self, cards: &[Card]) {
        self.cards.extend_from_slice(cards);
        if let Some(observer) = self.observer.as_mut() {
            observer.on_add(cards);
        }
    }

    /// Append another deck's cards wholesale. Duplicates are expected; the
    /// deck is a sequence, not a set.
    pub fn add_deck(&mut self, other: Deck) {
        let cards = other.into_cards();
        self.add_cards(&cards);
    }

    fn refill_if_needed(&mut self) {
        let Some(threshold) = self.refill_threshold else {
            return;
        };
        if self.cards.len() > threshold {
            return;
        }
        let fresh = standard_cards();
        self.add_cards(&fresh);
        self.true_random_shuffle();
    }
}
