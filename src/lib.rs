//! # Card Table
//!
//! A real-time, multi-client card-game session engine. The table tracks
//! connected players, keeps a shared self-replenishing deck, runs repeated
//! ante/bet/hand-submission rounds, settles each round with kicker-correct
//! tie-breaks, and fans every state change out to all of a player's open
//! connections.
//!
//! ## Architecture
//!
//! - [`game`]: cards, the deck engine, the evaluator seam, and showdown
//!   resolution
//! - [`net`]: the `{type, payload}` message envelope and the connection seam
//! - [`table`]: the actor that owns all mutable state and serializes every
//!   operation
//!
//! Transport (sockets, handshakes, session cookies) and the concrete poker
//! ranking table live outside this crate: transports feed the table through
//! a [`TableHandle`] and implement [`Connection`]; a ranking table
//! implements [`HandEvaluator`].
//!
//! ## Example
//!
//! ```
//! use card_table::{Card, HandEvaluator, HandRanking, TableActor, TableConfig};
//!
//! struct HighCard;
//!
//! impl HandEvaluator for HighCard {
//!     fn evaluate(&self, hand: &[Card]) -> HandRanking {
//!         let high = hand.iter().map(Card::ace_high_value).max().unwrap_or(0);
//!         HandRanking { ordering: u32::from(high), name: "High Card".to_string() }
//!     }
//! }
//!
//! let (actor, handle) = TableActor::new(TableConfig::default(), Box::new(HighCard));
//! // tokio::spawn(actor.run());
//! # drop(actor);
//! # drop(handle);
//! ```

/// Core game entities and logic.
pub mod game;
pub use game::{
    constants,
    deck::{Deck, DeckError, DeckObserver, DeckOptions},
    entities::{Card, CardColor, Money, PlayerRecord, SessionId, Suit},
    rank::{HandEvaluator, HandRanking},
    showdown::{ShowdownEntry, ShowdownResult},
};

/// Message envelopes and the connection seam.
pub mod net;
pub use net::{
    connection::{ChannelConnection, Connection, ConnectionHandle, SendFailure},
    messages::{ChatMessage, Command, ProtocolError, ServerMessage, Update},
};

/// The table actor and its state.
pub mod table;
pub use table::{
    PlayerState, TableActor, TableConfig, TableError, TableHandle, TableMessage, TableState,
};
