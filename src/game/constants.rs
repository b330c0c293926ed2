//! Default stakes, ante, and deck thresholds.
//!
//! Values carried over from the original `PokerServer`/`PokerGame` sources
//! and the spec's `TableConfig` defaults.

use super::entities::Money;

/// Stake each player starts with.
pub const DEFAULT_STARTING_STAKE: Money = 20.0;

/// Fixed ante collected per round.
pub const DEFAULT_ANTE: Money = 5.0;

/// The deck tops itself up when its size drops to this value or below.
pub const DECK_REFILL_THRESHOLD: usize = 5;

/// Passes made by a "true random" shuffle.
pub const SHUFFLE_PASSES: usize = 7;

/// Chat messages retained for replay to late joiners.
pub const CHAT_HISTORY_LIMIT: usize = 100;

/// Largest hand a player may submit.
pub const MAX_HAND_SIZE: usize = 5;

/// Default capacity of the table actor's inbox.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1024;
