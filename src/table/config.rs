//! Table configuration.

use serde::{Deserialize, Serialize};

use crate::game::constants::{
    CHAT_HISTORY_LIMIT, DECK_REFILL_THRESHOLD, DEFAULT_ANTE, DEFAULT_MAILBOX_CAPACITY,
    DEFAULT_STARTING_STAKE,
};
use crate::game::entities::Money;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TableConfig {
    /// Table name, used in logs.
    pub name: String,

    /// Stake each player starts with.
    pub starting_stake: Money,

    /// Fixed ante collected per `ANTE` command.
    pub ante: Money,

    /// Deck refills itself at this size or below.
    pub refill_threshold: usize,

    /// Chat messages retained for replay to late joiners.
    pub chat_history_limit: usize,

    /// Capacity of the actor inbox.
    pub mailbox_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Main Table".to_string(),
            starting_stake: DEFAULT_STARTING_STAKE,
            ante: DEFAULT_ANTE,
            refill_threshold: DECK_REFILL_THRESHOLD,
            chat_history_limit: CHAT_HISTORY_LIMIT,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.starting_stake.is_finite() || self.starting_stake <= 0.0 {
            return Err("Starting stake must be a positive amount".to_string());
        }

        if !self.ante.is_finite() || self.ante < 0.0 {
            return Err("Ante must be a non-negative amount".to_string());
        }

        if self.ante > self.starting_stake {
            return Err("Ante cannot exceed the starting stake".to_string());
        }

        if self.mailbox_capacity == 0 {
            return Err("Mailbox capacity must be at least 1".to_string());
        }

        Ok(())
    }
}
