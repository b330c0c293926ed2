//! The `{type, payload}` message envelope spoken over connections. The
//! concrete wire encoding belongs to the transport; the engine only fixes
//! the semantic payload shape per message type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::game::constants::MAX_HAND_SIZE;
use crate::game::entities::{Card, Money};

/// Sender name used for table notices.
pub const SERVER_NAME: &str = "server";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed command: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("hand holds {len} cards, the limit is {}", MAX_HAND_SIZE)]
    OversizedHand { len: usize },
    #[error("card rank {rank} is outside 1..=13")]
    RankOutOfBounds { rank: u8 },
}

/// A player command. The session identity is implicit from the connection
/// the command arrived on.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Ask for a reading of an arbitrary hand; answered to the sender only.
    GetHand(Vec<Card>),
    /// Draw this many cards from the shared deck.
    DrawCards(usize),
    /// Submit a hand for the round, replacing any previous submission.
    SubmitHand(Vec<Card>),
    /// Change display name. No uniqueness check.
    Rename(String),
    /// Pay the table's fixed ante into the pot.
    Ante,
    /// Put money in the pot, subject to a solvency check.
    BetMoney(Money),
    /// Ask for the current balance.
    MoneyCheck,
    /// Say something to the whole table.
    Chat(String),
}

impl Command {
    /// Decode a raw frame and validate payload bounds. Callers are expected
    /// to log and drop failures; a malformed frame never takes the
    /// connection down.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let command: Self = serde_json::from_str(text)?;
        command.validate()?;
        Ok(command)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    fn validate(&self) -> Result<(), ProtocolError> {
        let cards = match self {
            Self::GetHand(cards) | Self::SubmitHand(cards) => cards.as_slice(),
            _ => return Ok(()),
        };
        if cards.len() > MAX_HAND_SIZE {
            return Err(ProtocolError::OversizedHand { len: cards.len() });
        }
        if let Some(card) = cards.iter().find(|card| !(1..=13).contains(&card.rank)) {
            return Err(ProtocolError::RankOutOfBounds { rank: card.rank });
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::GetHand(cards) => format!("asked for a reading of {} cards", cards.len()),
            Self::DrawCards(count) => format!("asked to draw {count} cards"),
            Self::SubmitHand(cards) => format!("submitted {} cards", cards.len()),
            Self::Rename(name) => format!("renamed themselves {name}"),
            Self::Ante => "anted".to_string(),
            Self::BetMoney(amount) => format!("bet ${amount}"),
            Self::MoneyCheck => "checked their balance".to_string(),
            Self::Chat(_) => "sent a chat message".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// A chat line, either from a player or from the table itself.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ChatMessage {
    pub from: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            body: body.into(),
            sent_at: Utc::now(),
        }
    }

    /// A notice from the table.
    pub fn server(body: impl Into<String>) -> Self {
        Self::new(SERVER_NAME, body)
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.from, self.body)
    }
}

/// Payload of an `UPDATE` message.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Update {
    /// The display name assigned to the receiving session.
    Name(String),
    /// Display names of everyone currently at the table.
    Roster(Vec<String>),
}

/// A message from the table to a connection.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    Update(Update),
    /// Rank class name for a `GET_HAND` request.
    GetHand(String),
    /// Cards drawn for a `DRAW_CARDS` request.
    DrawCards(Vec<Card>),
    /// Ante acknowledgement for the sender.
    Ante(String),
    /// Bet acknowledgement or rejection for the sender.
    BetMoney(String),
    /// Current balance for a `MONEY_CHECK` request.
    MoneyCheck(Money),
    /// Player chat or a table notice.
    Chat(ChatMessage),
}

impl ServerMessage {
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Suit;

    #[test]
    fn decode_submit_hand() {
        let text = r#"{"type":"SUBMIT_HAND","payload":[{"rank":10,"suit":"DIAMONDS"},{"rank":11,"suit":"DIAMONDS"}]}"#;
        let command = Command::decode(text).unwrap();
        assert_eq!(
            command,
            Command::SubmitHand(vec![
                Card::new(10, Suit::Diamonds),
                Card::new(11, Suit::Diamonds),
            ])
        );
    }

    #[test]
    fn decode_payloadless_commands() {
        assert_eq!(Command::decode(r#"{"type":"ANTE"}"#).unwrap(), Command::Ante);
        assert_eq!(
            Command::decode(r#"{"type":"MONEY_CHECK"}"#).unwrap(),
            Command::MoneyCheck
        );
    }

    #[test]
    fn decode_bet_and_draw() {
        assert_eq!(
            Command::decode(r#"{"type":"BET_MONEY","payload":2.5}"#).unwrap(),
            Command::BetMoney(2.5)
        );
        assert_eq!(
            Command::decode(r#"{"type":"DRAW_CARDS","payload":5}"#).unwrap(),
            Command::DrawCards(5)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            Command::decode("not json at all"),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            Command::decode(r#"{"type":"BET_MONEY","payload":"lots"}"#),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            Command::decode(r#"{"type":"FOLD"}"#),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn oversized_hand_is_rejected() {
        let cards: Vec<String> = (2..=7)
            .map(|rank| format!(r#"{{"rank":{rank},"suit":"CLUBS"}}"#))
            .collect();
        let text = format!(r#"{{"type":"SUBMIT_HAND","payload":[{}]}}"#, cards.join(","));
        assert!(matches!(
            Command::decode(&text),
            Err(ProtocolError::OversizedHand { len: 6 })
        ));
    }

    #[test]
    fn out_of_range_rank_is_rejected() {
        let text = r#"{"type":"GET_HAND","payload":[{"rank":14,"suit":"CLUBS"}]}"#;
        assert!(matches!(
            Command::decode(text),
            Err(ProtocolError::RankOutOfBounds { rank: 14 })
        ));
        let text = r#"{"type":"GET_HAND","payload":[{"rank":0,"suit":"CLUBS"}]}"#;
        assert!(matches!(
            Command::decode(text),
            Err(ProtocolError::RankOutOfBounds { rank: 0 })
        ));
    }

    #[test]
    fn command_roundtrip() {
        let command = Command::Rename("Velvet Fox".to_string());
        let encoded = command.encode().unwrap();
        assert_eq!(Command::decode(&encoded).unwrap(), command);
    }

    #[test]
    fn update_payload_shapes() {
        let name = ServerMessage::Update(Update::Name("Lucky Ace".to_string()));
        assert_eq!(
            name.encode().unwrap(),
            r#"{"type":"UPDATE","payload":"Lucky Ace"}"#
        );

        let roster = ServerMessage::Update(Update::Roster(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(
            roster.encode().unwrap(),
            r#"{"type":"UPDATE","payload":["a","b"]}"#
        );
        assert_eq!(ServerMessage::decode(&roster.encode().unwrap()).unwrap(), roster);
    }

    #[test]
    fn chat_message_carries_sender_and_timestamp() {
        let message = ChatMessage::server("Everyone has anted.");
        assert_eq!(message.from, SERVER_NAME);
        let encoded = ServerMessage::Chat(message.clone()).encode().unwrap();
        let decoded = ServerMessage::decode(&encoded).unwrap();
        assert_eq!(decoded, ServerMessage::Chat(message));
    }
}
