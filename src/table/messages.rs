//! Table actor message types.

use serde::Serialize;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::game::entities::{Card, Money, SessionId};
use crate::net::connection::ConnectionHandle;
use crate::net::messages::Command;

/// Messages accepted by a running `TableActor`.
#[derive(Debug)]
pub enum TableMessage {
    /// A connection opened for a session.
    Join {
        session: SessionId,
        connection: ConnectionHandle,
    },

    /// A connection closed, cleanly or not.
    Leave {
        session: SessionId,
        connection: Uuid,
    },

    /// A decoded player command.
    Command {
        session: SessionId,
        command: Command,
    },

    /// Snapshot request for tests and observability.
    GetState {
        response: oneshot::Sender<TableState>,
    },

    /// Stop the actor. Connections are left to their transports.
    Close,
}

/// Point-in-time view of the table.
#[derive(Clone, Debug, Serialize)]
pub struct TableState {
    pub pot: Money,
    pub deck_size: usize,
    pub players: Vec<PlayerState>,
}

impl TableState {
    pub fn player(&self, name: &str) -> Option<&PlayerState> {
        self.players.iter().find(|player| player.name == name)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerState {
    pub name: String,
    pub money: Money,
    pub anted: bool,
    pub submitted: bool,
    pub hand: Vec<Card>,
    pub connections: usize,
}
