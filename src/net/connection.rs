//! The connection seam. Transports hand the table an object that can push
//! messages toward one peer; the table never waits on a peer and treats a
//! rejected send as that connection going away.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::messages::ServerMessage;

/// A connection rejected an outbound message. The peer is gone or hopelessly
/// backed up; either way the table closes and detaches it.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("connection dropped the outbound message")]
pub struct SendFailure;

/// One live connection for a session.
pub trait Connection: Send + Sync {
    /// Queue a message for delivery. Must not block; failure means the
    /// connection is no longer usable.
    fn send(&self, message: &ServerMessage) -> Result<(), SendFailure>;

    /// Best-effort close. May be called more than once.
    fn close(&self, reason: &str);
}

/// A [`Connection`] paired with the id the registry tracks it under.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: Uuid,
    conn: Arc<dyn Connection>,
}

impl ConnectionHandle {
    pub fn new(conn: Arc<dyn Connection>) -> Self {
        Self {
            id: Uuid::new_v4(),
            conn,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn send(&self, message: &ServerMessage) -> Result<(), SendFailure> {
        self.conn.send(message)
    }

    pub fn close(&self, reason: &str) {
        self.conn.close(reason);
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// A connection backed by a bounded channel. The transport end drains the
/// receiver and writes frames to the wire; a full or dropped receiver shows
/// up here as a [`SendFailure`].
pub struct ChannelConnection {
    outbox: mpsc::Sender<ServerMessage>,
    closed: AtomicBool,
}

impl ChannelConnection {
    /// Create a handle for the table and the receiver for the transport.
    pub fn pair(capacity: usize) -> (ConnectionHandle, mpsc::Receiver<ServerMessage>) {
        let (outbox, inbox) = mpsc::channel(capacity);
        let conn = Arc::new(Self {
            outbox,
            closed: AtomicBool::new(false),
        });
        (ConnectionHandle::new(conn), inbox)
    }
}

impl Connection for ChannelConnection {
    fn send(&self, message: &ServerMessage) -> Result<(), SendFailure> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SendFailure);
        }
        self.outbox
            .try_send(message.clone())
            .map_err(|_| SendFailure)
    }

    fn close(&self, reason: &str) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            log::debug!("connection closed: {reason}");
        }
    }
}
