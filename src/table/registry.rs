//! The member registry: one record per session identity, plus the set of
//! live connections currently open for it. A record exists exactly as long
//! as its identity has at least one connection.
//!
//! The registry is plain owned state; the table actor is its single owner,
//! which is what makes every operation here linearizable per identity.

use std::collections::HashMap;

use rand::Rng;
use uuid::Uuid;

use crate::game::entities::{Money, PlayerRecord, SessionId};
use crate::net::connection::ConnectionHandle;

use super::errors::TableError;

const NAME_LEADS: [&str; 16] = [
    "Lucky", "Bluffing", "Crooked", "Velvet", "Midnight", "Rowdy", "Sly", "Dapper", "Grinning",
    "Wandering", "Copper", "Marble", "Daring", "Quiet", "Rusty", "Gilded",
];

const NAME_TAILS: [&str; 16] = [
    "Ace", "Joker", "Duke", "Baron", "Shark", "Fox", "Magpie", "Drifter", "Gambit", "Whistler",
    "Crow", "Badger", "Jack", "Queenie", "Dealer", "Maverick",
];

#[derive(Default)]
pub struct Registry {
    records: HashMap<SessionId, PlayerRecord>,
    connections: HashMap<SessionId, Vec<ConnectionHandle>>,
    name_seq: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or create the record for a session. First joins get a
    /// generated display name that is unique among active players.
    pub fn join(&mut self, session: &SessionId, stake: Money) -> &PlayerRecord {
        if !self.records.contains_key(session) {
            let name = self.generate_name();
            self.records
                .insert(session.clone(), PlayerRecord::new(name, stake));
        }
        &self.records[session]
    }

    /// Add a connection to the session's set. Returns whether it was the
    /// first, i.e. whether the identity just came online.
    pub fn attach(&mut self, session: &SessionId, handle: ConnectionHandle) -> bool {
        let list = self.connections.entry(session.clone()).or_default();
        list.push(handle);
        list.len() == 1
    }

    /// Remove a connection from the session's set. When the set empties the
    /// record is deleted and returned, so callers can announce the
    /// departure. No zombie players survive their last connection.
    pub fn detach(&mut self, session: &SessionId, connection: Uuid) -> Option<PlayerRecord> {
        let list = self.connections.get_mut(session)?;
        list.retain(|handle| handle.id() != connection);
        if list.is_empty() {
            self.connections.remove(session);
            return self.records.remove(session);
        }
        None
    }

    /// Overwrite the display name. Collisions with other players are
    /// possible after a rename; only generated names are kept unique.
    pub fn rename(&mut self, session: &SessionId, name: impl Into<String>) -> Result<(), TableError> {
        let record = self
            .records
            .get_mut(session)
            .ok_or(TableError::UnknownIdentity)?;
        record.name = name.into();
        Ok(())
    }

    /// Reverse lookup for addressed delivery.
    pub fn lookup_by_name(&self, name: &str) -> Option<&SessionId> {
        self.records
            .iter()
            .find(|(_, record)| record.name == name)
            .map(|(session, _)| session)
    }

    pub fn contains(&self, session: &SessionId) -> bool {
        self.records.contains_key(session)
    }

    pub fn record(&self, session: &SessionId) -> Option<&PlayerRecord> {
        self.records.get(session)
    }

    pub fn record_mut(&mut self, session: &SessionId) -> Option<&mut PlayerRecord> {
        self.records.get_mut(session)
    }

    pub fn records(&self) -> impl Iterator<Item = (&SessionId, &PlayerRecord)> {
        self.records.iter()
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = (&SessionId, &mut PlayerRecord)> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the registry is non-empty and every record satisfies the
    /// predicate. An empty table never counts as "everyone".
    pub fn all_players(&self, predicate: impl Fn(&PlayerRecord) -> bool) -> bool {
        !self.records.is_empty() && self.records.values().all(predicate)
    }

    pub fn roster(&self) -> Vec<String> {
        self.records.values().map(|record| record.name.clone()).collect()
    }

    pub fn connections_of(&self, session: &SessionId) -> &[ConnectionHandle] {
        self.connections
            .get(session)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Snapshot of every connection of every identity, so fan-out can run
    /// without holding a borrow on the maps.
    pub fn fan_out_targets(&self) -> Vec<(SessionId, ConnectionHandle)> {
        self.connections
            .iter()
            .flat_map(|(session, handles)| {
                handles
                    .iter()
                    .map(move |handle| (session.clone(), handle.clone()))
            })
            .collect()
    }

    fn generate_name(&mut self) -> String {
        let mut rng = rand::rng();
        for _ in 0..32 {
            let lead = NAME_LEADS[rng.random_range(0..NAME_LEADS.len())];
            let tail = NAME_TAILS[rng.random_range(0..NAME_TAILS.len())];
            let name = format!("{lead} {tail}");
            if !self.name_taken(&name) {
                return name;
            }
        }
        // The word lists can fill up with enough players at once; fall back
        // to a numbered name rather than loop forever.
        loop {
            self.name_seq += 1;
            let name = format!("Player {}", self.name_seq);
            if !self.name_taken(&name) {
                return name;
            }
        }
    }

    fn name_taken(&self, name: &str) -> bool {
        self.records.values().any(|record| record.name == name)
    }
}
