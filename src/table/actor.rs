//! The table actor. It owns the member registry, the shared deck, and the
//! round state, and processes one message at a time, so draws are atomic,
//! per-identity mutations are linearizable, and resolution can never observe
//! a half-reset record.

use std::collections::VecDeque;

use log::{debug, info, warn};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::game::deck::{Deck, DeckOptions, standard_cards};
use crate::game::entities::{Card, Money, SessionId};
use crate::game::rank::HandEvaluator;
use crate::game::showdown::{self, ShowdownEntry};
use crate::net::connection::ConnectionHandle;
use crate::net::messages::{ChatMessage, Command, ServerMessage, Update};

use super::config::TableConfig;
use super::errors::TableError;
use super::messages::{PlayerState, TableMessage, TableState};
use super::registry::Registry;
use super::round::RoundState;

/// Cloneable handle for feeding a running [`TableActor`].
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
}

impl TableHandle {
    pub async fn join(&self, session: SessionId, connection: ConnectionHandle) {
        let _ = self
            .sender
            .send(TableMessage::Join { session, connection })
            .await;
    }

    pub async fn leave(&self, session: SessionId, connection: Uuid) {
        let _ = self
            .sender
            .send(TableMessage::Leave { session, connection })
            .await;
    }

    pub async fn command(&self, session: SessionId, command: Command) {
        let _ = self
            .sender
            .send(TableMessage::Command { session, command })
            .await;
    }

    /// Decode and forward a raw `{type, payload}` frame. Malformed frames
    /// are logged and dropped; the connection stays open.
    pub async fn frame(&self, session: SessionId, text: &str) {
        match Command::decode(text) {
            Ok(command) => self.command(session, command).await,
            Err(error) => warn!("dropping malformed frame from {session}: {error}"),
        }
    }

    /// Snapshot of the table, or `None` when the actor is gone.
    pub async fn state(&self) -> Option<TableState> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(TableMessage::GetState { response })
            .await
            .ok()?;
        receiver.await.ok()
    }

    pub async fn close(&self) {
        let _ = self.sender.send(TableMessage::Close).await;
    }
}

pub struct TableActor {
    config: TableConfig,
    registry: Registry,
    round: RoundState,
    deck: Deck,
    evaluator: Box<dyn HandEvaluator>,
    history: VecDeque<ChatMessage>,
    inbox: mpsc::Receiver<TableMessage>,
}

impl TableActor {
    pub fn new(config: TableConfig, evaluator: Box<dyn HandEvaluator>) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(config.mailbox_capacity);
        let mut deck = Deck::with_options(
            standard_cards(),
            DeckOptions {
                refill_threshold: Some(config.refill_threshold),
                ..DeckOptions::default()
            },
        );
        deck.true_random_shuffle();

        let actor = Self {
            round: RoundState::new(config.ante),
            config,
            registry: Registry::new(),
            deck,
            evaluator,
            history: VecDeque::new(),
            inbox,
        };
        (actor, TableHandle { sender })
    }

    /// Spawn the actor onto the current runtime and return its handle.
    pub fn spawn(config: TableConfig, evaluator: Box<dyn HandEvaluator>) -> TableHandle {
        let (actor, handle) = Self::new(config, evaluator);
        tokio::spawn(actor.run());
        handle
    }

    pub async fn run(mut self) {
        info!("table '{}' open", self.config.name);
        while let Some(message) = self.inbox.recv().await {
            match message {
                TableMessage::Join {
                    session,
                    connection,
                } => self.handle_join(&session, connection),
                TableMessage::Leave {
                    session,
                    connection,
                } => self.handle_leave(&session, connection),
                TableMessage::Command { session, command } => {
                    self.handle_command(&session, command);
                }
                TableMessage::GetState { response } => {
                    let _ = response.send(self.snapshot());
                }
                TableMessage::Close => break,
            }
        }
        info!("table '{}' closed", self.config.name);
    }

    fn handle_join(&mut self, session: &SessionId, connection: ConnectionHandle) {
        let record = self.registry.join(session, self.config.starting_stake);
        let name = record.name.clone();
        let connection_id = connection.id();
        let first = self.registry.attach(session, connection);
        info!("member joined: {name}");

        // The fresh connection gets its name, the roster, and enough chat
        // history for context; everyone hears about the first connection.
        let mut welcome = vec![
            ServerMessage::Update(Update::Name(name.clone())),
            ServerMessage::Update(Update::Roster(self.registry.roster())),
        ];
        welcome.extend(self.history.iter().cloned().map(ServerMessage::Chat));

        let mut failed = Vec::new();
        for message in &welcome {
            if !self.deliver_to_connection(session, connection_id, message) {
                failed.push((session.clone(), connection_id));
                break;
            }
        }
        if first {
            failed.extend(self.broadcast_notice(format!("{name} just connected")));
        }
        self.sweep_failures(failed);
    }

    fn handle_leave(&mut self, session: &SessionId, connection: Uuid) {
        if let Some(record) = self.registry.detach(session, connection) {
            info!("member left: {}", record.name);
            let failed = self.broadcast_notice(format!("{} left the table", record.name));
            self.sweep_failures(failed);
        }
    }

    fn handle_command(&mut self, session: &SessionId, command: Command) {
        if !self.registry.contains(session) {
            debug!("ignoring command from unknown session {session}");
            return;
        }
        debug!("{session}: {command}");
        match command {
            Command::GetHand(cards) => self.handle_get_hand(session, &cards),
            Command::DrawCards(count) => self.handle_draw(session, count),
            Command::SubmitHand(cards) => self.handle_submit(session, cards),
            Command::Rename(name) => self.handle_rename(session, name),
            Command::Ante => self.handle_ante(session),
            Command::BetMoney(amount) => self.handle_bet(session, amount),
            Command::MoneyCheck => self.handle_money_check(session),
            Command::Chat(body) => self.handle_chat(session, body),
        }
    }

    fn handle_get_hand(&mut self, session: &SessionId, cards: &[Card]) {
        let ranking = self.evaluator.evaluate(cards);
        let failed = self.send_to(session, &ServerMessage::GetHand(ranking.name));
        self.sweep_failures(failed);
    }

    fn handle_draw(&mut self, session: &SessionId, count: usize) {
        let failed = match self.deck.draw_many(count) {
            Ok(cards) => self.send_to(session, &ServerMessage::DrawCards(cards)),
            Err(error) => {
                warn!("draw of {count} cards failed: {error}");
                let notice = ChatMessage::server("The deck has run dry; no cards were drawn.");
                self.send_to(session, &ServerMessage::Chat(notice))
            }
        };
        self.sweep_failures(failed);
    }

    fn handle_submit(&mut self, session: &SessionId, cards: Vec<Card>) {
        if let Some(record) = self.registry.record_mut(session) {
            record.hand = cards;
            record.submitted = true;
        }
        if self.registry.all_players(|record| record.submitted) {
            self.resolve_round();
        }
    }

    fn handle_rename(&mut self, session: &SessionId, name: String) {
        if let Some(record) = self.registry.record(session) {
            info!("member renamed: from {} to {name}", record.name);
        }
        let _ = self.registry.rename(session, name);
    }

    fn handle_ante(&mut self, session: &SessionId) {
        let Some(record) = self.registry.record_mut(session) else {
            return;
        };
        self.round.collect_ante(record);
        let money = record.money;
        let ante = self.round.ante();
        let mut failed = self.send_to(
            session,
            &ServerMessage::Ante(format!("You anted ${ante}. You have ${money}.")),
        );
        if self.registry.len() > 1
            && self.registry.all_players(|record| record.anted)
            && self.round.mark_ante_announced()
        {
            failed.extend(
                self.broadcast_notice(format!("Everyone has anted. The pot is ${}.", self.round.pot())),
            );
        }
        self.sweep_failures(failed);
    }

    fn handle_bet(&mut self, session: &SessionId, amount: Money) {
        let Some(record) = self.registry.record_mut(session) else {
            return;
        };
        let reply = match self.round.place_bet(record, amount) {
            Ok(()) => format!("You bet ${amount}. The pot is now ${}.", self.round.pot()),
            Err(TableError::InsufficientFunds { balance, .. }) => {
                format!("You can't cover a ${amount} bet with ${balance}.")
            }
            Err(_) => return,
        };
        let failed = self.send_to(session, &ServerMessage::BetMoney(reply));
        self.sweep_failures(failed);
    }

    fn handle_money_check(&mut self, session: &SessionId) {
        let Some(record) = self.registry.record(session) else {
            return;
        };
        let failed = self.send_to(session, &ServerMessage::MoneyCheck(record.money));
        self.sweep_failures(failed);
    }

    fn handle_chat(&mut self, session: &SessionId, body: String) {
        let Some(record) = self.registry.record(session) else {
            return;
        };
        let message = ChatMessage::new(record.name.clone(), body);
        self.history.push_back(message.clone());
        while self.history.len() > self.config.chat_history_limit {
            self.history.pop_front();
        }
        let failed = self.broadcast(&ServerMessage::Chat(message));
        self.sweep_failures(failed);
    }

    /// Everyone has submitted: rank the hands, pay the winners, reset the
    /// round, and publish the full standings.
    fn resolve_round(&mut self) {
        let entries: Vec<ShowdownEntry> = self
            .registry
            .records()
            .map(|(session, record)| ShowdownEntry {
                session: session.clone(),
                name: record.name.clone(),
                hand: record.hand.clone(),
                ranking: self.evaluator.evaluate(&record.hand),
            })
            .collect();
        let Some(result) = showdown::resolve(entries) else {
            return;
        };

        let pot = self.round.take_pot();
        let share = pot / result.winners.len() as Money;
        for session in &result.winners {
            if let Some(record) = self.registry.record_mut(session) {
                record.money += share;
            }
        }

        let winner_names: Vec<&str> = result
            .standings
            .iter()
            .filter(|entry| result.winners.contains(&entry.session))
            .map(|entry| entry.name.as_str())
            .collect();
        let mut summary = format!(
            "{} won ${pot} with a {}",
            winner_names.join(", "),
            result.ranking.name
        );
        for entry in &result.standings {
            let cards: Vec<String> = entry.hand.iter().map(ToString::to_string).collect();
            summary.push_str(&format!(
                "\n{} had a {} with: [{}]",
                entry.name,
                entry.ranking.name,
                cards.join(", ")
            ));
        }
        info!(
            "round resolved: {} winner(s) split ${pot}",
            result.winners.len()
        );

        for (_, record) in self.registry.records_mut() {
            record.reset_round();
        }
        self.round.reset();

        let failed = self.broadcast_notice(summary);
        self.sweep_failures(failed);
    }

    fn snapshot(&self) -> TableState {
        TableState {
            pot: self.round.pot(),
            deck_size: self.deck.len(),
            players: self
                .registry
                .records()
                .map(|(session, record)| PlayerState {
                    name: record.name.clone(),
                    money: record.money,
                    anted: record.anted,
                    submitted: record.submitted,
                    hand: record.hand.clone(),
                    connections: self.registry.connections_of(session).len(),
                })
                .collect(),
        }
    }

    fn deliver_to_connection(
        &self,
        session: &SessionId,
        connection: Uuid,
        message: &ServerMessage,
    ) -> bool {
        self.registry
            .connections_of(session)
            .iter()
            .find(|handle| handle.id() == connection)
            .is_some_and(|handle| handle.send(message).is_ok())
    }

    /// Deliver to every connection of one identity. Returns the connections
    /// that failed.
    fn send_to(&self, session: &SessionId, message: &ServerMessage) -> Vec<(SessionId, Uuid)> {
        let mut failed = Vec::new();
        for handle in self.registry.connections_of(session) {
            if handle.send(message).is_err() {
                failed.push((session.clone(), handle.id()));
            }
        }
        failed
    }

    /// Deliver to every connection of every identity. A failed connection
    /// never stops delivery to the rest of the batch.
    fn broadcast(&self, message: &ServerMessage) -> Vec<(SessionId, Uuid)> {
        let mut failed = Vec::new();
        for (session, handle) in self.registry.fan_out_targets() {
            if handle.send(message).is_err() {
                failed.push((session, handle.id()));
            }
        }
        failed
    }

    fn broadcast_notice(&self, body: String) -> Vec<(SessionId, Uuid)> {
        self.broadcast(&ServerMessage::Chat(ChatMessage::server(body)))
    }

    /// Close and detach connections that failed a send, announcing any
    /// identity that fully left as a result. Announcements run through the
    /// normal broadcast path, so connections that fail while being told are
    /// swept too; the live set strictly shrinks, so this terminates.
    fn sweep_failures(&mut self, mut failed: Vec<(SessionId, Uuid)>) {
        while !failed.is_empty() {
            let mut departed = Vec::new();
            for (session, connection) in failed.drain(..) {
                let handle = self
                    .registry
                    .connections_of(&session)
                    .iter()
                    .find(|handle| handle.id() == connection)
                    .cloned();
                if let Some(handle) = handle {
                    handle.close("send failed");
                }
                warn!("dropping connection {connection} of {session}: send failed");
                if let Some(record) = self.registry.detach(&session, connection) {
                    departed.push(record.name);
                }
            }
            for name in departed {
                info!("member left: {name}");
                failed.extend(self.broadcast_notice(format!("{name} left the table")));
            }
        }
    }
}
