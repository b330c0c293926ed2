//! The table: a single actor owning the member registry, the shared deck,
//! and the round state.
//!
//! The actor runs in its own Tokio task and drains an mpsc inbox. Connection
//! tasks (however many a player has open) talk to it exclusively through a
//! [`TableHandle`], so all registry and round mutation is serialized in one
//! place and broadcast fan-out never races a join or leave.
//!
//! ## Example
//!
//! ```ignore
//! use card_table::table::{TableActor, TableConfig};
//!
//! let (actor, handle) = TableActor::new(TableConfig::default(), evaluator);
//! tokio::spawn(actor.run());
//! // handle.join(session, connection).await;
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod messages;
pub mod registry;
pub mod round;

pub use actor::{TableActor, TableHandle};
pub use config::TableConfig;
pub use errors::TableError;
pub use messages::{PlayerState, TableMessage, TableState};
pub use registry::Registry;
pub use round::RoundState;
