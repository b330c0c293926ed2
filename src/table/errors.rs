use thiserror::Error;

use crate::game::entities::Money;

/// Errors from table operations on behalf of a player. All of these are
/// recovered locally: the originating connection may hear about them, the
/// rest of the table never does.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TableError {
    #[error("no player is registered for this session")]
    UnknownIdentity,
    #[error("a ${wanted} bet doesn't fit a ${balance} balance")]
    InsufficientFunds { wanted: Money, balance: Money },
}
