//! Error types for table operations.

use thiserror::Error;

use crate::shoe::EmptyDeckError;
use crate::table::GamePhase;

/// Reasons an intent is rejected by the table.
///
/// A rejected intent never changes the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// The connection has no seat at the table.
    #[error("you are not in the game")]
    NotInGame,
    /// The table is full or the connection is already seated.
    #[error("{0}")]
    SeatUnavailable(&'static str),
    /// Another seated player already uses this name.
    #[error("this name is already taken, please choose a different name")]
    NameConflict,
    /// The action is not allowed in the current phase.
    #[error("cannot do that while the table is {phase}")]
    WrongPhase {
        /// The phase the table was in.
        phase: GamePhase,
    },
    /// It is not this player's turn.
    #[error("it is not your turn")]
    NotYourTurn,
    /// The bet amount is out of bounds, not a whole number, or unaffordable.
    #[error("{0}")]
    InvalidAmount(&'static str),
    /// Dealing needs every seat filled and every bet placed.
    #[error("{0}")]
    IncompleteTable(&'static str),
    /// The player may not take this action right now.
    #[error("{0}")]
    IneligibleAction(&'static str),
    /// The shoe ran dry mid-round.
    #[error("internal error: {0}")]
    EmptyDeck(#[from] EmptyDeckError),
}

impl TableError {
    /// Returns a stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotInGame => "NOT_IN_GAME",
            Self::SeatUnavailable(_) => "SEAT_UNAVAILABLE",
            Self::NameConflict => "NAME_CONFLICT",
            Self::WrongPhase { .. } => "WRONG_PHASE",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::IncompleteTable(_) => "INCOMPLETE_TABLE",
            Self::IneligibleAction(_) => "INELIGIBLE_ACTION",
            Self::EmptyDeck(_) => "EMPTY_DECK",
        }
    }
}
