//! Table phase, seat status and player identity types.

use core::fmt;

use serde::{Serialize, Serializer};

/// Phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    /// Seats are filling up and bets are being placed.
    Waiting,
    /// Initial cards are being dealt.
    Dealing,
    /// Players take their turns.
    Playing,
    /// The dealer plays out their hand.
    DealerTurn,
    /// The round is settled (or was abandoned).
    Finished,
}

impl GamePhase {
    /// Returns the wire name of the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Dealing => "dealing",
            Self::Playing => "playing",
            Self::DealerTurn => "dealer-turn",
            Self::Finished => "finished",
        }
    }

    /// Returns whether a round is underway (dealt but not yet settled).
    #[must_use]
    pub const fn in_progress(self) -> bool {
        !matches!(self, Self::Waiting | Self::Finished)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a seat within the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerStatus {
    /// Not yet dealt in, or waiting for their turn.
    Waiting,
    /// Holds the turn.
    Playing,
    /// Holds the turn with a special chance awaiting resolution. No other
    /// action is accepted from the seat until it resolves.
    SpecialChance {
        /// Index of the card being replaced.
        card_index: usize,
        /// Identifies this particular request.
        ticket: u64,
    },
    /// Done for this round.
    Finished,
}

impl PlayerStatus {
    /// Returns the wire name of the status.
    ///
    /// A pending special chance still reports `"playing"`; the pending flag
    /// is carried separately.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Playing | Self::SpecialChance { .. } => "playing",
            Self::Finished => "finished",
        }
    }

    /// Returns whether the seat is done for this round.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Returns whether a special chance is awaiting resolution.
    #[must_use]
    pub const fn is_using_special_chance(self) -> bool {
        matches!(self, Self::SpecialChance { .. })
    }
}

/// Connection-scoped identifier of a seated player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

impl Serialize for PlayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
