//! JSON frames exchanged over the socket.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TableError;
use crate::snapshot::TableSnapshot;
use crate::table::{Intent, PlayerId};

/// A bet amount as clients send it: a JSON number or a numeric string.
///
/// Anything else (including a missing field) is kept as [`BetAmount::Other`]
/// so the sender gets an error back instead of a dropped frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BetAmount {
    /// `"betAmount": 10`
    Number(f64),
    /// `"betAmount": "10"`
    Text(String),
    /// `null`, missing, or any other JSON value.
    Other(Value),
}

impl Default for BetAmount {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

impl BetAmount {
    /// Converts to a whole-number amount.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidAmount`] for anything that is not a
    /// non-negative whole number.
    pub fn to_amount(&self) -> Result<u32, TableError> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| TableError::InvalidAmount("bet amount must be a number"))?,
            Self::Other(_) => {
                return Err(TableError::InvalidAmount("bet amount must be a number"));
            }
        };

        if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX)
        {
            return Err(TableError::InvalidAmount(
                "bet amount must be a whole number",
            ));
        }

        Ok(value as u32)
    }
}

/// A card index as clients send it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CardIndex {
    /// `"cardIndex": 1`
    Index(i64),
    /// `null`, missing, or any other JSON value.
    Other(Value),
}

impl Default for CardIndex {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

impl CardIndex {
    /// Converts to a hand position.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::IneligibleAction`] for anything that is not a
    /// non-negative integer.
    pub fn to_index(&self) -> Result<usize, TableError> {
        match self {
            Self::Index(index) => usize::try_from(*index).ok(),
            Self::Other(_) => None,
        }
        .ok_or(TableError::IneligibleAction("invalid card index"))
    }
}

/// Inbound frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Take a seat.
    JoinGame {
        /// Requested name; blank or missing picks a default.
        #[serde(rename = "playerName", default)]
        player_name: Option<String>,
    },
    /// Place a bet.
    PlaceBet {
        /// Amount to bet.
        #[serde(rename = "betAmount", default)]
        bet_amount: BetAmount,
    },
    /// Deal the round.
    DealCards,
    /// Draw a card.
    PlayerHit,
    /// Keep the hand.
    PlayerStand,
    /// Double down.
    PlayerDouble,
    /// Swap a card in hand.
    RequestSpecialChance {
        /// Index of the card to swap.
        #[serde(rename = "cardIndex", default)]
        card_index: CardIndex,
    },
    /// Shuffle the face-down cards between their holders.
    ShuffleFaceDownCards,
    /// Reset for another round.
    NewGame,
}

impl ClientMessage {
    /// Converts the frame into a table intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the bet amount is not a whole number or the card
    /// index is not a non-negative integer.
    pub fn into_intent(self) -> Result<Intent, TableError> {
        Ok(match self {
            Self::JoinGame { player_name } => Intent::Join {
                name: player_name.unwrap_or_default(),
            },
            Self::PlaceBet { bet_amount } => Intent::PlaceBet {
                amount: bet_amount.to_amount()?,
            },
            Self::DealCards => Intent::DealCards,
            Self::PlayerHit => Intent::Hit,
            Self::PlayerStand => Intent::Stand,
            Self::PlayerDouble => Intent::Double,
            Self::RequestSpecialChance { card_index } => Intent::RequestSpecialChance {
                card_index: card_index.to_index()?,
            },
            Self::ShuffleFaceDownCards => Intent::ShuffleFaceDownCards,
            Self::NewGame => Intent::NewGame,
        })
    }
}

/// Outbound frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Seat acknowledgement, sent only to the joining connection.
    Joined {
        /// The seat's player ID.
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        /// The name actually used.
        #[serde(rename = "playerName")]
        player_name: String,
    },
    /// Rejection, sent only to the offending connection.
    Error {
        /// Machine-readable code.
        code: &'static str,
        /// Human-readable reason.
        message: String,
    },
    /// Full table state, sent to every connection.
    GameState(TableSnapshot),
}

impl From<TableError> for ServerMessage {
    fn from(err: TableError) -> Self {
        Self::Error {
            code: err.code(),
            message: err.to_string(),
        }
    }
}
