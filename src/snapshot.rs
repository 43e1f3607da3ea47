//! Broadcastable table state.
//!
//! A snapshot is a full replacement of what clients show, never a delta.
//! The shoe is reported by size only. Face-down cards are included with
//! their flag set; hiding them is left to the client.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::Serialize;

use crate::card::Card;
use crate::result::HandOutcome;
use crate::table::{GamePhase, Player, PlayerId, Table};

/// Size of the shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeckCount {
    /// Cards remaining.
    pub length: usize,
}

/// A card as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    /// `hearts`, `diamonds`, `clubs`, `spades` or `wild`.
    pub suit: &'static str,
    /// `A`, `2`..`10`, `J`, `Q`, `K` or `WILD`.
    pub rank: &'static str,
    /// Unique card id.
    pub id: String,
    /// Whether the card lies face down.
    pub is_face_down: bool,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            suit: card.suit_label(),
            rank: card.rank_label(),
            id: card.to_string(),
            is_face_down: card.face_down,
        }
    }
}

/// A seat as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// Player ID.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Cards held.
    pub hand: Vec<CardView>,
    /// Hand value against the dealer's cards.
    pub score: u8,
    /// `waiting`, `playing` or `finished`.
    pub status: &'static str,
    /// Hand outcome, once known.
    pub result: Option<HandOutcome>,
    /// Whether this seat holds the turn.
    pub is_current_player: bool,
    /// Money not at stake.
    pub balance: u32,
    /// Money at stake.
    pub bet: u32,
    /// Whether a bet was placed this round.
    pub has_placed_bet: bool,
    /// Special chances used this round.
    pub special_chances_used: u8,
    /// Whether a special chance is being resolved.
    pub is_using_special_chance: bool,
}

impl PlayerView {
    fn new(player: &Player, is_current_player: bool) -> Self {
        Self {
            id: player.id(),
            name: player.name().to_string(),
            hand: player.hand().cards().iter().map(CardView::from).collect(),
            score: player.score(),
            status: player.status().as_str(),
            result: player.result(),
            is_current_player,
            balance: player.balance(),
            bet: player.bet(),
            has_placed_bet: player.has_placed_bet(),
            special_chances_used: player.special_chances_used(),
            is_using_special_chance: player.status().is_using_special_chance(),
        }
    }
}

/// Everything clients see of the table after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    /// Shoe size.
    pub deck: DeckCount,
    /// Dealer cards, face-down ones included.
    pub dealer_hand: Vec<CardView>,
    /// Dealer hand value.
    pub dealer_score: u8,
    /// Seats in seating order.
    pub players: Vec<PlayerView>,
    /// Phase of the round.
    pub game_status: GamePhase,
    /// Seat holding (or last holding) the turn.
    pub current_player_index: usize,
    /// Set when a player left mid-round.
    pub disconnect_message: Option<String>,
}

impl TableSnapshot {
    /// Captures `table`, attaching an optional notice.
    #[must_use]
    pub fn capture(table: &Table, disconnect_message: Option<String>) -> Self {
        let current = table.current_player();

        Self {
            deck: DeckCount {
                length: table.cards_remaining(),
            },
            dealer_hand: table
                .dealer_hand()
                .cards()
                .iter()
                .map(CardView::from)
                .collect(),
            dealer_score: table.dealer_hand().score(None),
            players: table
                .players()
                .iter()
                .map(|p| PlayerView::new(p, current == Some(p.id())))
                .collect(),
            game_status: table.phase(),
            current_player_index: table.current_player_index(),
            disconnect_message,
        }
    }

    /// Returns the view of the given seat, if present.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }
}
