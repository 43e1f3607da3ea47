//! Seated player state.

use alloc::string::String;

use crate::hand::Hand;
use crate::result::HandOutcome;

use super::state::{PlayerId, PlayerStatus};

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub(super) id: PlayerId,
    pub(super) name: String,
    pub(super) hand: Hand,
    pub(super) score: u8,
    pub(super) status: PlayerStatus,
    pub(super) result: Option<HandOutcome>,
    pub(super) balance: u32,
    pub(super) bet: u32,
    pub(super) has_placed_bet: bool,
    pub(super) special_chances_used: u8,
    /// The bet placed before any double, re-armed by auto-rebet.
    pub(super) last_bet: u32,
}

impl Player {
    pub(super) const fn new(id: PlayerId, name: String, balance: u32) -> Self {
        Self {
            id,
            name,
            hand: Hand::new(),
            score: 0,
            status: PlayerStatus::Waiting,
            result: None,
            balance,
            bet: 0,
            has_placed_bet: false,
            special_chances_used: 0,
            last_bet: 0,
        }
    }

    /// Recomputes the cached score against the dealer's cards.
    pub(super) fn rescore(&mut self, dealer: &Hand) {
        self.score = self.hand.score(Some(dealer));
    }

    /// Clears the hand and per-hand state before a deal.
    pub(super) fn reset_hand(&mut self) {
        self.hand.clear();
        self.score = 0;
        self.status = PlayerStatus::Waiting;
        self.result = None;
        self.special_chances_used = 0;
    }

    /// Clears everything from the last round, bet included.
    pub(super) fn reset_round(&mut self) {
        self.reset_hand();
        self.bet = 0;
        self.has_placed_bet = false;
    }

    /// Returns any outstanding bet to the balance.
    pub(super) const fn refund_bet(&mut self) {
        if self.bet > 0 {
            self.balance += self.bet;
            self.bet = 0;
            self.has_placed_bet = false;
        }
    }

    /// Returns the player ID.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the player's hand.
    #[must_use]
    pub const fn hand(&self) -> &Hand {
        &self.hand
    }

    /// Returns the last computed score.
    #[must_use]
    pub const fn score(&self) -> u8 {
        self.score
    }

    /// Returns the seat status.
    #[must_use]
    pub const fn status(&self) -> PlayerStatus {
        self.status
    }

    /// Returns the hand outcome, once known.
    #[must_use]
    pub const fn result(&self) -> Option<HandOutcome> {
        self.result
    }

    /// Returns the money not currently at stake.
    #[must_use]
    pub const fn balance(&self) -> u32 {
        self.balance
    }

    /// Returns the amount at stake this round.
    #[must_use]
    pub const fn bet(&self) -> u32 {
        self.bet
    }

    /// Returns whether a bet was placed this round.
    #[must_use]
    pub const fn has_placed_bet(&self) -> bool {
        self.has_placed_bet
    }

    /// Returns how many special chances were used this round.
    #[must_use]
    pub const fn special_chances_used(&self) -> u8 {
        self.special_chances_used
    }
}
