//! Hand outcomes and round settlement results.

use alloc::vec::Vec;

use serde::Serialize;

use crate::hand::Hand;
use crate::table::PlayerId;

/// Result of a player's hand against the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandOutcome {
    /// Natural against a dealer without one.
    Blackjack,
    /// Player beats the dealer or the dealer busts.
    Win,
    /// Dealer beats the player.
    Lose,
    /// Tie; the bet is returned.
    Push,
    /// Player went over 21.
    Bust,
}

impl HandOutcome {
    /// Returns the amount credited back to the player for a settled `bet`.
    ///
    /// The bet itself was deducted when it was placed, so a push returns
    /// `bet`, a win `2 * bet` and a blackjack `floor(2.5 * bet)`.
    #[must_use]
    pub const fn payout(self, bet: u32) -> u32 {
        match self {
            Self::Blackjack => bet.saturating_mul(5) / 2,
            Self::Win => bet.saturating_mul(2),
            Self::Push => bet,
            Self::Lose | Self::Bust => 0,
        }
    }
}

/// Decides the outcome of a finished player hand against the dealer.
///
/// The player's score is taken with the dealer's cards as context (for wild
/// cards); the dealer is scored on its own. The checks run in a fixed order
/// and the first match wins.
#[must_use]
pub fn resolve(player: &Hand, dealer: &Hand, player_busted: bool, dealer_busted: bool) -> HandOutcome {
    let player_natural = player.is_natural();
    let dealer_natural = dealer.is_natural();

    if player_busted {
        HandOutcome::Bust
    } else if player_natural && !dealer_natural {
        HandOutcome::Blackjack
    } else if dealer_busted {
        HandOutcome::Win
    } else if dealer_natural && !player_natural {
        HandOutcome::Lose
    } else if player_natural && dealer_natural {
        HandOutcome::Push
    } else {
        let player_value = player.score(Some(dealer));
        let dealer_value = dealer.score(None);
        match player_value.cmp(&dealer_value) {
            core::cmp::Ordering::Greater => HandOutcome::Win,
            core::cmp::Ordering::Less => HandOutcome::Lose,
            core::cmp::Ordering::Equal => HandOutcome::Push,
        }
    }
}

/// Settlement of a single player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerResult {
    /// The player ID.
    pub player_id: PlayerId,
    /// The outcome of the hand.
    pub outcome: HandOutcome,
    /// The bet that was settled.
    pub bet: u32,
    /// The amount credited to the player's balance.
    pub payout: u32,
    /// The player's hand value.
    pub player_value: u8,
}

/// Result of the entire round after settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// Results for each player, in seating order.
    pub players: Vec<PlayerResult>,
    /// The dealer's final hand value.
    pub dealer_value: u8,
    /// Whether the dealer busted.
    pub dealer_bust: bool,
    /// Whether the dealer had a natural.
    pub dealer_blackjack: bool,
}
