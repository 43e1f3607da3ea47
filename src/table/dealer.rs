//! Dealer play and settlement.

use alloc::vec::Vec;

use tracing::info;

use crate::error::TableError;
use crate::result::{PlayerResult, RoundResult, resolve};

use super::{GamePhase, PlayerStatus, Table};

/// The dealer draws while below this value and stands on it (soft or hard).
const DEALER_STANDS_ON: u8 = 17;

impl Table {
    /// Dealer plays out their hand, then the round is settled.
    ///
    /// Every draw is published so spectators see the dealer play live.
    pub(super) fn dealer_play(&mut self) -> Result<(), TableError> {
        while self.dealer.score(None) < DEALER_STANDS_ON {
            let card = self.draw_card(false)?;
            self.dealer.add_card(card);
            self.publish();
        }

        let result = self.settle();
        self.phase = GamePhase::Finished;

        info!(
            dealer_value = result.dealer_value,
            dealer_bust = result.dealer_bust,
            settled = result.players.len(),
            "round settled"
        );

        self.settled = Some(result);
        Ok(())
    }

    /// Resolves every dealt hand against the dealer and credits payouts.
    fn settle(&mut self) -> RoundResult {
        let dealer_value = self.dealer.score(None);
        let dealer_bust = dealer_value > 21;
        let dealer_blackjack = self.dealer.is_natural();

        let mut players = Vec::with_capacity(self.players.len());

        for player in &mut self.players {
            if player.hand.is_empty() {
                continue;
            }

            let busted = player.hand.is_bust(Some(&self.dealer));
            let outcome = resolve(&player.hand, &self.dealer, busted, dealer_bust);
            let payout = outcome.payout(player.bet);

            player.balance += payout;
            player.result = Some(outcome);
            player.status = PlayerStatus::Finished;
            player.rescore(&self.dealer);

            players.push(PlayerResult {
                player_id: player.id,
                outcome,
                bet: player.bet,
                payout,
                player_value: player.score,
            });
        }

        RoundResult {
            players,
            dealer_value,
            dealer_bust,
            dealer_blackjack,
        }
    }
}
