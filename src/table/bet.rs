//! Betting and dealing.

use tracing::{debug, info};

use crate::error::TableError;
use crate::result::HandOutcome;

use super::{GamePhase, PlayerId, PlayerStatus, Table, Transition};

impl Table {
    /// Places a bet for the specified player.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is not seated, the table is not
    /// waiting for bets, the player already bet this round, or the amount is
    /// outside the table limits or more than the player's balance.
    pub fn place_bet(&mut self, player_id: PlayerId, amount: u32) -> Result<Transition, TableError> {
        let index = self.settled_seat_index(player_id)?;

        if self.phase != GamePhase::Waiting {
            return Err(TableError::WrongPhase { phase: self.phase });
        }

        let player = &self.players[index];
        if player.has_placed_bet {
            return Err(TableError::IneligibleAction(
                "you have already placed a bet this round",
            ));
        }

        if amount < self.options.min_bet || amount > self.options.max_bet {
            return Err(TableError::InvalidAmount("bet is outside the table limits"));
        }

        if amount > player.balance {
            return Err(TableError::InvalidAmount("insufficient balance"));
        }

        self.transact(|table| {
            let player = &mut table.players[index];
            player.balance -= amount;
            player.bet = amount;
            player.last_bet = amount;
            player.has_placed_bet = true;
            debug!(player = %player_id, amount, "bet placed");
            Ok(())
        })
    }

    /// Deals a new round to every seat and the dealer.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is not seated, the table is not
    /// waiting, not every seat is occupied, or someone has not bet yet.
    pub fn deal(&mut self, player_id: PlayerId) -> Result<Transition, TableError> {
        self.settled_seat_index(player_id)?;

        if self.phase != GamePhase::Waiting {
            return Err(TableError::WrongPhase { phase: self.phase });
        }

        if self.players.len() != self.options.max_seats {
            return Err(TableError::IncompleteTable(
                "every seat must be taken before dealing",
            ));
        }

        if !self.players.iter().all(|p| p.has_placed_bet) {
            return Err(TableError::IncompleteTable(
                "all players must place a bet before dealing",
            ));
        }

        self.transact(Self::deal_round)
    }

    /// Composes a fresh shoe and deals the opening cards.
    ///
    /// Naturals finish immediately; if every seat has one the dealer plays
    /// straight away, otherwise the first remaining seat gets the turn.
    pub(super) fn deal_round(&mut self) -> Result<(), TableError> {
        self.phase = GamePhase::Dealing;

        match self.next_shoe.take() {
            Some(cards) => self.shoe.set_cards(cards),
            None => self.shoe.refill(&mut self.rng),
        }

        self.dealer.clear();
        self.current = 0;
        for player in &mut self.players {
            player.reset_hand();
        }

        // The second card is dealt face down in the wild variant.
        let hidden = self.options.variant.is_wild();

        for index in 0..self.players.len() {
            let first = self.draw_card(false)?;
            let second = self.draw_card(hidden)?;
            let hand = &mut self.players[index].hand;
            hand.add_card(first);
            hand.add_card(second);
        }

        let up = self.draw_card(false)?;
        let hole = self.draw_card(hidden)?;
        self.dealer.add_card(up);
        self.dealer.add_card(hole);

        self.rescore_players();

        for player in &mut self.players {
            if player.hand.is_natural() {
                player.status = PlayerStatus::Finished;
                player.result = Some(HandOutcome::Blackjack);
            }
        }

        info!(
            seats = self.players.len(),
            cards_remaining = self.shoe.len(),
            "round dealt"
        );

        match self.players.iter().position(|p| !p.status.is_finished()) {
            Some(index) => {
                self.current = index;
                self.players[index].status = PlayerStatus::Playing;
                self.phase = GamePhase::Playing;
                Ok(())
            }
            None => {
                self.phase = GamePhase::DealerTurn;
                self.dealer_play()
            }
        }
    }
}
