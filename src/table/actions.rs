//! Turn actions: hit, stand and double down.

use tracing::debug;

use crate::error::TableError;
use crate::result::HandOutcome;

use super::{GamePhase, PlayerId, PlayerStatus, Table, Transition};

impl Table {
    /// Checks that it is `player_id`'s turn and returns their seat index.
    pub(super) fn ensure_player_turn(&self, player_id: PlayerId) -> Result<usize, TableError> {
        let index = self.seat_index(player_id)?;

        if self.phase != GamePhase::Playing {
            return Err(TableError::WrongPhase { phase: self.phase });
        }

        match self.players[index].status {
            PlayerStatus::Playing => Ok(index),
            PlayerStatus::SpecialChance { .. } => Err(TableError::IneligibleAction(
                "your special chance is still being resolved",
            )),
            PlayerStatus::Waiting | PlayerStatus::Finished => Err(TableError::NotYourTurn),
        }
    }

    /// Player action: Hit (draw a card).
    ///
    /// A bust ends the turn; otherwise the player keeps it.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is not seated, players are not taking
    /// turns, or it is not this player's turn.
    pub fn hit(&mut self, player_id: PlayerId) -> Result<Transition, TableError> {
        let index = self.ensure_player_turn(player_id)?;

        self.transact(|table| {
            let card = table.draw_card(false)?;

            let player = &mut table.players[index];
            player.hand.add_card(card);
            player.rescore(&table.dealer);

            if player.score > 21 {
                player.status = PlayerStatus::Finished;
                player.result = Some(HandOutcome::Bust);
                debug!(player = %player_id, score = player.score, "player busts");
                table.advance_turn()?;
            }

            Ok(())
        })
    }

    /// Player action: Stand (keep current hand).
    ///
    /// # Errors
    ///
    /// Returns an error if the player is not seated, players are not taking
    /// turns, or it is not this player's turn.
    pub fn stand(&mut self, player_id: PlayerId) -> Result<Transition, TableError> {
        let index = self.ensure_player_turn(player_id)?;

        self.transact(|table| {
            table.players[index].status = PlayerStatus::Finished;
            table.advance_turn()
        })
    }

    /// Player action: Double down (double bet, receive one card, then stand).
    ///
    /// # Errors
    ///
    /// Returns an error if it is not this player's turn, the hand does not
    /// hold exactly two cards, or the balance does not cover twice the bet.
    pub fn double_down(&mut self, player_id: PlayerId) -> Result<Transition, TableError> {
        let index = self.ensure_player_turn(player_id)?;

        let player = &self.players[index];
        if player.hand.len() != 2 {
            return Err(TableError::IneligibleAction(
                "you can only double on your first two cards",
            ));
        }

        let bet = player.bet;
        if bet.saturating_mul(2) > player.balance {
            return Err(TableError::IneligibleAction(
                "insufficient balance to double",
            ));
        }

        self.transact(|table| {
            let card = table.draw_card(false)?;

            let player = &mut table.players[index];
            player.balance -= bet;
            player.bet = bet * 2;
            player.hand.add_card(card);
            player.rescore(&table.dealer);
            player.status = PlayerStatus::Finished;

            if player.score > 21 {
                player.result = Some(HandOutcome::Bust);
            }
            debug!(player = %player_id, bet = player.bet, score = player.score, "player doubles");

            table.advance_turn()
        })
    }

    /// Passes the turn to the next unfinished seat after the current one,
    /// wrapping around. When every seat is finished the dealer plays.
    pub(super) fn advance_turn(&mut self) -> Result<(), TableError> {
        let count = self.players.len();

        for step in 1..=count {
            let index = (self.current + step) % count;
            let player = &mut self.players[index];
            if !player.status.is_finished() {
                player.status = PlayerStatus::Playing;
                self.current = index;
                self.phase = GamePhase::Playing;
                debug!(player = %player.id, seat = index, "turn passes");
                return Ok(());
            }
        }

        self.current = 0;
        self.phase = GamePhase::DealerTurn;
        self.dealer_play()
    }
}
