//! Joining, leaving and resetting the table.

use alloc::format;
use alloc::string::{String, ToString};

use tracing::info;

use crate::error::TableError;

use super::{GamePhase, Player, PlayerId, PlayerStatus, Table, Transition};

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl Table {
    /// Seats a new player.
    ///
    /// The name is trimmed; a blank name becomes `"Player N"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is full, the connection is already
    /// seated, or another player already uses the name (ignoring case).
    pub fn join(&mut self, player_id: PlayerId, name: &str) -> Result<Transition, TableError> {
        if self.players.len() >= self.options.max_seats {
            return Err(TableError::SeatUnavailable("the game is full"));
        }

        if self.seat_index(player_id).is_ok() {
            return Err(TableError::SeatUnavailable("you are already in the game"));
        }

        let name = name.trim();
        let name = if name.is_empty() {
            self.default_name()
        } else if self.players.iter().any(|p| same_name(&p.name, name)) {
            return Err(TableError::NameConflict);
        } else {
            name.to_string()
        };

        self.transact(|table| {
            info!(player = %player_id, name = %name, seat = table.players.len(), "player joined");
            let balance = table.options.starting_balance;
            table.players.push(Player::new(player_id, name, balance));
            Ok(())
        })
    }

    fn default_name(&self) -> String {
        let mut n = self.players.len() + 1;
        loop {
            let name = format!("Player {n}");
            if !self.players.iter().any(|p| same_name(&p.name, &name)) {
                return name;
            }
            n += 1;
        }
    }

    /// Clears the table for another round.
    ///
    /// Bets still at stake (the round was not settled) are refunded first.
    /// With auto-rebet enabled every seat re-places its previous bet when it
    /// can, and a fully re-armed table is dealt immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is not seated or is waiting on a
    /// special chance.
    pub fn new_game(&mut self, player_id: PlayerId) -> Result<Transition, TableError> {
        self.settled_seat_index(player_id)?;

        self.transact(|table| {
            if table.phase != GamePhase::Finished {
                for player in &mut table.players {
                    player.refund_bet();
                }
            }

            table.shoe.clear();
            table.dealer.clear();
            table.current = 0;
            table.phase = GamePhase::Waiting;
            for player in &mut table.players {
                player.reset_round();
            }

            info!(player = %player_id, "new round");

            if table.options.auto_rebet && table.rebet() {
                table.deal_round()?;
            }

            Ok(())
        })
    }

    /// Re-places each seat's previous bet where it is in bounds and
    /// affordable. Returns whether the table is full with every bet placed.
    fn rebet(&mut self) -> bool {
        let (min, max) = (self.options.min_bet, self.options.max_bet);

        for player in &mut self.players {
            let amount = player.last_bet;
            if (min..=max).contains(&amount) && amount <= player.balance {
                player.balance -= amount;
                player.bet = amount;
                player.has_placed_bet = true;
            }
        }

        self.players.len() == self.options.max_seats
            && self.players.iter().all(|p| p.has_placed_bet)
    }

    /// Removes a player whose connection closed.
    ///
    /// Leaving mid-round ends the round: every remaining seat is finished
    /// and refunded, and the final snapshot carries a notice naming the
    /// player who left. The last player leaving resets the table.
    ///
    /// Returns an empty transition if the connection was not seated.
    pub fn disconnect(&mut self, player_id: PlayerId) -> Transition {
        let Ok(index) = self.seat_index(player_id) else {
            return Transition::default();
        };

        let transition = self.transact(|table| {
            let departed = table.players.remove(index);
            info!(player = %player_id, name = %departed.name, "player left");

            if table.players.is_empty() {
                table.shoe.clear();
                table.dealer.clear();
                table.current = 0;
                table.phase = GamePhase::Waiting;
            } else if table.phase.in_progress() {
                for player in &mut table.players {
                    player.refund_bet();
                    player.status = PlayerStatus::Finished;
                }
                table.current = 0;
                table.phase = GamePhase::Finished;
                table.notice = Some(format!(
                    "{} disconnected. Game ended. All bets have been returned.",
                    departed.name
                ));
            } else {
                if index < table.current {
                    table.current -= 1;
                }
                table.current = table.current.min(table.players.len() - 1);
            }

            Ok(())
        });

        transition.unwrap_or_default()
    }
}
