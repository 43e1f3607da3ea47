//! Wild-variant actions: special chances and the face-down shuffle.

use alloc::vec::Vec;

use tracing::debug;

use crate::card::Card;
use crate::error::TableError;
use crate::result::HandOutcome;
use crate::shoe::shuffle;

use super::{FollowUp, GamePhase, PlayerId, PlayerStatus, Table, Transition};

/// Who a face-down card was taken from.
#[derive(Debug, Clone, Copy)]
enum Holder {
    Seat(usize),
    Dealer,
}

impl Table {
    fn ensure_wild(&self) -> Result<(), TableError> {
        if self.options.variant.is_wild() {
            Ok(())
        } else {
            Err(TableError::IneligibleAction(
                "this table does not use wild cards",
            ))
        }
    }

    /// Starts swapping the card at `card_index` for a fresh one.
    ///
    /// The seat is marked as resolving a special chance and the returned
    /// transition carries a [`FollowUp::SpecialChance`]; the caller finishes
    /// the swap with [`Table::resolve_special_chance`] once the delay has
    /// passed.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not the wild variant, it is not this
    /// player's turn, the player has no special chances left, or the index
    /// does not name a card in hand.
    pub fn request_special_chance(
        &mut self,
        player_id: PlayerId,
        card_index: usize,
    ) -> Result<Transition, TableError> {
        self.seat_index(player_id)?;
        self.ensure_wild()?;
        let index = self.ensure_player_turn(player_id)?;

        let player = &self.players[index];
        if player.special_chances_used >= self.options.special_chance_limit {
            return Err(TableError::IneligibleAction(
                "you have no special chances left",
            ));
        }
        if player.hand.is_empty() {
            return Err(TableError::IneligibleAction("you have no cards to swap"));
        }
        if card_index >= player.hand.len() {
            return Err(TableError::IneligibleAction("invalid card index"));
        }

        let ticket = self.next_ticket;
        let mut transition = self.transact(|table| {
            table.next_ticket += 1;
            table.players[index].status = PlayerStatus::SpecialChance { card_index, ticket };
            debug!(player = %player_id, card_index, ticket, "special chance requested");
            Ok(())
        })?;

        transition.follow_up = Some(FollowUp::SpecialChance {
            player: player_id,
            ticket,
            delay: self.options.special_chance_delay,
        });
        Ok(transition)
    }

    /// Completes a pending special chance: the chosen card is replaced with a
    /// freshly drawn face-up card.
    ///
    /// Does nothing (and returns an empty transition) if the seat is gone or
    /// no longer waiting on this `ticket`, for example because the player
    /// left or the round was reset in the meantime.
    ///
    /// # Errors
    ///
    /// Returns an error only if the shoe cannot supply a card.
    pub fn resolve_special_chance(
        &mut self,
        player_id: PlayerId,
        ticket: u64,
    ) -> Result<Transition, TableError> {
        let Ok(index) = self.seat_index(player_id) else {
            debug!(player = %player_id, ticket, "special chance dropped, seat is gone");
            return Ok(Transition::default());
        };

        let card_index = match self.players[index].status {
            PlayerStatus::SpecialChance {
                card_index,
                ticket: pending,
            } if pending == ticket && self.phase == GamePhase::Playing => card_index,
            _ => {
                debug!(player = %player_id, ticket, "special chance dropped, no longer pending");
                return Ok(Transition::default());
            }
        };

        self.transact(|table| {
            // Another seat's face-down shuffle never changes a hand's length,
            // so the index is still in range here.
            if card_index >= table.players[index].hand.len() {
                table.players[index].status = PlayerStatus::Playing;
                return Ok(());
            }

            let card = table.draw_card(false)?;

            let player = &mut table.players[index];
            player.hand.replace_card(card_index, card);
            player.special_chances_used += 1;
            player.status = PlayerStatus::Playing;
            player.rescore(&table.dealer);
            debug!(player = %player_id, card = %card, score = player.score, "special chance resolved");

            if player.score > 21 {
                player.status = PlayerStatus::Finished;
                player.result = Some(HandOutcome::Bust);
                table.advance_turn()?;
            }

            Ok(())
        })
    }

    /// Collects every face-down card on the table, shuffles them, and deals
    /// one back to each holder that gave one up, in its original position.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is not seated or waiting on a special
    /// chance, the table is not the wild variant, or cards are not in play.
    pub fn shuffle_face_down(&mut self, player_id: PlayerId) -> Result<Transition, TableError> {
        self.settled_seat_index(player_id)?;
        self.ensure_wild()?;

        if !matches!(self.phase, GamePhase::Dealing | GamePhase::Playing) {
            return Err(TableError::WrongPhase { phase: self.phase });
        }

        self.transact(|table| {
            let mut slots: Vec<(Holder, usize)> = Vec::new();
            let mut pool: Vec<Card> = Vec::new();

            for (seat, player) in table.players.iter_mut().enumerate() {
                for (position, card) in player.hand.take_face_down() {
                    slots.push((Holder::Seat(seat), position));
                    pool.push(card);
                }
            }
            for (position, card) in table.dealer.take_face_down() {
                slots.push((Holder::Dealer, position));
                pool.push(card);
            }

            shuffle(&mut pool, &mut table.rng);

            for ((holder, position), card) in slots.into_iter().zip(pool) {
                match holder {
                    Holder::Seat(seat) => table.players[seat].hand.insert_card(position, card),
                    Holder::Dealer => table.dealer.insert_card(position, card),
                }
            }

            table.rescore_players();
            debug!(player = %player_id, "face-down cards shuffled");
            Ok(())
        })
    }
}
