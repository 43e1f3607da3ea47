//! Table state machine.

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error};

use crate::card::Card;
use crate::error::TableError;
use crate::hand::Hand;
use crate::options::TableOptions;
use crate::result::RoundResult;
use crate::shoe::Shoe;
use crate::snapshot::TableSnapshot;

mod actions;
mod bet;
mod dealer;
mod lifecycle;
mod player;
pub mod state;
mod wild;

pub use player::Player;
pub use state::{GamePhase, PlayerId, PlayerStatus};

/// A request from a connected client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Take a seat under the given name.
    Join {
        /// Requested display name; blank picks a default.
        name: String,
    },
    /// Place a bet for the next round.
    PlaceBet {
        /// Bet amount.
        amount: u32,
    },
    /// Deal a new round.
    DealCards,
    /// Draw a card.
    Hit,
    /// Keep the current hand.
    Stand,
    /// Double the bet, draw one card and stand.
    Double,
    /// Swap a card in hand for a fresh one (wild variant).
    RequestSpecialChance {
        /// Index of the card to replace.
        card_index: usize,
    },
    /// Reshuffle every face-down card on the table between their holders
    /// (wild variant).
    ShuffleFaceDownCards,
    /// Clear the table for another round.
    NewGame,
}

/// Work the caller must schedule after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Call [`Table::resolve_special_chance`] after `delay`.
    SpecialChance {
        /// The requesting player.
        player: PlayerId,
        /// Ticket to pass back.
        ticket: u64,
        /// How long to wait.
        delay: Duration,
    },
}

/// Everything observable about an accepted transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// States to broadcast, in order. Empty when nothing changed.
    pub snapshots: Vec<TableSnapshot>,
    /// Deferred work, if any.
    pub follow_up: Option<FollowUp>,
    /// Settlement, if the round was settled by this transition.
    pub result: Option<RoundResult>,
}

/// A single blackjack table: seats, shoe, dealer and round flow.
///
/// Every operation validates before it mutates, so a rejected intent leaves
/// the table exactly as it was.
#[derive(Debug, Clone)]
pub struct Table {
    options: TableOptions,
    shoe: Shoe,
    dealer: Hand,
    /// Seated players in seating order.
    players: Vec<Player>,
    phase: GamePhase,
    current: usize,
    rng: ChaCha8Rng,
    next_shoe: Option<Vec<Card>>,
    next_ticket: u64,
    outbox: Vec<TableSnapshot>,
    notice: Option<String>,
    settled: Option<RoundResult>,
}

impl Table {
    /// Creates an empty table with the given seed.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::{GamePhase, Table, TableOptions};
    ///
    /// let table = Table::new(TableOptions::default(), 42);
    /// assert_eq!(table.phase(), GamePhase::Waiting);
    /// ```
    #[must_use]
    pub fn new(options: TableOptions, seed: u64) -> Self {
        let shoe = Shoe::new(
            options.variant,
            options.decks_per_shoe,
            options.reshuffle_threshold,
        );

        Self {
            options,
            shoe,
            dealer: Hand::new(),
            players: Vec::new(),
            phase: GamePhase::Waiting,
            current: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_shoe: None,
            next_ticket: 0,
            outbox: Vec::new(),
            notice: None,
            settled: None,
        }
    }

    /// Applies a client intent on behalf of `player`.
    ///
    /// # Errors
    ///
    /// Returns the reason the intent was rejected; the table is unchanged.
    pub fn apply(&mut self, player: PlayerId, intent: Intent) -> Result<Transition, TableError> {
        match intent {
            Intent::Join { name } => self.join(player, &name),
            Intent::PlaceBet { amount } => self.place_bet(player, amount),
            Intent::DealCards => self.deal(player),
            Intent::Hit => self.hit(player),
            Intent::Stand => self.stand(player),
            Intent::Double => self.double_down(player),
            Intent::RequestSpecialChance { card_index } => {
                self.request_special_chance(player, card_index)
            }
            Intent::ShuffleFaceDownCards => self.shuffle_face_down(player),
            Intent::NewGame => self.new_game(player),
        }
    }

    /// Returns the options the table was created with.
    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Returns the shoe.
    #[must_use]
    pub const fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Returns the seated players in seating order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the player with the given ID.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Returns the dealer's hand.
    #[must_use]
    pub const fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    /// Returns the index of the seat holding (or last holding) the turn.
    #[must_use]
    pub const fn current_player_index(&self) -> usize {
        self.current
    }

    /// Returns the player whose turn it is, if players are taking turns.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        self.players.get(self.current).map(|p| p.id)
    }

    /// Returns the number of cards remaining in the shoe.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.shoe.len()
    }

    /// Captures the broadcastable state of the table.
    #[must_use]
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot::capture(self, None)
    }

    /// Uses `cards` (drawn front first) for the next deal instead of
    /// composing a fresh shoe.
    pub fn set_next_shoe(&mut self, cards: Vec<Card>) {
        self.next_shoe = Some(cards);
    }

    fn seat_index(&self, id: PlayerId) -> Result<usize, TableError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(TableError::NotInGame)
    }

    /// Like [`Table::seat_index`], but also rejects a seat whose special
    /// chance is still pending.
    fn settled_seat_index(&self, id: PlayerId) -> Result<usize, TableError> {
        let index = self.seat_index(id)?;
        if self.players[index].status.is_using_special_chance() {
            return Err(TableError::IneligibleAction(
                "your special chance is still being resolved",
            ));
        }
        Ok(index)
    }

    /// Draws a card, replacing the shoe first if it is running low.
    fn draw_card(&mut self, face_down: bool) -> Result<Card, TableError> {
        if self.shoe.reshuffle_if_low(&mut self.rng) {
            debug!(cards = self.shoe.len(), "shoe replaced");
        }
        let card = self.shoe.draw().inspect_err(|err| {
            error!(%err, phase = %self.phase, "draw from an empty shoe");
        })?;
        Ok(card.with_face_down(face_down))
    }

    fn rescore_players(&mut self) {
        for player in &mut self.players {
            player.rescore(&self.dealer);
        }
    }

    /// Queues an intermediate broadcast.
    fn publish(&mut self) {
        let snapshot = TableSnapshot::capture(self, None);
        self.outbox.push(snapshot);
    }

    /// Runs `op` and packages its broadcasts, or discards them on error.
    fn transact(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<(), TableError>,
    ) -> Result<Transition, TableError> {
        match op(self) {
            Ok(()) => {
                let notice = self.notice.take();
                let mut snapshots = core::mem::take(&mut self.outbox);
                snapshots.push(TableSnapshot::capture(self, notice));
                Ok(Transition {
                    snapshots,
                    follow_up: None,
                    result: self.settled.take(),
                })
            }
            Err(err) => {
                self.outbox.clear();
                self.notice = None;
                self.settled = None;
                Err(err)
            }
        }
    }
}
