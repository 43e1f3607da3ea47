//! A server-authoritative multiplayer blackjack table.
//!
//! The crate provides a [`Table`] type that owns the shoe, enforces turn
//! order, plays the dealer and settles bets. Clients drive it with
//! [`Intent`]s and every accepted intent yields a [`Transition`] holding
//! full [`TableSnapshot`]s to broadcast. With the `server` feature the
//! table is hosted behind a WebSocket gateway.
//!
//! # Example
//!
//! ```
//! use bjtable::{GamePhase, Intent, PlayerId, Table, TableOptions};
//!
//! let mut table = Table::new(TableOptions::default().with_max_seats(1), 42);
//! let alice = PlayerId(1);
//!
//! table.apply(alice, Intent::Join { name: "Alice".into() }).unwrap();
//! table.apply(alice, Intent::PlaceBet { amount: 10 }).unwrap();
//! table.apply(alice, Intent::DealCards).unwrap();
//!
//! assert_ne!(table.phase(), GamePhase::Waiting);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod card;
pub mod error;
pub mod hand;
pub mod options;
pub mod result;
pub mod shoe;
pub mod snapshot;
pub mod table;

#[cfg(feature = "server")]
#[cfg_attr(docsrs, doc(cfg(feature = "server")))]
pub mod server;
#[cfg(feature = "server")]
mod sync;

// Re-export main types
pub use card::{Card, CardFace, CardId, DECK_SIZE, Suit, WILD_CARDS_PER_DECK};
pub use error::TableError;
pub use hand::{Hand, card_value, score_cards};
pub use options::{DeckVariant, TableOptions};
pub use result::{HandOutcome, PlayerResult, RoundResult, resolve};
pub use shoe::{CardIds, EmptyDeckError, Shoe};
pub use snapshot::{CardView, DeckCount, PlayerView, TableSnapshot};
pub use table::{FollowUp, GamePhase, Intent, Player, PlayerId, PlayerStatus, Table, Transition};
