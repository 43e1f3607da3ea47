//! Deck construction, shuffling and the shoe cards are drawn from.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::card::{Card, CardId, Suit, WILD_CARDS_PER_DECK};
use crate::options::DeckVariant;

/// A draw was attempted on an empty shoe.
///
/// The table replaces the shoe before every draw once it runs low, so this
/// only surfaces if that guard was bypassed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the shoe is empty")]
pub struct EmptyDeckError;

/// Allocates card ids. Ids are never reused, so no two live cards share one.
#[derive(Debug, Clone, Default)]
pub struct CardIds {
    next: u64,
}

impl CardIds {
    /// Creates an allocator starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns a fresh id.
    pub const fn next_id(&mut self) -> CardId {
        let id = CardId(self.next);
        self.next += 1;
        id
    }

    /// Makes sure future ids are greater than `id`.
    pub const fn skip_past(&mut self, id: CardId) {
        if id.0 >= self.next {
            self.next = id.0 + 1;
        }
    }
}

/// Shuffles cards in place with a uniform (Fisher-Yates) permutation.
pub fn shuffle<R: Rng + ?Sized>(cards: &mut [Card], rng: &mut R) {
    cards.shuffle(rng);
}

/// Creates one shuffled deck of the given variant.
pub fn new_deck<R: Rng + ?Sized>(variant: DeckVariant, ids: &mut CardIds, rng: &mut R) -> Vec<Card> {
    let mut cards = Vec::with_capacity(variant.deck_size());

    for suit in Suit::ALL {
        for rank in 1..=13 {
            cards.push(Card::new(ids.next_id(), suit, rank));
        }
    }

    if variant.is_wild() {
        for _ in 0..WILD_CARDS_PER_DECK {
            cards.push(Card::wild(ids.next_id()));
        }
    }

    shuffle(&mut cards, rng);
    cards
}

/// Concatenates `decks` freshly shuffled decks and shuffles the result.
pub fn compose_decks<R: Rng + ?Sized>(
    decks: u8,
    variant: DeckVariant,
    ids: &mut CardIds,
    rng: &mut R,
) -> Vec<Card> {
    let mut cards = Vec::with_capacity(decks as usize * variant.deck_size());
    for _ in 0..decks {
        cards.extend(new_deck(variant, ids, rng));
    }
    shuffle(&mut cards, rng);
    cards
}

/// The working supply of cards, consumed from the front.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: VecDeque<Card>,
    variant: DeckVariant,
    decks: u8,
    threshold: usize,
    ids: CardIds,
    composed: usize,
}

impl Shoe {
    /// Creates an empty shoe that composes `decks` decks of `variant` and is
    /// replaced whenever fewer than `threshold` cards remain.
    ///
    /// Both `decks` and `threshold` are raised to at least one.
    #[must_use]
    pub const fn new(variant: DeckVariant, decks: u8, threshold: usize) -> Self {
        Self {
            cards: VecDeque::new(),
            variant,
            decks: if decks == 0 { 1 } else { decks },
            threshold: if threshold == 0 { 1 } else { threshold },
            ids: CardIds::new(),
            composed: 0,
        }
    }

    /// Replaces the contents with a freshly composed shoe.
    pub fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let cards = compose_decks(self.decks, self.variant, &mut self.ids, rng);
        self.composed = cards.len();
        self.cards = cards.into();
    }

    /// Replaces the shoe if fewer than the threshold cards remain.
    ///
    /// Returns `true` if a fresh shoe was composed.
    pub fn reshuffle_if_low<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.cards.len() < self.threshold {
            self.refill(rng);
            true
        } else {
            false
        }
    }

    /// Removes and returns the front card.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyDeckError`] if the shoe is empty.
    pub fn draw(&mut self) -> Result<Card, EmptyDeckError> {
        self.cards.pop_front().ok_or(EmptyDeckError)
    }

    /// Replaces the contents with the given cards, drawn in order.
    ///
    /// Ids allocated afterwards stay clear of every id in `cards`.
    pub fn set_cards(&mut self, cards: Vec<Card>) {
        for card in &cards {
            self.ids.skip_past(card.id);
        }
        self.composed = cards.len();
        self.cards = cards.into();
    }

    /// Empties the shoe.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.composed = 0;
    }

    /// Returns the number of cards remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the shoe is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Returns the number of cards the shoe held when it was last composed.
    #[must_use]
    pub const fn composed_size(&self) -> usize {
        self.composed
    }

    /// Returns the remaining cards, front first.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Returns the deck variant this shoe composes.
    #[must_use]
    pub const fn variant(&self) -> DeckVariant {
        self.variant
    }
}
