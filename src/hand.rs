//! Hand representation and scoring.

use alloc::vec::Vec;

use crate::card::{Card, CardFace};

/// Returns the fixed point value of a card, or `None` for a wild card.
///
/// Aces count as 11 here; soft-ace demotion happens when a hand is scored.
#[must_use]
pub const fn card_value(card: &Card) -> Option<u8> {
    match card.face {
        CardFace::Wild => None,
        CardFace::Standard { rank, .. } => Some(match rank {
            1 => 11,
            2..=10 => rank,
            11..=13 => 10,
            _ => 0,
        }),
    }
}

/// Resolves what one wild card is worth against the dealer's cards.
///
/// A wild card takes the value of the dealer's face-down card. If that card
/// is itself wild, the dealer's face-up card is used instead. Without a
/// resolvable reference card a wild card is worth nothing yet.
fn wild_value(dealer: Option<&[Card]>) -> u8 {
    let Some(dealer) = dealer else {
        return 0;
    };

    let Some(hole) = dealer.iter().find(|c| c.face_down) else {
        return 0;
    };

    let reference = if hole.is_wild() {
        dealer.iter().find(|c| !c.face_down)
    } else {
        Some(hole)
    };

    reference.and_then(card_value).unwrap_or(0)
}

/// Scores a set of cards.
///
/// Aces count as 11 and are demoted to 1, one at a time, while the total
/// exceeds 21. Wild cards are valued against `dealer` (see [`Hand::score`]).
#[must_use]
pub fn score_cards(cards: &[Card], dealer: Option<&[Card]>) -> u8 {
    let mut value: u8 = 0;
    let mut soft_aces: u8 = 0;
    let mut wilds: u8 = 0;

    for card in cards {
        match card_value(card) {
            Some(v) => {
                if card.is_ace() {
                    soft_aces += 1;
                }
                value = value.saturating_add(v);
            }
            None => wilds += 1,
        }
    }

    if wilds > 0 {
        value = value.saturating_add(wild_value(dealer).saturating_mul(wilds));
    }

    while value > 21 && soft_aces > 0 {
        value -= 10;
        soft_aces -= 1;
    }

    value
}

/// An ordered set of cards held by a player or the dealer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Creates a new empty hand.
    #[must_use]
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Creates a hand holding the given cards.
    #[must_use]
    pub const fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Adds a card to the hand.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Replaces the card at `index`, returning the old one.
    ///
    /// Returns `None` and leaves the hand untouched if `index` is out of range.
    pub fn replace_card(&mut self, index: usize, card: Card) -> Option<Card> {
        self.cards
            .get_mut(index)
            .map(|slot| core::mem::replace(slot, card))
    }

    /// Removes every face-down card, returning each with its former position.
    pub fn take_face_down(&mut self) -> Vec<(usize, Card)> {
        let mut taken = Vec::new();
        let mut index = 0;
        self.cards.retain(|card| {
            let keep = !card.face_down;
            if !keep {
                taken.push((index, *card));
            }
            index += 1;
            keep
        });
        taken
    }

    /// Inserts a card at `index`, or at the end if `index` is past it.
    pub fn insert_card(&mut self, index: usize, card: Card) {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
    }

    /// Returns the cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the first face-down card (the dealer's hole card).
    #[must_use]
    pub fn hole_card(&self) -> Option<&Card> {
        self.cards.iter().find(|c| c.face_down)
    }

    /// Calculates the value of the hand.
    ///
    /// Wild cards are worth the dealer's face-down card (or the dealer's
    /// face-up card when the hole card is itself wild), times the number of
    /// wild cards held. Without a dealer hand they are worth nothing, so the
    /// hand must be scored again once the dealer's cards are known.
    #[must_use]
    pub fn score(&self, dealer: Option<&Self>) -> u8 {
        score_cards(&self.cards, dealer.map(Self::cards))
    }

    /// Returns whether the hand is a natural: two cards worth 21.
    #[must_use]
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.score(None) == 21
    }

    /// Returns whether the hand is over 21.
    #[must_use]
    pub fn is_bust(&self, dealer: Option<&Self>) -> bool {
        self.score(dealer) > 21
    }

    /// Returns the number of cards in the hand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Clears the hand for a new round.
    pub fn clear(&mut self) {
        self.cards.clear();
    }
}
