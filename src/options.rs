//! Table configuration options.

use core::time::Duration;

use crate::card::{DECK_SIZE, WILD_CARDS_PER_DECK};

/// Which deck composition and rule set the table plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum DeckVariant {
    /// Plain 52-card decks, every card dealt face up.
    #[default]
    Standard,
    /// 56-card decks with four wild cards, face-down second cards, special
    /// chances and the face-down shuffle.
    Wild,
}

impl DeckVariant {
    /// Returns the number of cards in one deck of this variant.
    #[must_use]
    pub const fn deck_size(self) -> usize {
        match self {
            Self::Standard => DECK_SIZE,
            Self::Wild => DECK_SIZE + WILD_CARDS_PER_DECK,
        }
    }

    /// Returns whether the variant uses wild cards and face-down dealing.
    #[must_use]
    pub const fn is_wild(self) -> bool {
        matches!(self, Self::Wild)
    }
}

/// Configuration options for a blackjack table.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use bjtable::{DeckVariant, TableOptions};
///
/// let options = TableOptions::default()
///     .with_variant(DeckVariant::Wild)
///     .with_bet_limits(10, 50)
///     .with_starting_balance(500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Number of seats; a deal requires every seat to be occupied.
    pub max_seats: usize,
    /// Smallest accepted bet.
    pub min_bet: u32,
    /// Largest accepted bet.
    pub max_bet: u32,
    /// Balance given to a player when they join.
    pub starting_balance: u32,
    /// A fresh shoe is composed before a draw whenever fewer cards remain.
    pub reshuffle_threshold: usize,
    /// Number of decks composed into one shoe.
    pub decks_per_shoe: u8,
    /// Deck variant.
    pub variant: DeckVariant,
    /// Special chances each player may use per round (wild variant only).
    pub special_chance_limit: u8,
    /// Presentation delay between requesting and resolving a special chance.
    pub special_chance_delay: Duration,
    /// Whether a new game re-places every player's previous bet and deals
    /// straight away once the whole table is re-armed.
    pub auto_rebet: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            max_seats: 3,
            min_bet: 5,
            max_bet: 20,
            starting_balance: 1000,
            reshuffle_threshold: 10,
            decks_per_shoe: 1,
            variant: DeckVariant::Standard,
            special_chance_limit: 2,
            special_chance_delay: Duration::from_millis(600),
            auto_rebet: false,
        }
    }
}

impl TableOptions {
    /// Sets the number of seats.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::TableOptions;
    ///
    /// let options = TableOptions::default().with_max_seats(2);
    /// assert_eq!(options.max_seats, 2);
    /// ```
    #[must_use]
    pub const fn with_max_seats(mut self, seats: usize) -> Self {
        self.max_seats = seats;
        self
    }

    /// Sets the inclusive bet bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::TableOptions;
    ///
    /// let options = TableOptions::default().with_bet_limits(1, 100);
    /// assert_eq!((options.min_bet, options.max_bet), (1, 100));
    /// ```
    #[must_use]
    pub const fn with_bet_limits(mut self, min: u32, max: u32) -> Self {
        self.min_bet = min;
        self.max_bet = max;
        self
    }

    /// Sets the balance new players start with.
    #[must_use]
    pub const fn with_starting_balance(mut self, balance: u32) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Sets the low-water mark below which the shoe is replaced.
    ///
    /// A threshold of zero is treated as one so that an empty shoe is
    /// always replaced before a draw.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::TableOptions;
    ///
    /// let options = TableOptions::default().with_reshuffle_threshold(0);
    /// assert_eq!(options.reshuffle_threshold, 1);
    /// ```
    #[must_use]
    pub const fn with_reshuffle_threshold(mut self, threshold: usize) -> Self {
        self.reshuffle_threshold = if threshold == 0 { 1 } else { threshold };
        self
    }

    /// Sets the number of decks per shoe (at least one).
    #[must_use]
    pub const fn with_decks(mut self, decks: u8) -> Self {
        self.decks_per_shoe = if decks == 0 { 1 } else { decks };
        self
    }

    /// Sets the deck variant.
    ///
    /// # Example
    ///
    /// ```
    /// use bjtable::{DeckVariant, TableOptions};
    ///
    /// let options = TableOptions::default().with_variant(DeckVariant::Wild);
    /// assert!(options.variant.is_wild());
    /// ```
    #[must_use]
    pub const fn with_variant(mut self, variant: DeckVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets how many special chances a player may use per round.
    #[must_use]
    pub const fn with_special_chance_limit(mut self, limit: u8) -> Self {
        self.special_chance_limit = limit;
        self
    }

    /// Sets the delay before a requested special chance resolves.
    #[must_use]
    pub const fn with_special_chance_delay(mut self, delay: Duration) -> Self {
        self.special_chance_delay = delay;
        self
    }

    /// Sets whether a new game re-arms previous bets and deals automatically.
    #[must_use]
    pub const fn with_auto_rebet(mut self, enabled: bool) -> Self {
        self.auto_rebet = enabled;
        self
    }
}
