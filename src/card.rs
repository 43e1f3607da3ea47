//! Card types.

use core::fmt;

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    /// Hearts.
    Hearts,
    /// Diamonds.
    Diamonds,
    /// Clubs.
    Clubs,
    /// Spades.
    Spades,
}

impl Suit {
    /// All four suits in deck order.
    pub const ALL: [Self; 4] = [Self::Hearts, Self::Diamonds, Self::Clubs, Self::Spades];

    /// Returns the lowercase wire name of the suit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hearts => "hearts",
            Self::Diamonds => "diamonds",
            Self::Clubs => "clubs",
            Self::Spades => "spades",
        }
    }
}

/// Identifier of a physical card, unique for the lifetime of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u64);

/// What is printed on the face of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardFace {
    /// A regular card. Rank 1 = Ace, 11 = Jack, 12 = Queen, 13 = King.
    Standard {
        /// The suit of the card.
        suit: Suit,
        /// The rank of the card.
        rank: u8,
    },
    /// A wild card whose value is borrowed from the dealer's hidden card.
    Wild,
}

/// A playing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    /// The face of the card.
    pub face: CardFace,
    /// Unique id of this physical card.
    pub id: CardId,
    /// Whether the card was dealt face down.
    pub face_down: bool,
}

impl Card {
    /// Creates a new face-up standard card.
    ///
    /// Note: This function does not validate the rank. Values outside 1..=13
    /// are accepted but count as zero when evaluating a hand.
    #[must_use]
    pub const fn new(id: CardId, suit: Suit, rank: u8) -> Self {
        Self {
            face: CardFace::Standard { suit, rank },
            id,
            face_down: false,
        }
    }

    /// Creates a new face-up wild card.
    #[must_use]
    pub const fn wild(id: CardId) -> Self {
        Self {
            face: CardFace::Wild,
            id,
            face_down: false,
        }
    }

    /// Returns the same card with the given face-down flag.
    #[must_use]
    pub const fn with_face_down(mut self, face_down: bool) -> Self {
        self.face_down = face_down;
        self
    }

    /// Returns whether this is a wild card.
    #[must_use]
    pub const fn is_wild(&self) -> bool {
        matches!(self.face, CardFace::Wild)
    }

    /// Returns whether this is an ace.
    #[must_use]
    pub const fn is_ace(&self) -> bool {
        matches!(self.face, CardFace::Standard { rank: 1, .. })
    }

    /// Returns the suit, or `None` for a wild card.
    #[must_use]
    pub const fn suit(&self) -> Option<Suit> {
        match self.face {
            CardFace::Standard { suit, .. } => Some(suit),
            CardFace::Wild => None,
        }
    }

    /// Returns the rank label used on the wire (`"A"`, `"2"`..`"10"`, `"J"`,
    /// `"Q"`, `"K"`, `"WILD"`).
    #[must_use]
    pub const fn rank_label(&self) -> &'static str {
        match self.face {
            CardFace::Wild => "WILD",
            CardFace::Standard { rank, .. } => match rank {
                1 => "A",
                2 => "2",
                3 => "3",
                4 => "4",
                5 => "5",
                6 => "6",
                7 => "7",
                8 => "8",
                9 => "9",
                10 => "10",
                11 => "J",
                12 => "Q",
                13 => "K",
                _ => "?",
            },
        }
    }

    /// Returns the suit label used on the wire.
    #[must_use]
    pub const fn suit_label(&self) -> &'static str {
        match self.face {
            CardFace::Standard { suit, .. } => suit.as_str(),
            CardFace::Wild => "wild",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.suit_label(), self.rank_label(), self.id.0)
    }
}

/// Number of cards per standard deck.
pub const DECK_SIZE: usize = 52;

/// Number of wild cards added to each deck in the wild-card variant.
pub const WILD_CARDS_PER_DECK: usize = 4;
