//! Card value model: ranks, suits, and the beat relation.
//!
//! ## Ordering
//!
//! `Card` carries an explicit total order: suit index first, then rank
//! index. Combinations and hands are sorted with it so that enumeration is
//! reproducible under a fixed seed.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{DurakError, Result};

/// Card rank, lowest to highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; 9] = [
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Position in the rank order (0 = six).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank at the given position.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| DurakError::Validation(format!("rank index {index} out of range")))
    }

    /// Single-character symbol (`6`..`9`, `T`, `J`, `Q`, `K`, `A`).
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    /// Parse a rank symbol.
    pub fn from_symbol(symbol: char) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.symbol() == symbol.to_ascii_uppercase())
            .ok_or_else(|| DurakError::Validation(format!("unknown rank '{symbol}'")))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Clubs,
    Hearts,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Clubs, Suit::Hearts, Suit::Diamonds];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| DurakError::Validation(format!("suit index {index} out of range")))
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Clubs => 'C',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.symbol() == symbol.to_ascii_uppercase())
            .ok_or_else(|| DurakError::Validation(format!("unknown suit '{symbol}'")))
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An immutable playing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Build a card from raw rank/suit indices.
    pub fn from_indices(rank: usize, suit: usize) -> Result<Self> {
        Ok(Self::new(Rank::from_index(rank)?, Suit::from_index(suit)?))
    }

    /// Dense index in `0..36`, suit-major.
    #[must_use]
    pub const fn dense_index(self) -> usize {
        self.suit.index() * Rank::ALL.len() + self.rank.index()
    }

    /// Whether `self`, played as a defense, beats `attack` under `trump`.
    ///
    /// Same suit needs a higher rank; a trump beats any non-trump.
    #[must_use]
    pub fn beats(self, attack: Card, trump: Suit) -> bool {
        if self.suit == attack.suit {
            self.rank.index() > attack.rank.index()
        } else {
            self.suit == trump
        }
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.suit
            .index()
            .cmp(&other.suit.index())
            .then_with(|| self.rank.index().cmp(&other.rank.index()))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = DurakError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(su), None) => Ok(Card::new(Rank::from_symbol(r)?, Suit::from_symbol(su)?)),
            _ => Err(DurakError::Validation(format!("invalid card '{s}'"))),
        }
    }
}
