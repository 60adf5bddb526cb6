//! The shared stock and its trump indicator.

use serde::{Deserialize, Serialize};

use super::card::{Card, Rank, Suit};
use crate::core::rng::GameRng;

/// Draw stock plus the face-up trump indicator.
///
/// The indicator is held outside `stock` once chosen, so it is counted
/// exactly once and is always the last card drawn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    /// Face-down stock; draws come from the end.
    stock: Vec<Card>,
    /// Face-up indicator, drawn after the stock runs out.
    indicator: Option<Card>,
    /// Trump card chosen for the game (kept after the indicator is drawn).
    trump: Option<Card>,
}

impl Deck {
    /// Build every suit × rank card for `ranks` and shuffle with `rng`.
    #[must_use]
    pub fn shuffled(ranks: &[Rank], rng: &mut GameRng) -> Self {
        let mut stock = Vec::with_capacity(ranks.len() * Suit::ALL.len());
        for suit in Suit::ALL {
            for &rank in ranks {
                stock.push(Card::new(rank, suit));
            }
        }
        rng.shuffle(&mut stock);
        Self {
            stock,
            indicator: None,
            trump: None,
        }
    }

    /// Build a deck mid-game: `stock` (last card drawn first) plus an
    /// optional face-up indicator, which also fixes the trump card.
    #[must_use]
    pub fn arranged(stock: Vec<Card>, indicator: Option<Card>) -> Self {
        Self {
            stock,
            indicator,
            trump: indicator,
        }
    }

    /// Pick the trump: the last stock card becomes the bottom indicator.
    ///
    /// The first call fixes the trump for the game; later calls return the
    /// same card. Returns `None` only for an empty deck.
    pub fn choose_trump(&mut self) -> Option<Card> {
        if self.trump.is_some() {
            return self.trump;
        }
        let card = self.stock.pop()?;
        self.indicator = Some(card);
        self.trump = Some(card);
        Some(card)
    }

    /// Draw one card: stock first, indicator last.
    pub fn pop(&mut self) -> Option<Card> {
        self.stock.pop().or_else(|| self.indicator.take())
    }

    /// Whether any card (stock or indicator) is left to draw.
    #[must_use]
    pub fn has_cards(&self) -> bool {
        !self.stock.is_empty() || self.indicator.is_some()
    }

    /// Cards left to draw, indicator included.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.stock.len() + usize::from(self.indicator.is_some())
    }

    /// Face-down stock size, indicator excluded.
    #[must_use]
    pub fn stock_len(&self) -> usize {
        self.stock.len()
    }

    /// The visible indicator, until it is drawn.
    #[must_use]
    pub fn indicator(&self) -> Option<Card> {
        self.indicator
    }

    #[must_use]
    pub fn trump_card(&self) -> Option<Card> {
        self.trump
    }

    #[must_use]
    pub fn trump_suit(&self) -> Option<Suit> {
        self.trump.map(|c| c.suit)
    }

    /// Face-down stock cards (bottom first).
    #[must_use]
    pub fn stock(&self) -> &[Card] {
        &self.stock
    }
}
