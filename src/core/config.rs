//! Game configuration.
//!
//! `GameConfig` fixes the table before the deal: seats, deck composition,
//! hand size, discard caps, and the stall limit. Defaults give the standard
//! two-player 36-card game.

use serde::{Deserialize, Serialize};

use super::error::{DurakError, Result};
use crate::cards::{Rank, Suit};

/// Table rules and limits for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats (2-6).
    pub player_count: usize,

    /// Ranks in the deck; each appears in all four suits.
    pub ranks: Vec<Rank>,

    /// Hands are dealt and refilled up to this size.
    pub hand_size: usize,

    /// Attack cap while the discard pile is still empty (first trick).
    pub first_trick_cap: usize,

    /// Attack cap once anything has been discarded.
    pub trick_cap: usize,

    /// Idle iterations allowed before a trick is forced to close.
    pub stall_limit: u32,

    /// How many times a source that opts in may resubmit after an illegal move.
    pub max_resubmits: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            ranks: Rank::ALL.to_vec(),
            hand_size: 6,
            first_trick_cap: 5,
            trick_cap: 6,
            stall_limit: 5,
            max_resubmits: 3,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of seats.
    pub fn with_players(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    /// Use a reduced deck made of `ranks` in every suit.
    pub fn with_ranks(mut self, ranks: &[Rank]) -> Self {
        self.ranks = ranks.to_vec();
        self
    }

    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    pub fn with_stall_limit(mut self, limit: u32) -> Self {
        self.stall_limit = limit;
        self
    }

    pub fn with_max_resubmits(mut self, count: u32) -> Self {
        self.max_resubmits = count;
        self
    }

    /// Total number of cards in play.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.ranks.len() * Suit::ALL.len()
    }

    /// Check the configuration without building anything.
    pub fn validate(&self) -> Result<()> {
        if !(2..=6).contains(&self.player_count) {
            return Err(DurakError::Config(format!(
                "player count must be 2-6, got {}",
                self.player_count
            )));
        }
        if self.ranks.is_empty() {
            return Err(DurakError::Config("deck needs at least one rank".into()));
        }
        let mut ranks = self.ranks.clone();
        ranks.sort_by_key(|r| r.index());
        ranks.dedup();
        if ranks.len() != self.ranks.len() {
            return Err(DurakError::Config("duplicate rank in deck".into()));
        }
        if self.hand_size == 0 {
            return Err(DurakError::Config("hand size must be positive".into()));
        }
        if self.player_count * self.hand_size > self.deck_size() {
            return Err(DurakError::Config(format!(
                "{} players x {} cards exceeds a {}-card deck",
                self.player_count,
                self.hand_size,
                self.deck_size()
            )));
        }
        if self.first_trick_cap == 0 || self.trick_cap == 0 {
            return Err(DurakError::Config("attack caps must be positive".into()));
        }
        if self.stall_limit == 0 {
            return Err(DurakError::Config("stall limit must be positive".into()));
        }
        Ok(())
    }
}
