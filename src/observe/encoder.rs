//! Flat feature encoding of observations.
//!
//! Turns an `Observation` into a fixed-length `Vec<f32>` for training
//! wrappers. The layout does not depend on the player count: seat blocks
//! are always sized for the largest table and unused seats stay zero.
//!
//! ## Layout
//!
//! 1. Card planes, 36 entries each (`Card::dense_index`):
//!    own hand, unresolved attacks, covered attacks, covering cards,
//!    discard, trump indicator, then one known-cards plane per opponent
//!    seat (relative 1..=5).
//! 2. Trump suit one-hot (4).
//! 3. Per relative seat (6 × 4): hand size, out, is defender, is attacker.
//! 4. Stock size, unknown-card count, stall progress.
//! 5. Phase one-hot, last event one-hot (none, beat, surrender).

use crate::cards::{Card, Suit};
use crate::core::state::TrickOutcome;
use crate::turn::Phase;

use super::snapshot::Observation;

const CARD_SLOTS: usize = 36;
const MAX_SEATS: usize = 6;
const FIXED_PLANES: usize = 6;
const SEAT_FEATURES: usize = 4;

/// Encodes observations into flat feature vectors.
#[derive(Clone, Debug)]
pub struct ObservationEncoder {
    stall_limit: u32,
    max_cards: f32,
}

impl Default for ObservationEncoder {
    fn default() -> Self {
        Self {
            stall_limit: 5,
            max_cards: CARD_SLOTS as f32,
        }
    }
}

impl ObservationEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize the stall counter against this limit.
    #[must_use]
    pub fn with_stall_limit(mut self, limit: u32) -> Self {
        self.stall_limit = limit.max(1);
        self
    }

    fn planes() -> usize {
        FIXED_PLANES + (MAX_SEATS - 1)
    }

    /// Length of every encoded vector.
    #[must_use]
    pub fn feature_len(&self) -> usize {
        Self::planes() * CARD_SLOTS
            + Suit::ALL.len()
            + MAX_SEATS * SEAT_FEATURES
            + 3
            + Phase::COUNT
            + 3
    }

    /// Encode `obs`.
    #[must_use]
    pub fn encode(&self, obs: &Observation) -> Vec<f32> {
        let mut out = vec![0.0f32; self.feature_len()];
        let plane = |index: usize, card: Card| index * CARD_SLOTS + card.dense_index();

        for &card in &obs.hand {
            out[plane(0, card)] = 1.0;
        }
        for slot in &obs.field {
            match slot.defense {
                None => out[plane(1, slot.attack)] = 1.0,
                Some((cover, _)) => {
                    out[plane(2, slot.attack)] = 1.0;
                    out[plane(3, cover)] = 1.0;
                }
            }
        }
        for &card in &obs.discard {
            out[plane(4, card)] = 1.0;
        }
        if let Some(card) = obs.trump_indicator {
            out[plane(5, card)] = 1.0;
        }
        for opponent in obs.opponents.iter().filter(|o| o.seat < MAX_SEATS) {
            for &card in &opponent.known {
                out[plane(FIXED_PLANES + opponent.seat - 1, card)] = 1.0;
            }
        }

        let mut at = Self::planes() * CARD_SLOTS;
        out[at + obs.trump.index()] = 1.0;
        at += Suit::ALL.len();

        for seat in 0..obs.player_count.min(MAX_SEATS) {
            let base = at + seat * SEAT_FEATURES;
            out[base] = obs.hand_sizes.get(seat).copied().unwrap_or(0) as f32 / self.max_cards;
            out[base + 1] = f32::from(u8::from(obs.out.get(seat).copied().unwrap_or(false)));
            out[base + 2] = f32::from(u8::from(obs.defender == seat));
            out[base + 3] = f32::from(u8::from(obs.primary_attacker == seat));
        }
        at += MAX_SEATS * SEAT_FEATURES;

        out[at] = obs.stock_size as f32 / self.max_cards;
        out[at + 1] = obs.unknown_cards as f32 / self.max_cards;
        out[at + 2] = (obs.stall as f32 / self.stall_limit as f32).min(1.0);
        at += 3;

        out[at + obs.phase.index()] = 1.0;
        at += Phase::COUNT;

        let event = match obs.last_event {
            None => 0,
            Some(TrickOutcome::Beat) => 1,
            Some(TrickOutcome::Surrender) => 2,
        };
        out[at + event] = 1.0;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::turn::TurnController;

    #[test]
    fn test_feature_len_is_fixed() {
        let encoder = ObservationEncoder::new();
        assert_eq!(encoder.feature_len(), 11 * 36 + 4 + 24 + 3 + 6 + 3);

        for players in 2..=6 {
            let ctl = TurnController::new(GameConfig::new().with_players(players), 5).unwrap();
            let obs = ctl.observe(crate::core::PlayerId::new(0));
            assert_eq!(encoder.encode(&obs).len(), encoder.feature_len());
        }
    }

    #[test]
    fn test_hand_plane_matches_hand() {
        let ctl = TurnController::new(GameConfig::default(), 8).unwrap();
        let obs = ctl.observe(crate::core::PlayerId::new(1));
        let features = ObservationEncoder::new().encode(&obs);
        let hand_bits: f32 = features[..36].iter().sum();
        assert_eq!(hand_bits as usize, obs.hand.len());
        for card in &obs.hand {
            assert_eq!(features[card.dense_index()], 1.0);
        }
    }

    #[test]
    fn test_values_are_normalized() {
        let ctl = TurnController::new(GameConfig::new().with_players(4), 21).unwrap();
        let obs = ctl.observe(crate::core::PlayerId::new(2));
        let features = ObservationEncoder::new().with_stall_limit(5).encode(&obs);
        assert!(features.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
