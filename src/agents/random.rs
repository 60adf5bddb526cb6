//! Uniform random decision source.

use crate::cards::Card;
use crate::core::action::{AttackPlay, DefensePlay};
use crate::core::error::{DurakError, Result};
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::core::state::GameState;

use super::source::DecisionSource;

/// Picks uniformly from the legal set with its own seeded RNG.
///
/// Two bots built from the same seed make identical choices in identical
/// states, so self-play is reproducible from the seed alone.
#[derive(Clone, Debug)]
pub struct RandomBot {
    rng: GameRng,
}

impl RandomBot {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }

    /// Bot drawing from an existing stream (e.g. `GameRng::for_context`).
    #[must_use]
    pub fn from_rng(rng: GameRng) -> Self {
        Self { rng }
    }

    fn pick<T: Clone>(&mut self, legal: &[T]) -> Result<T> {
        self.rng
            .choose(legal)
            .cloned()
            .ok_or_else(|| DurakError::invariant("asked to choose from an empty legal set"))
    }
}

impl DecisionSource for RandomBot {
    fn decide_attack(
        &mut self,
        _state: &GameState,
        _player: PlayerId,
        legal: &[AttackPlay],
    ) -> Result<AttackPlay> {
        self.pick(legal)
    }

    fn decide_defense(&mut self, _state: &GameState, legal: &[DefensePlay]) -> Result<DefensePlay> {
        self.pick(legal)
    }

    fn decide_pickup(&mut self, _state: &GameState, legal: &[Vec<Card>]) -> Result<Vec<Card>> {
        self.pick(legal)
    }

    fn name(&self) -> &str {
        "random"
    }
}
