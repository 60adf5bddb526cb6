//! Replayable game records.
//!
//! A game is fully determined by its config, its seed, and the decisions
//! taken; automatic steps (skipped attackers, single-choice pickups) are
//! re-derived on replay. Records serialize with bincode.

use serde::{Deserialize, Serialize};

use crate::core::action::Action;
use crate::core::config::GameConfig;
use crate::core::error::{DurakError, Result};
use crate::core::player::PlayerId;
use crate::turn::TurnController;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub seed: u64,
    pub config: GameConfig,
    /// Submitted decisions, in order.
    pub actions: Vec<(PlayerId, Action)>,
}

impl GameRecord {
    #[must_use]
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            seed,
            config,
            actions: Vec::new(),
        }
    }

    /// Record of everything applied to `game` so far.
    #[must_use]
    pub fn from_controller(seed: u64, game: &TurnController) -> Self {
        Self {
            seed,
            config: game.state().config().clone(),
            actions: game
                .state()
                .history()
                .iter()
                .map(|r| (r.player, r.action.clone()))
                .collect(),
        }
    }

    pub fn push(&mut self, player: PlayerId, action: Action) {
        self.actions.push((player, action));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| DurakError::Codec(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| DurakError::Codec(e.to_string()))
    }

    /// Re-deal the game and re-apply every recorded decision.
    pub fn replay(&self) -> Result<TurnController> {
        let mut game = TurnController::new(self.config.clone(), self.seed)?;
        for (player, action) in &self.actions {
            game.apply(*player, action.clone())?;
        }
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{DecisionSource, RandomBot};

    fn played_game(seed: u64) -> TurnController {
        let mut game = TurnController::new(GameConfig::default(), seed).unwrap();
        let mut sources: Vec<Box<dyn DecisionSource>> = vec![
            Box::new(RandomBot::new(seed + 1)),
            Box::new(RandomBot::new(seed + 2)),
        ];
        game.run(&mut sources).unwrap();
        game
    }

    #[test]
    fn test_replay_reproduces_game() {
        let game = played_game(40);
        let record = GameRecord::from_controller(40, &game);
        assert!(!record.is_empty());

        let replayed = record.replay().unwrap();
        assert!(replayed.is_over());
        assert_eq!(replayed.state().outcome(), game.state().outcome());
        assert_eq!(replayed.state().discard(), game.state().discard());
        assert_eq!(replayed.state().hands(), game.state().hands());
    }

    #[test]
    fn test_bytes_roundtrip() {
        let game = played_game(9);
        let record = GameRecord::from_controller(9, &game);
        let bytes = record.to_bytes().unwrap();
        assert_eq!(GameRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_garbage_bytes_are_codec_error() {
        let err = GameRecord::from_bytes(&[0xff, 0x01]).unwrap_err();
        assert!(matches!(err, DurakError::Codec(_)));
    }

    #[test]
    fn test_replay_stops_on_illegal_action() {
        let mut record = GameRecord::new(3, GameConfig::default());
        record.push(PlayerId::new(0), Action::Pickup(Vec::new()));
        record.push(PlayerId::new(1), Action::Pickup(Vec::new()));
        assert!(record.replay().is_err());
    }
}
