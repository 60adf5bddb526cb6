//! Trajectories collected from self-play.
//!
//! A trajectory records every decision of one game:
//! - the encoded observation of the deciding seat (optional)
//! - the size of the legal set and the index chosen in it
//! - the action itself
//!
//! plus the final outcome and a replayable `GameRecord`. No rewards are
//! attached; training code derives its own targets from the outcome.

use serde::{Deserialize, Serialize};

use crate::core::action::Action;
use crate::core::player::PlayerId;
use crate::core::state::GameOutcome;

use super::record::GameRecord;

/// One decision point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Encoded observation of `player` before acting; empty when feature
    /// collection is off.
    pub features: Vec<f32>,

    /// Number of legal actions offered.
    pub legal_count: usize,

    /// Position of the chosen action in the legal list.
    pub action_index: usize,

    pub action: Action,

    pub player: PlayerId,

    /// Decision number in the game (0-indexed).
    pub move_number: usize,
}

/// A complete (or truncated) self-play game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub seed: u64,
    pub steps: Vec<Step>,
    /// `None` when the action budget ran out first.
    pub outcome: Option<GameOutcome>,
    /// Tricks started, including the one in progress.
    pub tricks: u32,
    pub record: GameRecord,
}

impl Trajectory {
    #[must_use]
    pub fn new(record: GameRecord) -> Self {
        Self {
            seed: record.seed,
            steps: Vec::new(),
            outcome: None,
            tricks: 0,
            record,
        }
    }

    /// Add a step; its action also goes into the replay record.
    pub fn push(&mut self, step: Step) {
        self.record.push(step.player, step.action.clone());
        self.steps.push(step);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the game was cut off before it ended.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn player_steps(&self, player: PlayerId) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |s| s.player == player)
    }

    #[must_use]
    pub fn durak(&self) -> Option<PlayerId> {
        self.outcome.and_then(GameOutcome::durak)
    }
}

/// Aggregate figures over a batch of trajectories.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub games: usize,
    pub finished: usize,
    pub draws: usize,
    /// Durak count per absolute seat.
    pub durak_by_seat: Vec<usize>,
    pub total_steps: usize,
    pub total_tricks: u64,
}

impl BatchStats {
    #[must_use]
    pub fn from_trajectories(trajectories: &[Trajectory]) -> Self {
        let seats = trajectories
            .iter()
            .map(|t| t.record.config.player_count)
            .max()
            .unwrap_or(0);
        let mut stats = Self {
            durak_by_seat: vec![0; seats],
            ..Self::default()
        };
        for trajectory in trajectories {
            stats.games += 1;
            stats.total_steps += trajectory.len();
            stats.total_tricks += u64::from(trajectory.tricks);
            match trajectory.outcome {
                Some(GameOutcome::Durak(seat)) => {
                    stats.finished += 1;
                    stats.durak_by_seat[seat.index()] += 1;
                }
                Some(GameOutcome::Draw) => {
                    stats.finished += 1;
                    stats.draws += 1;
                }
                None => {}
            }
        }
        stats
    }

    #[must_use]
    pub fn mean_steps(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.games as f64
        }
    }
}
