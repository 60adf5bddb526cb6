//! Self-play batches with random bots.
//!
//! Each game gets its own seed: the deal comes from the seed, and every
//! seat's `RandomBot` draws from a stream forked off the same seed, so a
//! game is reproducible from `(config, seed)` alone. Batches run games
//! either in order or spread across scoped threads; results are ordered by
//! seed in both cases.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::agents::{request, RandomBot};
use crate::core::config::GameConfig;
use crate::core::error::{DurakError, Result};
use crate::core::rng::GameRng;
use crate::observe::ObservationEncoder;
use crate::turn::TurnController;

use super::record::GameRecord;
use super::trajectory::{Step, Trajectory};

/// Configuration for self-play batches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    /// Table rules for every game in the batch.
    pub game: GameConfig,

    /// Number of games per batch.
    pub games: usize,

    /// Seed of the first game; game `i` uses `seed_offset + i`.
    pub seed_offset: u64,

    /// Decisions after which a game is abandoned as truncated.
    pub max_actions: usize,

    /// Whether to store encoded observations in each step.
    pub record_features: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            games: 100,
            seed_offset: 0,
            max_actions: 5_000,
            record_features: false,
        }
    }
}

impl SelfPlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    pub fn with_max_actions(mut self, max: usize) -> Self {
        self.max_actions = max;
        self
    }

    pub fn with_features(mut self, record: bool) -> Self {
        self.record_features = record;
        self
    }

    /// Seeds of the batch, in order.
    pub fn seeds(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.games as u64).map(|i| self.seed_offset.wrapping_add(i))
    }
}

/// Runs self-play games and collects trajectories.
#[derive(Clone, Debug)]
pub struct SelfPlayWorker {
    config: SelfPlayConfig,
    encoder: ObservationEncoder,
}

impl SelfPlayWorker {
    pub fn new(config: SelfPlayConfig) -> Result<Self> {
        config.game.validate()?;
        let encoder = ObservationEncoder::new().with_stall_limit(config.game.stall_limit);
        Ok(Self { config, encoder })
    }

    #[must_use]
    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    #[must_use]
    pub fn encoder(&self) -> &ObservationEncoder {
        &self.encoder
    }

    /// Play one game from `seed` to the end or the action budget.
    pub fn play_game(&self, seed: u64) -> Result<Trajectory> {
        let game_config = self.config.game.clone();
        let mut game = TurnController::new(game_config.clone(), seed)?;
        let mut streams = GameRng::new(seed).for_context("bots");
        let mut bots: Vec<RandomBot> = (0..game_config.player_count)
            .map(|_| RandomBot::from_rng(streams.fork()))
            .collect();

        let mut trajectory = Trajectory::new(GameRecord::new(seed, game_config));
        while let Some(pending) = game.pending() {
            if trajectory.len() >= self.config.max_actions {
                warn!(seed, actions = trajectory.len(), "action budget exhausted; truncating game");
                break;
            }
            let legal = game.legal_actions();
            let features = if self.config.record_features {
                self.encoder.encode(&game.observe(pending.player))
            } else {
                Vec::new()
            };

            let bot = &mut bots[pending.player.index()];
            let action = request(bot, game.state(), pending)?;
            let action_index = legal
                .iter()
                .position(|a| *a == action)
                .ok_or_else(|| DurakError::illegal(pending.player, format!("{action} not offered")))?;
            game.apply(pending.player, action.clone())?;

            trajectory.push(Step {
                features,
                legal_count: legal.len(),
                action_index,
                action,
                player: pending.player,
                move_number: trajectory.len(),
            });
        }

        trajectory.tricks = game.state().trick().number;
        trajectory.outcome = game.state().outcome();
        debug!(
            seed,
            steps = trajectory.len(),
            tricks = trajectory.tricks,
            outcome = ?trajectory.outcome,
            "self-play game finished"
        );
        Ok(trajectory)
    }

    /// Play the configured batch sequentially.
    pub fn play_batch(&self) -> Result<Vec<Trajectory>> {
        self.config.seeds().map(|seed| self.play_game(seed)).collect()
    }

    /// Play the configured batch on up to `threads` scoped threads.
    ///
    /// Seeds are dealt round-robin to threads; the result is in seed order.
    pub fn play_parallel(&self, threads: usize) -> Result<Vec<Trajectory>> {
        let threads = threads.clamp(1, self.config.games.max(1));
        let seeds: Vec<u64> = self.config.seeds().collect();

        let mut chunks: Vec<Vec<(usize, Result<Trajectory>)>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let seeds = &seeds;
                    scope.spawn(move || {
                        seeds
                            .iter()
                            .enumerate()
                            .skip(t)
                            .step_by(threads)
                            .map(|(i, &seed)| (i, self.play_game(seed)))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .unwrap_or_else(|_| vec![(usize::MAX, Err(DurakError::invariant("self-play thread panicked")))])
                })
                .collect()
        });

        let mut ordered: Vec<(usize, Result<Trajectory>)> = chunks.drain(..).flatten().collect();
        ordered.sort_by_key(|(i, _)| *i);
        ordered.into_iter().map(|(_, result)| result).collect()
    }
}
