//! Step-based environment wrapper for training loops.
//!
//! `DurakEnv` forwards actions to a `TurnController` and hands back the
//! next observation. It computes no rewards: `StepOutcome::reward` is
//! always 0.0 and exists so callers can keep a conventional step tuple.
//!
//! Each `reset()` deals a fresh game. Game seeds come from the env seed
//! and the episode counter, so a run of episodes is reproducible.
//!
//! ```
//! use rust_durak::env::DurakEnv;
//! use rust_durak::GameConfig;
//!
//! let mut env = DurakEnv::new(GameConfig::default(), 7).unwrap();
//! let obs = env.reset().unwrap();
//! assert_eq!(obs.hand.len(), 6);
//!
//! let action = env.legal_actions()[0].clone();
//! let outcome = env.step(action).unwrap();
//! assert!(!outcome.terminal);
//! ```

use tracing::debug;

use crate::core::action::Action;
use crate::core::config::GameConfig;
use crate::core::error::{DurakError, Result};
use crate::core::player::PlayerId;
use crate::core::state::GameOutcome;
use crate::observe::Observation;
use crate::turn::{PendingDecision, TurnController};

/// Result of one `step`.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// View of the seat that must act next, or of the acting seat once the
    /// game is over.
    pub observation: Observation,
    pub terminal: bool,
    /// Always 0.0.
    pub reward: f32,
}

#[derive(Clone, Debug)]
pub struct DurakEnv {
    config: GameConfig,
    seed: u64,
    episode: u64,
    game: Option<TurnController>,
}

impl DurakEnv {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            seed,
            episode: 0,
            game: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed of the next episode's game.
    #[must_use]
    pub fn next_seed(&self) -> u64 {
        self.seed.wrapping_add(self.episode)
    }

    /// Deal a new game; returns the view of the first seat to act.
    pub fn reset(&mut self) -> Result<Observation> {
        let seed = self.next_seed();
        self.episode += 1;
        self.reset_with_seed(seed)
    }

    /// Deal a new game from an explicit seed.
    pub fn reset_with_seed(&mut self, seed: u64) -> Result<Observation> {
        let game = TurnController::new(self.config.clone(), seed)?;
        debug!(seed, episode = self.episode, "environment reset");
        let seat = game
            .pending()
            .map_or(PlayerId::new(0), |pending| pending.player);
        let observation = game.observe(seat);
        self.game = Some(game);
        Ok(observation)
    }

    /// Apply `action` for the seat that is pending.
    ///
    /// Fails with `GameOver` before the first `reset` and after the game
    /// ends; illegal actions leave the game untouched.
    pub fn step(&mut self, action: Action) -> Result<StepOutcome> {
        let game = self.game.as_mut().ok_or(DurakError::GameOver)?;
        let pending = game.pending().ok_or(DurakError::GameOver)?;
        game.apply(pending.player, action)?;

        let terminal = game.is_over();
        let seat = game.pending().map_or(pending.player, |next| next.player);
        Ok(StepOutcome {
            observation: game.observe(seat),
            terminal,
            reward: 0.0,
        })
    }

    /// Legal actions for the pending decision (empty when there is none).
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        self.game
            .as_ref()
            .map(TurnController::legal_actions)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingDecision> {
        self.game.as_ref().and_then(TurnController::pending)
    }

    /// View of any seat in the current game.
    #[must_use]
    pub fn observe(&self, player: PlayerId) -> Option<Observation> {
        self.game.as_ref().map(|game| game.observe(player))
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.game.as_ref().map_or(true, TurnController::is_over)
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.game.as_ref().and_then(|game| game.state().outcome())
    }

    /// The running game, if any.
    #[must_use]
    pub fn controller(&self) -> Option<&TurnController> {
        self.game.as_ref()
    }
}
