//! Core engine types: players, RNG, configuration, errors, actions, state.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod action;
pub mod state;

pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::GameConfig;
pub use error::{DurakError, Result};
pub use action::{Action, ActionRecord, AttackPlay, CardCombo, Cover, DefensePlay, PassOn};
pub use state::{Deal, GameOutcome, GameState, TrickFlags, TrickOutcome};
