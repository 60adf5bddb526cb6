//! # rust-durak
//!
//! A rule engine for the card game Durak, built for self-play training.
//!
//! ## Design Principles
//!
//! 1. **Legality Is Generated**: every decision point has a finite,
//!    deterministic list of legal actions. Submissions are normalized and
//!    checked for membership in that list.
//!
//! 2. **N-Player First**: 2-6 seats; no API assumes two players.
//!
//! 3. **Seeded Everything**: a game is reproducible from its config, its
//!    seed, and the decisions taken.
//!
//! ## Architecture
//!
//! - **Pull-Based Turns**: the `TurnController` names the pending decision;
//!   callers answer it directly or hand it a set of `DecisionSource`s.
//!
//! - **Persistent Data Structures**: action history and public knowledge
//!   use `im-rs`, so cloning a game is cheap.
//!
//! ## Modules
//!
//! - `core`: players, RNG, configuration, errors, actions, game state
//! - `cards`: card values and the deck
//! - `zones`: the field and public knowledge
//! - `rules`: legal-move generation and normalization
//! - `turn`: the turn controller and its phases
//! - `agents`: decision sources (random, scripted)
//! - `observe`: per-seat observations and their feature encoding
//! - `env`: step-based environment wrapper
//! - `training`: replay records and self-play batches

pub mod core;
pub mod cards;
pub mod zones;
pub mod rules;
pub mod turn;
pub mod agents;
pub mod observe;
pub mod env;
pub mod training;

#[cfg(feature = "python")]
mod python;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap,
    GameRng, GameRngState,
    GameConfig, DurakError, Result,
    Action, ActionRecord, AttackPlay, Cover, DefensePlay, PassOn,
    Deal, GameOutcome, GameState, TrickOutcome,
};

pub use crate::cards::{Card, Deck, Rank, Suit};

pub use crate::zones::{Field, FieldSlot, PublicKnowledge};

pub use crate::rules::{legal_attacks, legal_defenses, legal_pickup, normalize};

pub use crate::turn::{DecisionKind, PendingDecision, Phase, TurnController};

pub use crate::agents::{DecisionSource, RandomBot, ScriptedSource};

pub use crate::observe::{Observation, ObservationEncoder};

pub use crate::env::{DurakEnv, StepOutcome};

pub use crate::training::{GameRecord, SelfPlayConfig, SelfPlayWorker, Trajectory};
