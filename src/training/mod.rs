//! Self-play data generation.
//!
//! ## Overview
//!
//! - **GameRecord**: seed, config and decisions; replays to the same game
//! - **Trajectory**: per-decision steps of one game plus its outcome
//! - **SelfPlayWorker**: plays seeded games with `RandomBot` at every seat
//!
//! ## Usage
//!
//! ```rust
//! use rust_durak::training::{BatchStats, SelfPlayConfig, SelfPlayWorker};
//!
//! let worker = SelfPlayWorker::new(SelfPlayConfig::default().with_games(4)).unwrap();
//! let trajectories = worker.play_parallel(2).unwrap();
//! let stats = BatchStats::from_trajectories(&trajectories);
//! assert_eq!(stats.games, 4);
//! ```

pub mod record;
pub mod self_play;
pub mod trajectory;

pub use record::GameRecord;
pub use self_play::{SelfPlayConfig, SelfPlayWorker};
pub use trajectory::{BatchStats, Step, Trajectory};
