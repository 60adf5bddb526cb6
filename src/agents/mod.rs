//! Decision sources: who chooses moves.
//!
//! - `DecisionSource`: the trait the turn controller asks
//! - `RandomBot`: uniform over the legal set, seeded
//! - `ScriptedSource`: replays a queue of supplied actions

pub mod source;
pub mod random;
pub mod scripted;

pub use random::RandomBot;
pub use scripted::ScriptedSource;
pub use source::{request, DecisionSource};
