//! Turn sequencing: the phase state machine that adjudicates tricks.

pub mod phase;
pub mod controller;

pub use controller::TurnController;
pub use phase::{DecisionKind, PendingDecision, Phase};
