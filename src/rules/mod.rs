//! Move generation.
//!
//! Pure functions over `&GameState`: they never mutate, so the turn
//! controller, agents, and tests can all ask for the legal set at any time.

pub mod combos;
pub mod engine;

pub use combos::{non_empty_subsets, Combinations, Matching, MatchingIter};
pub use engine::{
    is_legal_attack, is_legal_defense, is_legal_pickup, legal_attacks, legal_defenses,
    legal_pickup, normalize, pass_on_open,
};
