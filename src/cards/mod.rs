//! Card system: the card value model and the shared deck.
//!
//! ## Key Types
//!
//! - `Rank`, `Suit`: fixed canonical sets (6..A, four suits)
//! - `Card`: immutable value with an explicit suit-then-rank order
//! - `Deck`: shuffled stock with a trump indicator drawn last

pub mod card;
pub mod deck;

pub use card::{Card, Rank, Suit};
pub use deck::Deck;
