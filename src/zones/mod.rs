//! Shared card locations outside the hands and stock.
//!
//! - `Field`: ordered attack slots of the current trick
//! - `PublicKnowledge`: which hand cards are publicly known

pub mod field;
pub mod knowledge;

pub use field::{Field, FieldSlot, SlotState};
pub use knowledge::PublicKnowledge;
