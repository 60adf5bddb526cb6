//! What agents see: per-player snapshots and their feature encoding.

pub mod snapshot;
pub mod encoder;

pub use encoder::ObservationEncoder;
pub use snapshot::{Observation, OpponentView, SlotView};
