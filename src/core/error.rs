//! Error taxonomy for the engine.
//!
//! `Validation` and `IllegalMove` are recoverable at the boundary: the
//! submitter may try again. `InvariantViolation` means a defect in move
//! generation or mutation and aborts the game.

use thiserror::Error;

use super::player::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurakError {
    /// A card (or rank/suit) outside the canonical sets.
    #[error("invalid card: {0}")]
    Validation(String),

    /// A submitted action is not in the currently computed legal set.
    #[error("illegal move by {player}: {reason}")]
    IllegalMove { player: PlayerId, reason: String },

    /// Internal consistency failure.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("game is over")]
    GameOver,

    #[error("record codec error: {0}")]
    Codec(String),
}

impl DurakError {
    pub(crate) fn illegal(player: PlayerId, reason: impl Into<String>) -> Self {
        Self::IllegalMove {
            player,
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        Self::InvariantViolation(reason.into())
    }

    /// Whether the caller may resubmit after this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::IllegalMove { .. })
    }
}

pub type Result<T> = std::result::Result<T, DurakError>;
