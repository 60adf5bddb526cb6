//! Phase tags and pending-decision descriptors.

use serde::{Deserialize, Serialize};

use crate::core::player::PlayerId;

/// Where the current trick stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the attacker of record to open the trick.
    InitialAttack,
    /// Waiting for the defender.
    Defense,
    /// Non-defenders may add cards, one opportunity each.
    AdditionalAttack,
    /// Last attack round before a surrender.
    InChase,
    /// Surrendering defender chooses which attacks to keep.
    Pickup,
    GameOver,
}

impl Phase {
    /// Stable small integer for feature encoding.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Phase::InitialAttack => 0,
            Phase::Defense => 1,
            Phase::AdditionalAttack => 2,
            Phase::InChase => 3,
            Phase::Pickup => 4,
            Phase::GameOver => 5,
        }
    }

    pub const COUNT: usize = 6;
}

/// Which decision method a pending decision maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    Attack,
    Defense,
    Pickup,
}

/// The one decision the controller is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingDecision {
    pub player: PlayerId,
    pub kind: DecisionKind,
}
