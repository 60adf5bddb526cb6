//! The decision-source interface consumed by the turn controller.

use crate::cards::Card;
use crate::core::action::{Action, AttackPlay, DefensePlay};
use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::rules::{legal_attacks, legal_defenses, legal_pickup};
use crate::turn::{DecisionKind, PendingDecision};

/// Anything that can make Durak decisions: a bot, a script, a remote agent.
///
/// Each method receives the freshly computed legal set for the decision.
/// The controller validates whatever comes back against that set and never
/// coerces an illegal choice into a legal one.
pub trait DecisionSource: Send {
    /// Choose an attack for `player` (opening, additional, or chase).
    fn decide_attack(
        &mut self,
        state: &GameState,
        player: PlayerId,
        legal: &[AttackPlay],
    ) -> Result<AttackPlay>;

    /// Choose the defender's response.
    fn decide_defense(&mut self, state: &GameState, legal: &[DefensePlay]) -> Result<DefensePlay>;

    /// Choose which unresolved attacks a surrendering defender keeps.
    fn decide_pickup(&mut self, state: &GameState, legal: &[Vec<Card>]) -> Result<Vec<Card>>;

    /// Whether an illegal submission should be answered with a fresh request
    /// (up to `GameConfig::max_resubmits` times) instead of an error.
    fn retry_on_illegal(&self) -> bool {
        false
    }

    /// Short label for logs.
    fn name(&self) -> &str {
        "source"
    }
}

/// Ask `source` for the decision described by `pending`, passing it the
/// current legal set.
pub fn request(
    source: &mut dyn DecisionSource,
    state: &GameState,
    pending: PendingDecision,
) -> Result<Action> {
    match pending.kind {
        DecisionKind::Attack => {
            let legal = legal_attacks(state, pending.player);
            source
                .decide_attack(state, pending.player, &legal)
                .map(Action::Attack)
        }
        DecisionKind::Defense => {
            let legal = legal_defenses(state);
            source.decide_defense(state, &legal).map(Action::Defend)
        }
        DecisionKind::Pickup => {
            let legal = legal_pickup(state);
            source.decide_pickup(state, &legal).map(Action::Pickup)
        }
    }
}
