//! Decision source fed from a queue of externally supplied actions.
//!
//! This is how a programmatic agent plugs into `TurnController::run`: push
//! the actions it wants to take and let the controller pull them in order.
//! A queued action of the wrong kind, or one missing when asked, is an
//! illegal move for the player being asked.

use std::collections::VecDeque;

use crate::cards::Card;
use crate::core::action::{Action, AttackPlay, DefensePlay};
use crate::core::error::{DurakError, Result};
use crate::core::player::PlayerId;
use crate::core::state::GameState;

use super::source::DecisionSource;

#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    queue: VecDeque<Action>,
    retry: bool,
}

impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source that will play `actions` in order.
    #[must_use]
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            queue: actions.into_iter().collect(),
            retry: false,
        }
    }

    /// Ask to be re-queried after an illegal submission.
    #[must_use]
    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    pub fn push(&mut self, action: impl Into<Action>) {
        self.queue.push_back(action.into());
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    fn next_action(&mut self, player: PlayerId) -> Result<Action> {
        self.queue
            .pop_front()
            .ok_or_else(|| DurakError::illegal(player, "script has no action queued"))
    }
}

impl DecisionSource for ScriptedSource {
    fn decide_attack(
        &mut self,
        _state: &GameState,
        player: PlayerId,
        _legal: &[AttackPlay],
    ) -> Result<AttackPlay> {
        match self.next_action(player)? {
            Action::Attack(play) => Ok(play),
            other => Err(DurakError::illegal(player, format!("expected an attack, got {other}"))),
        }
    }

    fn decide_defense(&mut self, state: &GameState, _legal: &[DefensePlay]) -> Result<DefensePlay> {
        let player = state.defender();
        match self.next_action(player)? {
            Action::Defend(play) => Ok(play),
            other => Err(DurakError::illegal(player, format!("expected a defense, got {other}"))),
        }
    }

    fn decide_pickup(&mut self, state: &GameState, _legal: &[Vec<Card>]) -> Result<Vec<Card>> {
        let player = state.defender();
        match self.next_action(player)? {
            Action::Pickup(cards) => Ok(cards),
            other => Err(DurakError::illegal(player, format!("expected a pickup, got {other}"))),
        }
    }

    fn retry_on_illegal(&self) -> bool {
        self.retry
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
