//! The trick state machine.
//!
//! `TurnController` owns a `GameState` and walks it through
//! `InitialAttack → Defense ⇄ AdditionalAttack → InChase → Beat | Surrender`
//! one decision at a time. It is resumable: `pending()` names the next
//! decision, `apply()` takes it, and everything between decisions (skipping
//! players with nothing to add, single-choice pickups, resolution, the next
//! trick's setup) happens inside `apply()`.
//!
//! ## Iterations
//!
//! After the opening attack, the trick runs in iterations: a Defense step
//! (skipped when nothing is unresolved) followed by one AdditionalAttack
//! round over the non-defenders in attack order. An iteration with neither
//! a defense nor an additional attack advances the stall counter; the trick
//! ends when the counter reaches `GameConfig::stall_limit`.
//!
//! A trick also ends when the defender takes, when its hand runs out while
//! defending, when the resolved count reaches the cap, or when the field is
//! fully covered and a whole round adds nothing. Ending with unresolved
//! attacks runs one InChase round and then a surrender; ending fully
//! covered goes straight to beat.
//!
//! `run()` drives a whole game against one `DecisionSource` per seat.

use std::collections::VecDeque;

use tracing::{debug, error, trace, warn};

use super::phase::{DecisionKind, Phase, PendingDecision};
use crate::agents::source::request;
use crate::agents::DecisionSource;
use crate::cards::Card;
use crate::core::action::{Action, AttackPlay, DefensePlay};
use crate::core::config::GameConfig;
use crate::core::error::{DurakError, Result};
use crate::core::player::PlayerId;
use crate::core::state::{GameOutcome, GameState, TrickOutcome};
use crate::observe::Observation;
use crate::rules::{
    is_legal_attack, is_legal_defense, is_legal_pickup, legal_attacks, legal_defenses,
    legal_pickup, normalize,
};

/// Position of the state machine between decisions.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Cursor {
    Opening,
    Defense,
    Attack {
        queue: VecDeque<PlayerId>,
        chase: bool,
    },
    Pickup,
    Over,
}

/// Drives one game, decision by decision.
#[derive(Clone, Debug)]
pub struct TurnController {
    state: GameState,
    cursor: Cursor,
    stall: u32,
    defended: bool,
    attacked: bool,
    aborted: bool,
}

impl TurnController {
    /// Deal a new game and open its first trick.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Self::from_state(GameState::new(config, seed)?)
    }

    /// Take over a state sitting between tricks and open the next one.
    pub fn from_state(state: GameState) -> Result<Self> {
        if !state.field().is_empty() {
            return Err(DurakError::invariant("controller needs a state between tricks"));
        }
        let mut controller = Self {
            state,
            cursor: Cursor::Over,
            stall: 0,
            defended: false,
            attacked: false,
            aborted: false,
        };
        if !controller.state.is_over() {
            controller.open_trick()?;
        }
        Ok(controller)
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn stall(&self) -> u32 {
        self.stall
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.cursor == Cursor::Over
    }

    /// Whether an invariant violation stopped this game.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match &self.cursor {
            Cursor::Opening => Phase::InitialAttack,
            Cursor::Defense => Phase::Defense,
            Cursor::Attack { chase: false, .. } => Phase::AdditionalAttack,
            Cursor::Attack { chase: true, .. } => Phase::InChase,
            Cursor::Pickup => Phase::Pickup,
            Cursor::Over => Phase::GameOver,
        }
    }

    /// The decision the game is waiting on, or `None` once it is over.
    #[must_use]
    pub fn pending(&self) -> Option<PendingDecision> {
        let (player, kind) = match &self.cursor {
            Cursor::Opening => (self.state.primary_attacker(), DecisionKind::Attack),
            Cursor::Defense => (self.state.defender(), DecisionKind::Defense),
            Cursor::Attack { queue, .. } => (*queue.front()?, DecisionKind::Attack),
            Cursor::Pickup => (self.state.defender(), DecisionKind::Pickup),
            Cursor::Over => return None,
        };
        Some(PendingDecision { player, kind })
    }

    /// Legal actions for the pending decision.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        let Some(pending) = self.pending() else {
            return Vec::new();
        };
        match pending.kind {
            DecisionKind::Attack => legal_attacks(&self.state, pending.player)
                .into_iter()
                .map(Action::Attack)
                .collect(),
            DecisionKind::Defense => legal_defenses(&self.state)
                .into_iter()
                .map(Action::Defend)
                .collect(),
            DecisionKind::Pickup => legal_pickup(&self.state)
                .into_iter()
                .map(Action::Pickup)
                .collect(),
        }
    }

    /// Final result, once the game has one.
    pub fn outcome(&self) -> Result<GameOutcome> {
        if self.aborted {
            return Err(DurakError::invariant("game was aborted"));
        }
        self.state
            .outcome()
            .ok_or_else(|| DurakError::invariant("game stopped without an outcome"))
    }

    /// What `player` is allowed to see right now.
    #[must_use]
    pub fn observe(&self, player: PlayerId) -> Observation {
        Observation::capture(&self.state, self.phase(), self.stall, player)
    }

    // === Driving ===

    /// Validate and apply `player`'s decision, then advance to the next one.
    ///
    /// Illegal submissions are rejected without touching the state. An
    /// invariant violation aborts the game: every later call fails.
    pub fn apply(&mut self, player: PlayerId, action: Action) -> Result<()> {
        if self.aborted {
            return Err(DurakError::invariant("game was aborted"));
        }
        match self.apply_checked(player, action) {
            Err(DurakError::InvariantViolation(reason)) => {
                error!(%reason, "invariant violated; aborting game");
                self.aborted = true;
                self.cursor = Cursor::Over;
                Err(DurakError::InvariantViolation(reason))
            }
            other => other,
        }
    }

    /// Play the game to the end, asking `sources[seat]` for each decision.
    pub fn run(&mut self, sources: &mut [Box<dyn DecisionSource>]) -> Result<GameOutcome> {
        if sources.len() != self.state.player_count() {
            return Err(DurakError::Config(format!(
                "{} decision sources for {} players",
                sources.len(),
                self.state.player_count()
            )));
        }
        let max_resubmits = self.state.config().max_resubmits;

        while let Some(pending) = self.pending() {
            let source = &mut sources[pending.player.index()];
            let mut rejected = 0;
            loop {
                let result = match request(source.as_mut(), &self.state, pending) {
                    Ok(action) => self.apply(pending.player, action),
                    Err(err) => Err(err),
                };
                match result {
                    Ok(()) => break,
                    Err(err)
                        if err.is_recoverable()
                            && source.retry_on_illegal()
                            && rejected < max_resubmits =>
                    {
                        rejected += 1;
                        warn!(
                            player = %pending.player,
                            source = source.name(),
                            attempt = rejected,
                            error = %err,
                            "submission rejected; asking again"
                        );
                    }
                    Err(err) => {
                        if err.is_recoverable() {
                            warn!(player = %pending.player, source = source.name(), error = %err, "submission rejected");
                        }
                        return Err(err);
                    }
                }
            }
        }
        self.outcome()
    }

    fn apply_checked(&mut self, player: PlayerId, action: Action) -> Result<()> {
        let pending = self.pending().ok_or(DurakError::GameOver)?;
        if player != pending.player {
            return Err(DurakError::illegal(
                player,
                format!("waiting on {}", pending.player),
            ));
        }
        let action = normalize(&self.state, &action);
        let legal = match (&action, pending.kind) {
            (Action::Attack(play), DecisionKind::Attack) => {
                is_legal_attack(&self.state, player, play)
            }
            (Action::Defend(play), DecisionKind::Defense) => is_legal_defense(&self.state, play),
            (Action::Pickup(cards), DecisionKind::Pickup) => is_legal_pickup(&self.state, cards),
            _ => {
                return Err(DurakError::illegal(
                    player,
                    format!("{action} does not answer a {:?} decision", pending.kind),
                ))
            }
        };
        if !legal {
            return Err(DurakError::illegal(player, format!("{action} is not legal here")));
        }

        trace!(player = %player, action = %action, "applying");
        self.state.record(player, action.clone());
        match action {
            Action::Attack(play) => self.on_attack(player, &play)?,
            Action::Defend(play) => self.on_defense(play)?,
            Action::Pickup(cards) => self.resolve_surrender(&cards)?,
        }
        self.advance()?;
        self.state.check_invariants()
    }

    // === Transitions ===

    fn on_attack(&mut self, player: PlayerId, play: &AttackPlay) -> Result<()> {
        if let AttackPlay::Cards(cards) = play {
            self.state.attack(player, cards)?;
        }
        if self.cursor == Cursor::Opening {
            self.begin_iteration();
            return Ok(());
        }
        if let Cursor::Attack { queue, chase } = &mut self.cursor {
            queue.pop_front();
            if !play.is_pass() && !*chase {
                self.attacked = true;
                self.stall = 0;
            }
        }
        Ok(())
    }

    fn on_defense(&mut self, play: DefensePlay) -> Result<()> {
        let defender = self.state.defender();
        match play {
            DefensePlay::Defend(covers) => {
                self.state.defend(&covers)?;
                self.defended = true;
                self.stall = 0;
                let room = self
                    .state
                    .discard_cap()
                    .saturating_sub(self.state.field().resolved_count());
                if self.state.hand(defender).is_empty() || room == 0 {
                    return self.end_trick();
                }
                self.start_attack_round(false);
            }
            DefensePlay::Take => {
                self.state.mark_taken();
                debug!(defender = %defender, "defender takes");
                return self.end_trick();
            }
            DefensePlay::Hold => {
                self.state.mark_responded();
                self.start_attack_round(false);
            }
            DefensePlay::PassOn(pass) => {
                self.state.pass_on(&pass)?;
                debug!(
                    from = %defender,
                    to = %self.state.defender(),
                    "trick passed on"
                );
                self.stall = 0;
                self.begin_iteration();
            }
        }
        Ok(())
    }

    /// Run automatic steps until a real decision is needed.
    fn advance(&mut self) -> Result<()> {
        loop {
            match &mut self.cursor {
                Cursor::Attack { queue, chase } => {
                    let chase = *chase;
                    while let Some(&player) = queue.front() {
                        if legal_attacks(&self.state, player)
                            .iter()
                            .any(|p| !p.is_pass())
                        {
                            return Ok(());
                        }
                        trace!(player = %player, "nothing to add; skipped");
                        queue.pop_front();
                    }
                    if chase {
                        self.cursor = Cursor::Pickup;
                    } else {
                        self.end_iteration()?;
                    }
                }
                Cursor::Pickup => {
                    let mut options = legal_pickup(&self.state);
                    if options.len() != 1 {
                        return Ok(());
                    }
                    let only: Vec<Card> = options.pop().unwrap_or_default();
                    trace!(defender = %self.state.defender(), "single pickup choice applied");
                    self.resolve_surrender(&only)?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn open_trick(&mut self) -> Result<()> {
        self.stall = 0;
        if !self.state.start_trick()? {
            self.cursor = Cursor::Over;
            return Ok(());
        }
        let attacker = self.state.primary_attacker();
        if legal_attacks(&self.state, attacker).is_empty() {
            return Err(DurakError::invariant(format!("{attacker} cannot open the trick")));
        }
        self.cursor = Cursor::Opening;
        Ok(())
    }

    fn begin_iteration(&mut self) {
        self.defended = false;
        self.attacked = false;
        if self.state.field().unresolved_count() > 0 {
            self.cursor = Cursor::Defense;
        } else {
            self.start_attack_round(false);
        }
    }

    fn start_attack_round(&mut self, chase: bool) {
        self.cursor = Cursor::Attack {
            queue: self.state.attack_order().into(),
            chase,
        };
    }

    fn end_iteration(&mut self) -> Result<()> {
        if !self.defended && !self.attacked {
            self.stall += 1;
        }
        if !self.attacked && self.state.field().all_resolved() {
            return self.end_trick();
        }
        if self.stall >= self.state.config().stall_limit {
            debug!(stall = self.stall, "trick stalled");
            return self.end_trick();
        }
        self.begin_iteration();
        Ok(())
    }

    fn end_trick(&mut self) -> Result<()> {
        self.stall = 0;
        if self.state.field().all_resolved() {
            let discarded = self.state.beat()?;
            debug!(trick = self.state.trick().number, discarded, "beat");
            self.finish(TrickOutcome::Beat)
        } else {
            self.start_attack_round(true);
            Ok(())
        }
    }

    fn resolve_surrender(&mut self, pickup: &[Card]) -> Result<()> {
        self.state.surrender(pickup)?;
        debug!(
            trick = self.state.trick().number,
            defender = %self.state.defender(),
            kept = pickup.len(),
            "surrender"
        );
        self.finish(TrickOutcome::Surrender)
    }

    fn finish(&mut self, outcome: TrickOutcome) -> Result<()> {
        let eliminated = self.state.finish_trick(outcome);
        if !eliminated.is_empty() {
            debug!(?eliminated, "players out");
        }
        if let Some(result) = self.state.outcome() {
            debug!(?result, tricks = self.state.trick().number, "game over");
            self.cursor = Cursor::Over;
            return Ok(());
        }
        self.open_trick()
    }
}
