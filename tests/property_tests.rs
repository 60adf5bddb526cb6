//! Property-based tests over randomly played games.
//!
//! Each case deals a seeded game and walks it to the end with a seeded
//! uniform chooser, checking conservation and legality at every decision.

mod common;

use proptest::prelude::*;

use rust_durak::{
    Action, AttackPlay, DecisionKind, DefensePlay, GameConfig, GameRng, GameState, PassOn,
    TurnController,
};

const DECISION_BUDGET: usize = 20_000;

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 48,
        ..ProptestConfig::default()
    }
}

fn config() -> impl Strategy<Value = GameConfig> {
    (2usize..=6, 1usize..=6).prop_map(|(players, hand)| {
        GameConfig::new().with_players(players).with_hand_size(hand)
    })
}

fn located_cards(state: &GameState) -> usize {
    let in_hands: usize = state.hands().iter().map(|(_, h)| h.len()).sum();
    state.deck().remaining() + in_hands + state.field().card_count() + state.discard().len()
}

fn check_legal_set(state: &GameState, kind: DecisionKind, legal: &[Action]) -> Result<(), TestCaseError> {
    prop_assert!(!legal.is_empty(), "a pending decision must offer moves");
    let field = state.field();
    for action in legal {
        match (kind, action) {
            (DecisionKind::Attack, Action::Attack(AttackPlay::Cards(cards))) => {
                prop_assert!(cards.len() + field.len() <= state.attack_limit());
                prop_assert!(cards.iter().all(|c| c.rank == cards[0].rank));
            }
            (DecisionKind::Attack, Action::Attack(AttackPlay::Pass)) => {
                prop_assert!(!field.is_empty(), "pass offered on an empty field");
            }
            (DecisionKind::Defense, Action::Defend(DefensePlay::Defend(covers))) => {
                prop_assert!(field.resolved_count() + covers.len() <= state.discard_cap());
                for cover in covers {
                    prop_assert!(cover.defense.beats(cover.attack, state.trump()));
                }
            }
            (DecisionKind::Defense, Action::Defend(DefensePlay::Take)) => {
                prop_assert!(field.unresolved_count() > 0);
            }
            (DecisionKind::Defense, Action::Defend(DefensePlay::PassOn(pass))) => {
                let next = state.next_active(state.defender());
                prop_assert!(next.is_some_and(|n| n != state.defender()));
                let next_hand = next.map_or(0, |n| state.hand(n).len());
                let added = match pass {
                    PassOn::Play(cards) => cards.len(),
                    PassOn::Show(_) => 0,
                };
                prop_assert!(field.len() + added <= state.discard_cap().min(next_hand));
            }
            (DecisionKind::Pickup, Action::Pickup(_)) => {
                prop_assert!(!state.trick().took, "a take offered a pickup choice");
            }
            (DecisionKind::Defense, Action::Defend(DefensePlay::Hold)) => {}
            (kind, action) => prop_assert!(false, "{action} offered for a {kind:?} decision"),
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Cards are never created or lost, and every offered move respects
    /// the caps and the beat relation.
    #[test]
    fn prop_conservation_and_legality(config in config(), seed in any::<u64>()) {
        common::init_tracing();
        let deck = config.deck_size();
        let mut game = TurnController::new(config, seed).unwrap();
        let mut chooser = GameRng::new(seed).for_context("chooser");

        let mut decisions = 0;
        while let Some(pending) = game.pending() {
            prop_assert_eq!(located_cards(game.state()), deck);
            prop_assert!(game.stall() < game.state().config().stall_limit);

            let legal = game.legal_actions();
            check_legal_set(game.state(), pending.kind, &legal)?;

            let action = chooser.choose(&legal).cloned().unwrap();
            game.apply(pending.player, action).unwrap();
            decisions += 1;
            prop_assert!(decisions < DECISION_BUDGET, "game did not terminate");
        }

        prop_assert_eq!(located_cards(game.state()), deck);
        prop_assert!(!game.is_aborted());
        prop_assert!(game.outcome().is_ok());
    }

    /// Replaying the recorded decisions reproduces the final state.
    #[test]
    fn prop_replay_is_deterministic(config in config(), seed in any::<u64>()) {
        let mut game = TurnController::new(config.clone(), seed).unwrap();
        let mut chooser = GameRng::new(seed ^ 0x5eed).for_context("chooser");
        while let Some(pending) = game.pending() {
            let legal = game.legal_actions();
            let action = chooser.choose(&legal).cloned().unwrap();
            game.apply(pending.player, action).unwrap();
        }

        let record = rust_durak::GameRecord::from_controller(seed, &game);
        let replayed = record.replay().unwrap();
        prop_assert_eq!(replayed.state().outcome(), game.state().outcome());
        prop_assert_eq!(replayed.state().discard(), game.state().discard());
        prop_assert_eq!(replayed.state().hands(), game.state().hands());
    }

    /// Every reachable pickup choice only names unresolved attacks.
    #[test]
    fn prop_pickup_choices_are_unresolved_attacks(seed in any::<u64>()) {
        let mut game = TurnController::new(GameConfig::new().with_players(3), seed).unwrap();
        let mut chooser = GameRng::new(seed).for_context("pickup");
        while let Some(pending) = game.pending() {
            let legal = game.legal_actions();
            if pending.kind == DecisionKind::Pickup {
                let state = game.state();
                for choice in &legal {
                    let Action::Pickup(cards) = choice else {
                        prop_assert!(false, "non-pickup action offered");
                        continue;
                    };
                    for card in cards {
                        prop_assert!(state
                            .field()
                            .unresolved()
                            .any(|s| s.attack == *card && s.owner != state.defender()));
                    }
                }
            }
            let action = chooser.choose(&legal).cloned().unwrap();
            game.apply(pending.player, action).unwrap();
        }
    }
}
