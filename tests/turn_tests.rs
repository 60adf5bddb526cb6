//! Trick sequencing through the turn controller.
//!
//! Every test builds a fixed position with no stock, so the whole trick is
//! determined by the submitted actions.

mod common;

use common::{c, cards, controller, init_tracing, p, position, sorted};
use rust_durak::{
    Action, AttackPlay, Cover, DecisionKind, DefensePlay, DurakError, GameOutcome, PassOn, Phase,
    TrickOutcome, TurnController,
};
use smallvec::smallvec;

fn attack(list: &str) -> Action {
    Action::Attack(AttackPlay::cards(&cards(list)))
}

fn pass() -> Action {
    Action::Attack(AttackPlay::Pass)
}

fn cover(attack: &str, defense: &str) -> Action {
    Action::Defend(DefensePlay::defend(&[(c(attack), c(defense))]))
}

const TWO_SEAT_DISCARD: &str = "TS JS TC JC TH JH 6D 7D 8D 9D TD JD";

#[test]
fn test_single_defense_beat_at_state_level() {
    init_tracing();
    let mut state = position(&["6S 6C 7S 7C 8S 8C", "9S 9C 9H 8H 7H 6H"], TWO_SEAT_DISCARD);
    assert_eq!(state.total_cards(), 24);
    assert!(state.start_trick().unwrap());
    assert_eq!(state.defender(), p(1));

    state.attack(p(0), &[c("6S")]).unwrap();
    state.defend(&[Cover::new(c("6S"), c("9S"))]).unwrap();
    assert_eq!(state.beat().unwrap(), 2);
    state.finish_trick(TrickOutcome::Beat);

    assert_eq!(state.hand(p(0)).len(), 5);
    assert_eq!(state.hand(p(1)).len(), 5);
    assert_eq!(state.discard().len(), 14);
    assert!(state.field().is_empty());
    assert_eq!(state.primary_attacker(), p(1));
    assert_eq!(state.defender(), p(0));
    state.check_invariants().unwrap();
}

#[test]
fn test_single_defense_beat_through_controller() {
    init_tracing();
    let mut ctl = controller(&["6S 6C 7S 7C 8S 8C", "9S 9C 9H 8H 7H 6H"], TWO_SEAT_DISCARD);
    ctl.apply(p(0), attack("6S")).unwrap();
    ctl.apply(p(1), cover("6S", "9S")).unwrap();

    // 6C still matches a rank on the field, so the attacker is asked.
    assert_eq!(ctl.phase(), Phase::AdditionalAttack);
    assert!(ctl.legal_actions().contains(&attack("6C")));
    ctl.apply(p(0), pass()).unwrap();

    let state = ctl.state();
    assert_eq!(state.last_event(), Some(TrickOutcome::Beat));
    assert_eq!(state.hand(p(0)).len(), 5);
    assert_eq!(state.hand(p(1)).len(), 5);
    assert_eq!(state.discard().len(), 14);
    assert_eq!(state.primary_attacker(), p(1));
    assert_eq!(state.trick().number, 2);
    assert_eq!(ctl.pending().map(|d| d.player), Some(p(1)));
    assert_eq!(state.history().len(), 3);
}

#[test]
fn test_pass_on_play_then_take() {
    init_tracing();
    let mut ctl = controller(&["7C 9S", "7H 9C", "8S 8C 8H"], "");
    ctl.apply(p(0), attack("7C")).unwrap();

    let pass_on = Action::Defend(DefensePlay::PassOn(PassOn::Play(smallvec![c("7H")])));
    assert!(ctl.legal_actions().contains(&pass_on));
    ctl.apply(p(1), pass_on).unwrap();

    let state = ctl.state();
    let slots = state.field().slots();
    assert_eq!(slots.len(), 2);
    assert!(slots.iter().all(|s| !s.is_resolved()));
    assert_eq!(slots[1].owner, p(1));
    assert_eq!(state.primary_attacker(), p(1));
    assert_eq!(state.defender(), p(2));
    assert!(state.discard().is_empty());
    assert_eq!(ctl.phase(), Phase::Defense);

    // A second redirection needs a single-slot field.
    assert!(!ctl
        .legal_actions()
        .iter()
        .any(|a| matches!(a, Action::Defend(DefensePlay::PassOn(_)))));

    ctl.apply(p(2), Action::Defend(DefensePlay::Take)).unwrap();

    // Nobody can add a seven, so the whole field goes to p2 at once.
    let state = ctl.state();
    assert_eq!(state.last_event(), Some(TrickOutcome::Surrender));
    assert_eq!(state.hand(p(0)), cards("9S").as_slice());
    assert_eq!(state.hand(p(1)), cards("9C").as_slice());
    assert_eq!(sorted(state.hand(p(2)).to_vec()), sorted(cards("8S 8C 8H 7C 7H")));
    assert_eq!(state.primary_attacker(), p(0));
    assert_eq!(state.defender(), p(1));
}

#[test]
fn test_take_picks_up_every_attack() {
    init_tracing();
    let mut ctl = controller(&["6S 6C 9H", "7H 8H"], "");
    ctl.apply(p(0), attack("6S 6C")).unwrap();
    ctl.apply(p(1), Action::Defend(DefensePlay::Take)).unwrap();

    let state = ctl.state();
    assert_eq!(state.last_event(), Some(TrickOutcome::Surrender));
    assert_eq!(state.hand(p(0)), cards("9H").as_slice());
    assert_eq!(sorted(state.hand(p(1)).to_vec()), sorted(cards("7H 8H 6S 6C")));
    // The forced pickup is applied, not asked for.
    assert_eq!(state.history().len(), 2);
}

#[test]
fn test_stalled_surrender_offers_pickup_choice() {
    init_tracing();
    let mut ctl = controller(&["6S 6C 9H", "7H 8H"], "");
    ctl.apply(p(0), attack("6S 6C")).unwrap();
    for _ in 0..5 {
        ctl.apply(p(1), Action::Defend(DefensePlay::Hold)).unwrap();
    }

    assert_eq!(ctl.phase(), Phase::Pickup);
    assert_eq!(ctl.pending().map(|d| d.kind), Some(DecisionKind::Pickup));
    assert_eq!(
        ctl.legal_actions(),
        vec![
            Action::Pickup(cards("6S")),
            Action::Pickup(cards("6C")),
            Action::Pickup(cards("6S 6C")),
        ]
    );

    ctl.apply(p(1), Action::Pickup(cards("6C"))).unwrap();
    let state = ctl.state();
    assert_eq!(state.last_event(), Some(TrickOutcome::Surrender));
    assert_eq!(sorted(state.hand(p(0)).to_vec()), sorted(cards("6S 9H")));
    assert_eq!(sorted(state.hand(p(1)).to_vec()), sorted(cards("7H 8H 6C")));
}

#[test]
fn test_show_then_play_returns_own_card_to_defender() {
    init_tracing();
    let mut ctl = controller(&["7C 9S 9H TS", "7D 9C", "7S 8C 8H"], "");
    ctl.apply(p(0), attack("7C")).unwrap();

    ctl.apply(p(1), Action::Defend(DefensePlay::PassOn(PassOn::Show(c("7D")))))
        .unwrap();
    assert_eq!(ctl.state().field().len(), 1);
    assert_eq!(ctl.state().defender(), p(2));
    assert!(ctl.state().knowledge().is_known(p(1), c("7D")));
    let seen_by_p0 = ctl.observe(p(0));
    assert_eq!(seen_by_p0.opponents[0].known, cards("7D"));

    ctl.apply(
        p(2),
        Action::Defend(DefensePlay::PassOn(PassOn::Play(smallvec![c("7S")]))),
    )
    .unwrap();
    assert_eq!(ctl.state().primary_attacker(), p(2));
    assert_eq!(ctl.state().defender(), p(0));

    ctl.apply(p(0), Action::Defend(DefensePlay::Take)).unwrap();
    // The chase reaches p1, who still holds a seven.
    assert_eq!(ctl.phase(), Phase::InChase);
    assert_eq!(ctl.pending().map(|d| d.player), Some(p(1)));
    ctl.apply(p(1), pass()).unwrap();

    // p0 may only keep p2's seven; its own card comes back regardless.
    let state = ctl.state();
    assert_eq!(state.last_event(), Some(TrickOutcome::Surrender));
    assert_eq!(sorted(state.hand(p(0)).to_vec()), sorted(cards("9S 9H TS 7C 7S")));
    assert_eq!(sorted(state.hand(p(1)).to_vec()), sorted(cards("7D 9C")));
    assert_eq!(sorted(state.hand(p(2)).to_vec()), sorted(cards("8C 8H")));
    assert_eq!(state.primary_attacker(), p(1));
}

#[test]
fn test_repeated_holds_hit_stall_limit() {
    init_tracing();
    let mut ctl = controller(&["6S 9H", "7C 8C"], "");
    ctl.apply(p(0), attack("6S")).unwrap();

    for expected in 1..5 {
        ctl.apply(p(1), Action::Defend(DefensePlay::Hold)).unwrap();
        assert_eq!(ctl.stall(), expected);
        assert_eq!(ctl.phase(), Phase::Defense);
        assert!(ctl.observe(p(0)).stall < 5);
    }
    ctl.apply(p(1), Action::Defend(DefensePlay::Hold)).unwrap();

    let state = ctl.state();
    assert_eq!(state.last_event(), Some(TrickOutcome::Surrender));
    assert_eq!(sorted(state.hand(p(1)).to_vec()), sorted(cards("6S 7C 8C")));
    assert_eq!(ctl.stall(), 0);
    assert_eq!(state.history().len(), 6);
    assert_eq!(state.primary_attacker(), p(0));
}

#[test]
fn test_defender_emptying_hand_ends_trick() {
    init_tracing();
    let mut ctl = controller(&["6S 6C", "7S"], "");
    // One card in the defender's hand caps the attack at one card.
    assert!(!ctl.legal_actions().contains(&attack("6S 6C")));
    ctl.apply(p(0), attack("6S")).unwrap();
    ctl.apply(p(1), cover("6S", "7S")).unwrap();

    assert!(ctl.is_over());
    assert_eq!(ctl.outcome().unwrap(), GameOutcome::Durak(p(0)));
    assert!(ctl.state().is_out(p(1)));
}

#[test]
fn test_everyone_out_together_is_draw() {
    let mut ctl = controller(&["6S", "7S"], "");
    ctl.apply(p(0), attack("6S")).unwrap();
    ctl.apply(p(1), cover("6S", "7S")).unwrap();
    assert_eq!(ctl.outcome().unwrap(), GameOutcome::Draw);
}

#[test]
fn test_single_active_seat_is_durak_before_play() {
    let ctl = TurnController::from_state(position(&["6S", ""], "")).unwrap();
    assert!(ctl.is_over());
    assert_eq!(ctl.outcome().unwrap(), GameOutcome::Durak(p(0)));
    assert_eq!(ctl.phase(), Phase::GameOver);
}

#[test]
fn test_non_beating_cover_is_illegal_and_harmless() {
    let mut ctl = controller(&["6S 9H", "7C 8C"], "");
    ctl.apply(p(0), attack("6S")).unwrap();
    let err = ctl.apply(p(1), cover("6S", "7C")).unwrap_err();
    assert!(matches!(err, DurakError::IllegalMove { .. }));
    assert!(err.is_recoverable());
    assert_eq!(ctl.state().field().unresolved_count(), 1);
    assert_eq!(ctl.state().hand(p(1)).len(), 2);
    assert!(!ctl.is_aborted());
}

#[test]
fn test_unsorted_submission_is_normalized() {
    let mut ctl = controller(&["6S 6C 9H", "7S 8H TC"], "");
    ctl.apply(p(0), attack("6C 6S")).unwrap();
    assert_eq!(ctl.state().field().len(), 2);
    let recorded = &ctl.state().history()[0].action;
    assert_eq!(*recorded, attack("6S 6C"));
}
