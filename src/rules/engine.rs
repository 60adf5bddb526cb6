//! Legal move generation.
//!
//! Three enumerators, one per decision kind:
//! - `legal_attacks`: same-rank combinations a non-defender may add
//! - `legal_defenses`: cover matchings plus take, hold, and pass-on
//! - `legal_pickup`: which unresolved attacks a surrendering defender keeps
//!
//! Each returns its moves in a canonical order so that seeded agents pick
//! the same move for the same state. Submitted moves are validated by
//! normalizing them to that canonical form and checking membership.
//!
//! ## Capacity
//!
//! The trick cap is 5 while the discard pile is empty and 6 afterwards.
//! Attacks are further bounded by the defender's hand: a combination is
//! legal only if `field slots + combination <= min(cap, defender hand)`.
//! Defenses are bounded by the cap on resolved slots.

use smallvec::SmallVec;

use super::combos::{non_empty_subsets, MatchingIter};
use crate::cards::{Card, Rank};
use crate::core::action::{Action, AttackPlay, CardCombo, Cover, DefensePlay, PassOn};
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// Cards of `hand` grouped by rank, ascending; each group sorted by suit.
fn rank_groups<'a>(cards: impl Iterator<Item = &'a Card>) -> Vec<(Rank, Vec<Card>)> {
    let mut groups: Vec<(Rank, Vec<Card>)> = Vec::new();
    let mut sorted: Vec<Card> = cards.copied().collect();
    sorted.sort_by_key(|c| (c.rank.index(), c.suit.index()));
    for card in sorted {
        match groups.last_mut() {
            Some((rank, group)) if *rank == card.rank => group.push(card),
            _ => groups.push((card.rank, vec![card])),
        }
    }
    groups
}

/// Attack options for `attacker` in the current state.
///
/// Empty for the defender, for seats that are out, and once the game is
/// over. On an empty field every singleton and every same-rank group is
/// offered and `Pass` is not; otherwise only ranks already on the field
/// qualify and `Pass` comes last.
#[must_use]
pub fn legal_attacks(state: &GameState, attacker: PlayerId) -> Vec<AttackPlay> {
    if state.is_over() || attacker == state.defender() || state.is_out(attacker) {
        return Vec::new();
    }
    let field = state.field();
    let room = state.attack_limit().saturating_sub(field.len());
    let opening = field.is_empty();

    let candidates = state
        .hand(attacker)
        .iter()
        .filter(|c| opening || field.has_rank(c.rank));

    let mut plays = Vec::new();
    for (_, group) in rank_groups(candidates) {
        for subset in non_empty_subsets(&group) {
            if subset.len() <= room {
                plays.push(AttackPlay::Cards(CardCombo::from_vec(subset)));
            }
        }
    }
    if !opening {
        plays.push(AttackPlay::Pass);
    }
    plays
}

/// Whether the defender may still redirect the trick.
///
/// Only the first response of a defending turn, and only against a single
/// unresolved attack.
#[must_use]
pub fn pass_on_open(state: &GameState) -> bool {
    let field = state.field();
    !state.trick().defender_responded && field.len() == 1 && field.unresolved_count() == 1
}

fn pass_on_options(state: &GameState) -> Vec<DefensePlay> {
    let mut options = Vec::new();
    if !pass_on_open(state) {
        return options;
    }
    let defender = state.defender();
    let Some(next) = state.next_active(defender).filter(|&p| p != defender) else {
        return options;
    };
    let Some(slot) = state.field().slots().first() else {
        return options;
    };
    let rank = slot.attack.rank;
    let limit = state.discard_cap().min(state.hand(next).len());
    let room = limit.saturating_sub(state.field().len());

    let mut matching: Vec<Card> = state
        .hand(defender)
        .iter()
        .copied()
        .filter(|c| c.rank == rank)
        .collect();
    matching.sort();

    for subset in non_empty_subsets(&matching) {
        if subset.len() <= room {
            options.push(DefensePlay::PassOn(PassOn::Play(CardCombo::from_vec(subset))));
        }
    }
    // Showing moves the current field unchanged onto the next defender.
    if state.field().len() > limit {
        return options;
    }
    let trump = state.trump();
    for &card in &matching {
        if card.suit == trump && !state.trick().shown.contains(&card) {
            options.push(DefensePlay::PassOn(PassOn::Show(card)));
        }
    }
    options
}

/// Defense options for the current defender.
///
/// Empty when nothing on the field is unresolved. Otherwise: every partial
/// matching of unresolved attacks to beating hand cards that keeps the
/// resolved total within the cap (odometer order), then `Take`, `Hold`,
/// and any pass-on plays.
#[must_use]
pub fn legal_defenses(state: &GameState) -> Vec<DefensePlay> {
    if state.is_over() {
        return Vec::new();
    }
    let field = state.field();
    let unresolved: Vec<Card> = field.unresolved().map(|s| s.attack).collect();
    if unresolved.is_empty() {
        return Vec::new();
    }

    let trump = state.trump();
    let hand = state.hand(state.defender());
    let room = state.discard_cap().saturating_sub(field.resolved_count());

    let candidates: Vec<Vec<Card>> = unresolved
        .iter()
        .map(|&attack| {
            let mut beaters: Vec<Card> = hand
                .iter()
                .copied()
                .filter(|d| d.beats(attack, trump))
                .collect();
            beaters.sort();
            beaters
        })
        .collect();

    let mut plays: Vec<DefensePlay> = MatchingIter::new(candidates)
        .filter(|m| m.len() <= room)
        .map(|m| {
            DefensePlay::Defend(
                m.iter()
                    .map(|&(slot, card)| Cover::new(unresolved[slot], card))
                    .collect(),
            )
        })
        .collect();

    plays.push(DefensePlay::Take);
    plays.push(DefensePlay::Hold);
    plays.extend(pass_on_options(state));
    plays
}

/// Pickup choices for a surrendering defender.
///
/// Candidates are the unresolved attacks the defender did not play itself.
/// After a `Take` the only choice is all of them. Otherwise every non-empty
/// subset is offered; with no candidates the only choice is the empty
/// selection.
#[must_use]
pub fn legal_pickup(state: &GameState) -> Vec<Vec<Card>> {
    let defender = state.defender();
    let mut eligible: Vec<Card> = state
        .field()
        .unresolved()
        .filter(|s| s.owner != defender)
        .map(|s| s.attack)
        .collect();
    if eligible.is_empty() {
        return vec![Vec::new()];
    }
    eligible.sort_by_key(|c| (c.rank.index(), c.suit.index()));
    if state.trick().took {
        return vec![eligible];
    }
    non_empty_subsets(&eligible).collect()
}

// === Normalization and membership ===

fn sorted_combo(cards: &[Card]) -> CardCombo {
    let mut combo = CardCombo::from_slice(cards);
    combo.sort();
    combo
}

/// Canonical form of an attack: cards sorted.
#[must_use]
pub fn normalize_attack(play: &AttackPlay) -> AttackPlay {
    match play {
        AttackPlay::Cards(cards) => AttackPlay::Cards(sorted_combo(cards)),
        AttackPlay::Pass => AttackPlay::Pass,
    }
}

/// Canonical form of a defense: covers in field order, pass-on cards sorted.
#[must_use]
pub fn normalize_defense(state: &GameState, play: &DefensePlay) -> DefensePlay {
    match play {
        DefensePlay::Defend(covers) => {
            let position = |cover: &Cover| {
                state
                    .field()
                    .slots()
                    .iter()
                    .position(|s| s.attack == cover.attack)
                    .unwrap_or(usize::MAX)
            };
            let mut ordered: SmallVec<[Cover; 6]> = covers.clone();
            ordered.sort_by_key(position);
            DefensePlay::Defend(ordered)
        }
        DefensePlay::PassOn(PassOn::Play(cards)) => {
            DefensePlay::PassOn(PassOn::Play(sorted_combo(cards)))
        }
        other => other.clone(),
    }
}

/// Canonical form of a pickup selection.
#[must_use]
pub fn normalize_pickup(cards: &[Card]) -> Vec<Card> {
    let mut sorted = cards.to_vec();
    sorted.sort_by_key(|c| (c.rank.index(), c.suit.index()));
    sorted
}

#[must_use]
pub fn is_legal_attack(state: &GameState, attacker: PlayerId, play: &AttackPlay) -> bool {
    legal_attacks(state, attacker).contains(&normalize_attack(play))
}

#[must_use]
pub fn is_legal_defense(state: &GameState, play: &DefensePlay) -> bool {
    legal_defenses(state).contains(&normalize_defense(state, play))
}

#[must_use]
pub fn is_legal_pickup(state: &GameState, cards: &[Card]) -> bool {
    legal_pickup(state).contains(&normalize_pickup(cards))
}

/// Canonical form of any action.
#[must_use]
pub fn normalize(state: &GameState, action: &Action) -> Action {
    match action {
        Action::Attack(play) => Action::Attack(normalize_attack(play)),
        Action::Defend(play) => Action::Defend(normalize_defense(state, play)),
        Action::Pickup(cards) => Action::Pickup(normalize_pickup(cards)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;
    use crate::core::config::GameConfig;
    use crate::core::state::Deal;

    fn c(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn cards(list: &str) -> Vec<Card> {
        list.split_whitespace().map(c).collect()
    }

    fn p(i: u8) -> PlayerId {
        PlayerId::new(i)
    }

    fn state(players: usize, hands: &[&str], discard: &str) -> GameState {
        let deal = Deal {
            hands: hands.iter().map(|h| cards(h)).collect(),
            trump: Some(Suit::Diamonds),
            discard: cards(discard),
            primary_attacker: p(0),
            ..Deal::default()
        };
        let mut state =
            GameState::from_deal(GameConfig::new().with_players(players), deal).unwrap();
        state.start_trick().unwrap();
        state
    }

    fn attack_cards(plays: &[AttackPlay]) -> Vec<Vec<Card>> {
        plays
            .iter()
            .filter_map(|p| match p {
                AttackPlay::Cards(cs) => Some(cs.to_vec()),
                AttackPlay::Pass => None,
            })
            .collect()
    }

    #[test]
    fn test_opening_attacks_singletons_and_groups() {
        let s = state(2, &["6S 6H 9C", "7S 8S 9S TS JS"], "");
        let plays = legal_attacks(&s, p(0));
        let combos = attack_cards(&plays);
        assert!(!plays.contains(&AttackPlay::Pass));
        assert_eq!(
            combos,
            vec![
                cards("6S"),
                cards("6H"),
                cards("6S 6H"),
                cards("9C"),
            ]
        );
    }

    #[test]
    fn test_defender_never_attacks() {
        let s = state(2, &["6S", "7S"], "");
        assert!(legal_attacks(&s, p(1)).is_empty());
    }

    #[test]
    fn test_attack_capped_by_defender_hand() {
        // Defender holds two cards, so no combination may exceed two.
        let s = state(2, &["6S 6C 6H 6D", "7S 8S"], "");
        let plays = legal_attacks(&s, p(0));
        assert!(plays.iter().all(|p| p.len() <= 2));
        assert_eq!(plays.len(), 4 + 6);
    }

    #[test]
    fn test_first_trick_cap_is_five() {
        let s = state(2, &["6S", "7S 8S 9S TS JS QS"], "");
        assert_eq!(s.attack_limit(), 5);
        let s = state(2, &["6S", "7S 8S 9S TS JS QS"], "AC AH");
        assert_eq!(s.attack_limit(), 6);
    }

    #[test]
    fn test_additional_attacks_match_field_ranks() {
        let mut s = state(2, &["6S 6H 7C 9C", "7S 8S 9S TS"], "");
        s.attack(p(0), &[c("6S")]).unwrap();
        s.defend(&[Cover::new(c("6S"), c("7S"))]).unwrap();

        let plays = legal_attacks(&s, p(0));
        assert_eq!(
            plays,
            vec![
                AttackPlay::cards(&[c("6H")]),
                AttackPlay::cards(&[c("7C")]),
                AttackPlay::Pass,
            ]
        );
    }

    #[test]
    fn test_defenses_beat_relation_and_no_reuse() {
        let mut s = state(2, &["6S 6H", "7S 7D 9C"], "");
        s.attack(p(0), &[c("6S"), c("6H")]).unwrap();
        let plays = legal_defenses(&s);
        let trump = s.trump();

        for play in &plays {
            if let DefensePlay::Defend(covers) = play {
                assert!(!covers.is_empty());
                for cover in covers {
                    assert!(cover.defense.beats(cover.attack, trump));
                }
                let mut used: Vec<Card> = covers.iter().map(|c| c.defense).collect();
                used.sort();
                used.dedup();
                assert_eq!(used.len(), covers.len());
            }
        }
        // 6S: {7S, 7D}; 6H: {7D}. Singles 3, pairs only 7S+7D.
        let defends = plays
            .iter()
            .filter(|p| matches!(p, DefensePlay::Defend(_)))
            .count();
        assert_eq!(defends, 4);
        assert!(plays.contains(&DefensePlay::Take));
        assert!(plays.contains(&DefensePlay::Hold));
    }

    #[test]
    fn test_no_defenses_when_all_resolved() {
        let mut s = state(2, &["6S 9H", "7S 9C"], "");
        s.attack(p(0), &[c("6S")]).unwrap();
        s.defend(&[Cover::new(c("6S"), c("7S"))]).unwrap();
        assert!(legal_defenses(&s).is_empty());
    }

    #[test]
    fn test_pass_on_options() {
        let mut s = state(3, &["7C", "7H 7D 9S", "8S 8C 8H"], "");
        s.attack(p(0), &[c("7C")]).unwrap();
        let plays = legal_defenses(&s);

        assert!(plays.contains(&DefensePlay::PassOn(PassOn::Play(CardCombo::from_slice(&[
            c("7H")
        ])))));
        assert!(plays.contains(&DefensePlay::PassOn(PassOn::Play(CardCombo::from_slice(&[
            c("7H"),
            c("7D")
        ])))));
        assert!(plays.contains(&DefensePlay::PassOn(PassOn::Show(c("7D")))));
        assert!(!plays.contains(&DefensePlay::PassOn(PassOn::Show(c("7H")))));
    }

    #[test]
    fn test_pass_on_capped_by_next_defender() {
        // Next defender holds two cards: 1 on the field + at most 1 more.
        let mut s = state(3, &["7C", "7H 7S 9S", "8S 8C"], "");
        s.attack(p(0), &[c("7C")]).unwrap();
        let passes: Vec<DefensePlay> = legal_defenses(&s)
            .into_iter()
            .filter(|p| matches!(p, DefensePlay::PassOn(PassOn::Play(_))))
            .collect();
        assert_eq!(passes.len(), 2);
    }

    #[test]
    fn test_pass_on_closed_after_response() {
        let mut s = state(3, &["7C 7S", "7H 8C", "8S 8H 9H"], "");
        s.attack(p(0), &[c("7C"), c("7S")]).unwrap();
        assert!(!pass_on_open(&s));

        let mut s = state(3, &["7C", "7H 8C", "8S 8H 9H"], "");
        s.attack(p(0), &[c("7C")]).unwrap();
        s.mark_responded();
        assert!(!legal_defenses(&s)
            .iter()
            .any(|p| matches!(p, DefensePlay::PassOn(_))));
    }

    #[test]
    fn test_pickup_excludes_defender_cards() {
        let mut s = state(3, &["7C", "7H 9S", "8S 8C 8H"], "");
        s.attack(p(0), &[c("7C")]).unwrap();
        s.pass_on(&PassOn::Play(CardCombo::from_slice(&[c("7H")])))
            .unwrap();
        // Seat 2 now defends both sevens; both were played by others.
        assert_eq!(s.defender(), p(2));
        let picks = legal_pickup(&s);
        assert_eq!(picks.len(), 3);
        assert!(picks.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn test_pickup_empty_choice_when_nothing_eligible() {
        let mut s = state(2, &["6S 9H", "7S 9C"], "");
        s.attack(p(0), &[c("6S")]).unwrap();
        s.defend(&[Cover::new(c("6S"), c("7S"))]).unwrap();
        assert_eq!(legal_pickup(&s), vec![Vec::<Card>::new()]);
    }

    #[test]
    fn test_is_legal_normalizes_order() {
        let mut s = state(2, &["6S 6H", "7S 7H 9C"], "");
        assert!(is_legal_attack(&s, p(0), &AttackPlay::cards(&[c("6H"), c("6S")])));
        assert!(!is_legal_attack(&s, p(0), &AttackPlay::Pass));

        s.attack(p(0), &[c("6S"), c("6H")]).unwrap();
        let reversed = DefensePlay::defend(&[(c("6H"), c("7H")), (c("6S"), c("7S"))]);
        assert!(is_legal_defense(&s, &reversed));
        let bogus = DefensePlay::defend(&[(c("6S"), c("9C"))]);
        assert!(!is_legal_defense(&s, &bogus));
        assert!(is_legal_pickup(&s, &[c("6H"), c("6S")]));
    }
}
