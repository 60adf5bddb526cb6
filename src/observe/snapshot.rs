//! Per-player observation snapshots.
//!
//! An `Observation` is everything one seat may legally know, with every
//! per-seat list rotated so the observer is index 0. It is the only view
//! agents and training wrappers get of a game.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit};
use crate::core::player::PlayerId;
use crate::core::state::{GameState, TrickOutcome};
use crate::turn::Phase;

/// One field slot, with seats relative to the observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub attack: Card,
    pub owner: usize,
    pub defense: Option<(Card, usize)>,
}

/// What is visible of another seat's hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentView {
    /// Seat relative to the observer (1 = next clockwise).
    pub seat: usize,
    /// Cards in hand that are not publicly known.
    pub concealed: usize,
    /// Cards publicly proven to be in this hand.
    pub known: Vec<Card>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Absolute seat of the observer.
    pub player: PlayerId,
    pub player_count: usize,
    /// Observer's hand, sorted.
    pub hand: Vec<Card>,
    /// Field slots in attack order.
    pub field: Vec<SlotView>,
    pub discard: Vec<Card>,
    /// Face-up indicator; `None` once drawn.
    pub trump_indicator: Option<Card>,
    pub trump: Suit,
    pub opponents: Vec<OpponentView>,
    /// Cards the observer cannot place: concealed opponent cards plus stock.
    pub unknown_cards: usize,
    pub defender: usize,
    pub primary_attacker: usize,
    /// Hand sizes, rotated.
    pub hand_sizes: Vec<usize>,
    /// Out flags, rotated.
    pub out: Vec<bool>,
    /// Cards left to draw, indicator included.
    pub stock_size: usize,
    pub phase: Phase,
    pub stall: u32,
    /// Result of the most recent resolution; cleared by the next opening.
    pub last_event: Option<TrickOutcome>,
}

impl Observation {
    /// Snapshot `state` as seen by `player`.
    #[must_use]
    pub fn capture(state: &GameState, phase: Phase, stall: u32, player: PlayerId) -> Self {
        let n = state.player_count();
        let rel = |seat: PlayerId| seat.relative_to(player, n);

        let mut hand = state.hand(player).to_vec();
        hand.sort();

        let field: Vec<SlotView> = state
            .field()
            .slots()
            .iter()
            .map(|slot| SlotView {
                attack: slot.attack,
                owner: rel(slot.owner),
                defense: slot.defense().map(|(card, by)| (card, rel(by))),
            })
            .collect();

        let opponents: Vec<OpponentView> = (1..n)
            .map(|k| {
                let seat = player.offset(k, n);
                let known = state.knowledge().known(seat);
                OpponentView {
                    seat: k,
                    concealed: state.hand(seat).len().saturating_sub(known.len()),
                    known,
                }
            })
            .collect();

        let trump_indicator = state.deck().indicator();
        let visible = hand.len()
            + state.field().card_count()
            + state.discard().len()
            + usize::from(trump_indicator.is_some())
            + opponents.iter().map(|o| o.known.len()).sum::<usize>();

        Self {
            player,
            player_count: n,
            hand,
            field,
            discard: state.discard().to_vec(),
            trump_indicator,
            trump: state.trump(),
            opponents,
            unknown_cards: state.total_cards().saturating_sub(visible),
            defender: rel(state.defender()),
            primary_attacker: rel(state.primary_attacker()),
            hand_sizes: state.hands().rotated(player).into_iter().map(Vec::len).collect(),
            out: PlayerId::all(n)
                .map(|k| state.is_out(player.offset(k.index(), n)))
                .collect(),
            stock_size: state.deck().remaining(),
            phase,
            stall,
            last_event: state.last_event(),
        }
    }
}
