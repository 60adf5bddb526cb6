//! Action representation.
//!
//! Every decision point takes one of three kinds of action:
//! - `Attack`: a same-rank card combination, or pass
//! - `Defend`: cover pairs, take, hold, or pass the attack on
//! - `Pickup`: which unresolved attack cards a surrendering defender keeps
//!
//! Actions are plain values; legality is decided by `rules` against the
//! current state, never by the action itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::cards::Card;

/// Same-rank card combination. At most four cards share a rank.
pub type CardCombo = SmallVec<[Card; 4]>;

/// An attack decision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPlay {
    /// Put these same-rank cards on the field.
    Cards(CardCombo),
    /// Add nothing. Never legal as the opening move of a trick.
    Pass,
}

impl AttackPlay {
    /// Attack with the given cards.
    #[must_use]
    pub fn cards(cards: &[Card]) -> Self {
        Self::Cards(SmallVec::from_slice(cards))
    }

    /// Number of cards played (0 for pass).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Cards(cards) => cards.len(),
            Self::Pass => 0,
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// One defense card laid on one attack card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cover {
    pub attack: Card,
    pub defense: Card,
}

impl Cover {
    #[must_use]
    pub const fn new(attack: Card, defense: Card) -> Self {
        Self { attack, defense }
    }
}

/// How the defender redirects a lone attack to the next player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassOn {
    /// Add matching-rank cards to the field.
    Play(CardCombo),
    /// Show a matching-rank trump without playing it.
    Show(Card),
}

/// A defense decision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefensePlay {
    /// Cover one or more unresolved attacks, in field order.
    Defend(SmallVec<[Cover; 6]>),
    /// Give up: the trick ends in surrender.
    Take,
    /// Do nothing this iteration.
    Hold,
    /// Redirect the attack.
    PassOn(PassOn),
}

impl DefensePlay {
    /// Cover the given (attack, defense) pairs.
    #[must_use]
    pub fn defend(pairs: &[(Card, Card)]) -> Self {
        Self::Defend(pairs.iter().map(|&(a, d)| Cover::new(a, d)).collect())
    }
}

/// A complete decision submitted to the turn controller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Attack(AttackPlay),
    Defend(DefensePlay),
    Pickup(Vec<Card>),
}

impl From<AttackPlay> for Action {
    fn from(play: AttackPlay) -> Self {
        Self::Attack(play)
    }
}

impl From<DefensePlay> for Action {
    fn from(play: DefensePlay) -> Self {
        Self::Defend(play)
    }
}

fn write_cards(f: &mut fmt::Formatter<'_>, cards: &[Card]) -> fmt::Result {
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{card}")?;
    }
    Ok(())
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Attack(AttackPlay::Pass) => write!(f, "pass"),
            Action::Attack(AttackPlay::Cards(cards)) => {
                write!(f, "attack ")?;
                write_cards(f, cards)
            }
            Action::Defend(DefensePlay::Take) => write!(f, "take"),
            Action::Defend(DefensePlay::Hold) => write!(f, "hold"),
            Action::Defend(DefensePlay::Defend(covers)) => {
                write!(f, "defend")?;
                for cover in covers {
                    write!(f, " {}/{}", cover.defense, cover.attack)?;
                }
                Ok(())
            }
            Action::Defend(DefensePlay::PassOn(PassOn::Play(cards))) => {
                write!(f, "pass-on ")?;
                write_cards(f, cards)
            }
            Action::Defend(DefensePlay::PassOn(PassOn::Show(card))) => write!(f, "show {card}"),
            Action::Pickup(cards) => {
                write!(f, "pickup")?;
                if !cards.is_empty() {
                    write!(f, " ")?;
                }
                write_cards(f, cards)
            }
        }
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for replay logs and training data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Trick number when the action was taken (starts at 1).
    pub trick: u32,

    /// Sequence number within the game.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, trick: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            trick,
            sequence,
        }
    }
}
