//! The shared playing field.
//!
//! The field is an ordered list of slots. Each slot holds an attack card,
//! who played it, and whether it has been covered. Slot order is attack
//! order; surrender attribution walks it front to back.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::core::error::{DurakError, Result};
use crate::core::player::PlayerId;

/// Whether an attack has been covered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    Unresolved,
    Defended { card: Card, by: PlayerId },
}

/// One attack on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSlot {
    pub attack: Card,
    /// Seat that played the attack card.
    pub owner: PlayerId,
    pub state: SlotState,
}

impl FieldSlot {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, SlotState::Defended { .. })
    }

    /// The covering card and who played it, if any.
    #[must_use]
    pub fn defense(&self) -> Option<(Card, PlayerId)> {
        match self.state {
            SlotState::Defended { card, by } => Some((card, by)),
            SlotState::Unresolved => None,
        }
    }
}

/// Ordered attack slots for the current trick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    slots: Vec<FieldSlot>,
}

impl Field {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots (attacks) on the field.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    /// Slots still waiting for a cover, in attack order.
    pub fn unresolved(&self) -> impl Iterator<Item = &FieldSlot> {
        self.slots.iter().filter(|s| !s.is_resolved())
    }

    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.unresolved().count()
    }

    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.slots.len() - self.unresolved_count()
    }

    #[must_use]
    pub fn all_resolved(&self) -> bool {
        self.slots.iter().all(FieldSlot::is_resolved)
    }

    /// Total physical cards on the field (attacks plus covers).
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.slots.len() + self.resolved_count()
    }

    /// Every card on the field, attacks and covers.
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.slots
            .iter()
            .flat_map(|s| std::iter::once(s.attack).chain(s.defense().map(|(c, _)| c)))
    }

    /// Bitmask of ranks present on the field (bit = `Rank::index`).
    #[must_use]
    pub fn rank_mask(&self) -> u16 {
        self.cards().fold(0, |mask, c| mask | (1 << c.rank.index()))
    }

    #[must_use]
    pub fn has_rank(&self, rank: Rank) -> bool {
        self.rank_mask() & (1 << rank.index()) != 0
    }

    /// Append a new unresolved attack.
    pub fn push_attack(&mut self, attack: Card, owner: PlayerId) {
        self.slots.push(FieldSlot {
            attack,
            owner,
            state: SlotState::Unresolved,
        });
    }

    /// Cover the unresolved slot holding `attack`.
    pub fn cover(&mut self, attack: Card, defense: Card, by: PlayerId) -> Result<()> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.attack == attack)
            .ok_or_else(|| DurakError::invariant(format!("no attack {attack} on the field")))?;
        if slot.is_resolved() {
            return Err(DurakError::invariant(format!("attack {attack} is already covered")));
        }
        slot.state = SlotState::Defended { card: defense, by };
        Ok(())
    }

    /// Remove every slot, in attack order.
    pub fn take_all(&mut self) -> Vec<FieldSlot> {
        std::mem::take(&mut self.slots)
    }
}
