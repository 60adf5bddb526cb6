//! Public card knowledge.
//!
//! Tracks which cards are provably in which hand from public events only:
//! a shown trump, cards returned from the field after a surrender, and the
//! face-up trump indicator once someone draws it. A card stops being known
//! as soon as it is played.

use im::HashSet as ImHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::player::{PlayerId, PlayerMap};

/// Per-player sets of publicly known hand cards.
///
/// Uses `im` sets so snapshots of the game state stay cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKnowledge {
    known: PlayerMap<ImHashSet<Card>>,
}

impl PublicKnowledge {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            known: PlayerMap::new(player_count, |_| ImHashSet::new()),
        }
    }

    /// Mark `card` as publicly held by `player`.
    pub fn reveal(&mut self, player: PlayerId, card: Card) {
        self.known[player].insert(card);
    }

    /// Forget `card` wherever it was known (it left a hand).
    pub fn forget(&mut self, card: Card) {
        for (_, set) in self.known.iter_mut() {
            set.remove(&card);
        }
    }

    #[must_use]
    pub fn is_known(&self, player: PlayerId, card: Card) -> bool {
        self.known[player].contains(&card)
    }

    /// Known cards of `player`, sorted.
    #[must_use]
    pub fn known(&self, player: PlayerId) -> Vec<Card> {
        let mut cards: Vec<Card> = self.known[player].iter().copied().collect();
        cards.sort();
        cards
    }
}
