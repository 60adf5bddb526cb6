//! Game state: hands, field, discard, stock, and the seat rotation.
//!
//! `GameState` owns every card and performs every mutation. Mutators check
//! what they can about their inputs (cards in hand, beat relation) but do not
//! enumerate the legal set; that is the job of `rules`, and the turn
//! controller validates against it before calling in here.
//!
//! ## Card locations
//!
//! Every card is in exactly one of: a hand, a field slot (attack or cover),
//! the discard pile, the face-down stock, or the trump indicator.
//! `check_invariants` verifies this along with the seat relations.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::action::{Action, ActionRecord, Cover, PassOn};
use super::config::GameConfig;
use super::error::{DurakError, Result};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{Card, Deck, Suit};
use crate::zones::{Field, FieldSlot, PublicKnowledge};

/// How a trick ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrickOutcome {
    /// Every attack was covered; field cards went to the discard pile.
    Beat,
    /// At least one attack stayed unresolved.
    Surrender,
}

/// Final result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The last player left holding cards.
    Durak(PlayerId),
    /// Everyone went out on the same resolution.
    Draw,
}

impl GameOutcome {
    #[must_use]
    pub fn durak(self) -> Option<PlayerId> {
        match self {
            GameOutcome::Durak(p) => Some(p),
            GameOutcome::Draw => None,
        }
    }
}

/// Per-trick bookkeeping that move generation depends on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickFlags {
    /// Trick counter, starting at 1 once the first trick begins.
    pub number: u32,
    /// Whether the current defender has made any response yet.
    pub defender_responded: bool,
    /// Trumps shown for a pass-on during this trick.
    pub shown: SmallVec<[Card; 4]>,
    /// The defender answered with `Take` and must pick up the whole field.
    #[serde(default)]
    pub took: bool,
}

/// A fixed starting position, for tests and replays of hand-built setups.
#[derive(Clone, Debug, Default)]
pub struct Deal {
    /// Hands by seat.
    pub hands: Vec<Vec<Card>>,
    /// Face-down stock; the last card is drawn first.
    pub stock: Vec<Card>,
    /// Face-up trump indicator still to be drawn, if any.
    pub indicator: Option<Card>,
    pub trump: Option<Suit>,
    pub discard: Vec<Card>,
    pub primary_attacker: PlayerId,
}

/// Full game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,
    deck: Deck,
    trump: Suit,
    hands: PlayerMap<Vec<Card>>,
    field: Field,
    discard: Vec<Card>,
    out: PlayerMap<bool>,
    outcome: Option<GameOutcome>,
    primary_attacker: PlayerId,
    defender: PlayerId,
    knowledge: PublicKnowledge,
    trick: TrickFlags,
    last_event: Option<TrickOutcome>,
    history: Vector<ActionRecord>,
    total_cards: usize,
}

impl GameState {
    /// Shuffle, pick the trump, deal, and seat the first attacker.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let rng = GameRng::new(seed);

        let mut deck = Deck::shuffled(&config.ranks, &mut rng.for_context("deck"));
        let trump = deck
            .choose_trump()
            .ok_or_else(|| DurakError::Config("deck is empty".into()))?
            .suit;
        let primary = PlayerId::new(
            rng.for_context("seat").gen_range_usize(0..config.player_count) as u8,
        );

        let n = config.player_count;
        let total_cards = config.deck_size();
        let mut state = Self {
            deck,
            trump,
            hands: PlayerMap::with_default(n),
            field: Field::new(),
            discard: Vec::new(),
            out: PlayerMap::with_value(n, false),
            outcome: None,
            primary_attacker: primary,
            defender: primary.offset(1, n),
            knowledge: PublicKnowledge::new(n),
            trick: TrickFlags::default(),
            last_event: None,
            history: Vector::new(),
            total_cards,
            config,
        };

        for _ in 0..state.config.hand_size {
            for player in PlayerId::all(n) {
                state.draw_one(player);
            }
        }
        debug!(seed, trump = %trump, primary = %primary, "dealt new game");
        Ok(state)
    }

    /// Build a state from a hand-made position.
    ///
    /// The total card count is whatever the deal contains; it must not
    /// repeat a card or use ranks outside the configured deck.
    pub fn from_deal(config: GameConfig, deal: Deal) -> Result<Self> {
        config.validate()?;
        let n = config.player_count;
        if deal.hands.len() != n {
            return Err(DurakError::Config(format!(
                "deal has {} hands for {} players",
                deal.hands.len(),
                n
            )));
        }
        if deal.primary_attacker.index() >= n {
            return Err(DurakError::Config(format!("no seat {}", deal.primary_attacker)));
        }
        let trump = deal
            .trump
            .or(deal.indicator.map(|c| c.suit))
            .ok_or_else(|| DurakError::Config("deal needs a trump suit".into()))?;
        if let Some(indicator) = deal.indicator {
            if indicator.suit != trump {
                return Err(DurakError::Config("indicator suit differs from trump".into()));
            }
        }

        let mut hands = PlayerMap::with_default(n);
        for (player, hand) in PlayerId::all(n).zip(deal.hands) {
            hands[player] = hand;
        }
        let all_cards = hands
            .iter()
            .flat_map(|(_, h)| h.iter().copied())
            .chain(deal.stock.iter().copied())
            .chain(deal.indicator)
            .chain(deal.discard.iter().copied());
        let mut total_cards = 0;
        for card in all_cards {
            if !config.ranks.contains(&card.rank) {
                return Err(DurakError::Config(format!("{card} is not in the configured deck")));
            }
            total_cards += 1;
        }

        let mut out = PlayerMap::with_value(n, false);
        let has_stock = !deal.stock.is_empty() || deal.indicator.is_some();
        for (player, hand) in hands.iter() {
            out[player] = hand.is_empty() && !has_stock;
        }

        let mut state = Self {
            deck: Deck::arranged(deal.stock, deal.indicator),
            trump,
            hands,
            field: Field::new(),
            discard: deal.discard,
            out,
            outcome: None,
            primary_attacker: deal.primary_attacker,
            defender: deal.primary_attacker,
            knowledge: PublicKnowledge::new(n),
            trick: TrickFlags::default(),
            last_event: None,
            history: Vector::new(),
            total_cards,
            config,
        };
        if state.out[state.primary_attacker] {
            state.primary_attacker = state
                .next_active(state.primary_attacker)
                .unwrap_or(state.primary_attacker);
        }
        state.defender = state
            .next_active(state.primary_attacker)
            .unwrap_or(state.primary_attacker);
        state.check_invariants()?;
        Ok(state)
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    #[must_use]
    pub fn trump(&self) -> Suit {
        self.trump
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Card] {
        &self.hands[player]
    }

    #[must_use]
    pub fn hands(&self) -> &PlayerMap<Vec<Card>> {
        &self.hands
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    #[must_use]
    pub fn is_out(&self, player: PlayerId) -> bool {
        self.out[player]
    }

    /// Seats that have left the rotation.
    #[must_use]
    pub fn out_set(&self) -> Vec<PlayerId> {
        self.out.iter().filter(|(_, &o)| o).map(|(p, _)| p).collect()
    }

    /// Seats still in the rotation.
    #[must_use]
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.out.iter().filter(|(_, &o)| !o).map(|(p, _)| p).collect()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn durak(&self) -> Option<PlayerId> {
        self.outcome.and_then(GameOutcome::durak)
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn primary_attacker(&self) -> PlayerId {
        self.primary_attacker
    }

    #[must_use]
    pub fn defender(&self) -> PlayerId {
        self.defender
    }

    #[must_use]
    pub fn knowledge(&self) -> &PublicKnowledge {
        &self.knowledge
    }

    #[must_use]
    pub fn trick(&self) -> &TrickFlags {
        &self.trick
    }

    /// Outcome of the most recent resolution, until the next trick opens.
    #[must_use]
    pub fn last_event(&self) -> Option<TrickOutcome> {
        self.last_event
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Cards in play for this game; constant for its lifetime.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.total_cards
    }

    /// Attack cap: smaller on the very first trick (nothing discarded yet).
    #[must_use]
    pub fn discard_cap(&self) -> usize {
        if self.discard.is_empty() {
            self.config.first_trick_cap
        } else {
            self.config.trick_cap
        }
    }

    /// Most field slots the current trick may hold right now.
    #[must_use]
    pub fn attack_limit(&self) -> usize {
        self.discard_cap().min(self.hands[self.defender].len())
    }

    // === Rotation ===

    /// First seat clockwise after `from` that is still in the rotation.
    ///
    /// Returns `from` itself when it is the only active seat, and `None`
    /// when no seat is active.
    #[must_use]
    pub fn next_active(&self, from: PlayerId) -> Option<PlayerId> {
        let n = self.player_count();
        (1..=n)
            .map(|k| from.offset(k, n))
            .find(|&p| !self.out[p])
    }

    /// Non-defending active seats in attack order: the attacker of record
    /// first, then clockwise.
    #[must_use]
    pub fn attack_order(&self) -> Vec<PlayerId> {
        let n = self.player_count();
        (0..n)
            .map(|k| self.primary_attacker.offset(k, n))
            .filter(|&p| !self.out[p] && p != self.defender)
            .collect()
    }

    /// Refill order: attacker of record, other active seats clockwise,
    /// defender last.
    #[must_use]
    pub fn draw_order(&self) -> Vec<PlayerId> {
        let mut order = self.attack_order();
        if !self.out[self.defender] {
            order.push(self.defender);
        }
        order
    }

    // === Trick lifecycle ===

    /// Open a new trick.
    ///
    /// Returns `false` (and ends the game) when the defender would be the
    /// attacker itself, i.e. one active seat is left.
    pub fn start_trick(&mut self) -> Result<bool> {
        if self.is_over() {
            return Err(DurakError::GameOver);
        }
        if !self.field.is_empty() {
            return Err(DurakError::invariant("trick opened on a non-empty field"));
        }
        self.trick.number += 1;
        self.trick.defender_responded = false;
        self.trick.shown.clear();
        self.trick.took = false;

        match self.next_active(self.primary_attacker) {
            Some(defender) if defender != self.primary_attacker => {
                self.defender = defender;
                debug!(
                    trick = self.trick.number,
                    attacker = %self.primary_attacker,
                    defender = %defender,
                    "trick started"
                );
                Ok(true)
            }
            _ => {
                debug!(durak = %self.primary_attacker, "single active seat at trick start");
                self.outcome = Some(GameOutcome::Durak(self.primary_attacker));
                Ok(false)
            }
        }
    }

    /// Append an applied action to the history.
    pub fn record(&mut self, player: PlayerId, action: Action) {
        let sequence = self.history.len() as u32;
        self.history
            .push_back(ActionRecord::new(player, action, self.trick.number, sequence));
    }

    // === Mutators ===

    fn take_from_hand(&mut self, player: PlayerId, card: Card) -> Result<()> {
        let hand = &mut self.hands[player];
        let pos = hand
            .iter()
            .position(|&c| c == card)
            .ok_or_else(|| DurakError::illegal(player, format!("{card} is not in hand")))?;
        hand.remove(pos);
        self.knowledge.forget(card);
        Ok(())
    }

    fn draw_one(&mut self, player: PlayerId) -> Option<Card> {
        let drawing_indicator = self.deck.stock_len() == 0 && self.deck.indicator().is_some();
        let card = self.deck.pop()?;
        if drawing_indicator {
            self.knowledge.reveal(player, card);
        }
        self.hands[player].push(card);
        Some(card)
    }

    /// Move `cards` from `player`'s hand onto the field as new attacks.
    pub fn attack(&mut self, player: PlayerId, cards: &[Card]) -> Result<()> {
        if cards.is_empty() {
            return Err(DurakError::illegal(player, "attack with no cards"));
        }
        if player == self.defender {
            return Err(DurakError::illegal(player, "the defender cannot attack"));
        }
        for &card in cards {
            self.take_from_hand(player, card)?;
            self.field.push_attack(card, player);
        }
        self.last_event = None;
        Ok(())
    }

    /// Lay the defender's cards on unresolved attacks.
    pub fn defend(&mut self, covers: &[Cover]) -> Result<()> {
        let defender = self.defender;
        for cover in covers {
            if !cover.defense.beats(cover.attack, self.trump) {
                return Err(DurakError::illegal(
                    defender,
                    format!("{} does not beat {}", cover.defense, cover.attack),
                ));
            }
            self.take_from_hand(defender, cover.defense)?;
            self.field.cover(cover.attack, cover.defense, defender)?;
        }
        self.trick.defender_responded = true;
        Ok(())
    }

    /// Record a defender response that changes no cards (hold).
    pub fn mark_responded(&mut self) {
        self.trick.defender_responded = true;
    }

    /// Record a `Take`: the surrender that follows keeps every eligible attack.
    pub fn mark_taken(&mut self) {
        self.trick.defender_responded = true;
        self.trick.took = true;
    }

    /// Redirect the trick: the passer becomes attacker of record and the
    /// next active seat defends.
    pub fn pass_on(&mut self, play: &PassOn) -> Result<()> {
        let passer = self.defender;
        match play {
            PassOn::Play(cards) => {
                for &card in cards {
                    self.take_from_hand(passer, card)?;
                    self.field.push_attack(card, passer);
                }
            }
            PassOn::Show(card) => {
                if !self.hands[passer].contains(card) {
                    return Err(DurakError::illegal(passer, format!("{card} is not in hand")));
                }
                self.knowledge.reveal(passer, *card);
                self.trick.shown.push(*card);
            }
        }
        let next = self
            .next_active(passer)
            .filter(|&p| p != passer)
            .ok_or_else(|| DurakError::invariant("pass-on with no other active seat"))?;
        self.primary_attacker = passer;
        self.defender = next;
        self.trick.defender_responded = false;
        Ok(())
    }

    /// Move every field card to the discard pile.
    ///
    /// Returns the number of cards discarded.
    pub fn beat(&mut self) -> Result<usize> {
        if !self.field.all_resolved() {
            return Err(DurakError::invariant("beat with unresolved attacks"));
        }
        let before = self.discard.len();
        for slot in self.field.take_all() {
            self.discard.push(slot.attack);
            if let Some((card, _)) = slot.defense() {
                self.discard.push(card);
            }
        }
        Ok(self.discard.len() - before)
    }

    /// Return field cards to hands after a failed defense.
    ///
    /// The defender keeps `pickup` (chosen unresolved attacks) plus every
    /// field card it played itself; all other cards go back to whoever
    /// played them.
    pub fn surrender(&mut self, pickup: &[Card]) -> Result<()> {
        let defender = self.defender;
        for card in pickup {
            let eligible = self
                .field
                .unresolved()
                .any(|s| s.attack == *card && s.owner != defender);
            if !eligible {
                return Err(DurakError::illegal(
                    defender,
                    format!("{card} is not an unresolved attack to pick up"),
                ));
            }
        }

        let slots: Vec<FieldSlot> = self.field.take_all();
        for slot in slots {
            let receiver = if pickup.contains(&slot.attack) {
                defender
            } else {
                slot.owner
            };
            self.hands[receiver].push(slot.attack);
            self.knowledge.reveal(receiver, slot.attack);
            if let Some((card, by)) = slot.defense() {
                self.hands[by].push(card);
                self.knowledge.reveal(by, card);
            }
        }
        Ok(())
    }

    /// Draw every active seat back up to the hand size, in draw order.
    pub fn refill(&mut self) {
        let hand_size = self.config.hand_size;
        for player in self.draw_order() {
            while self.hands[player].len() < hand_size {
                if self.draw_one(player).is_none() {
                    return;
                }
            }
        }
    }

    /// Remove seats with empty hands once the stock is gone.
    ///
    /// Returns the newly eliminated seats. Decides the game when at most
    /// one active seat remains.
    pub fn out_check(&mut self) -> Vec<PlayerId> {
        if self.deck.has_cards() {
            return Vec::new();
        }
        let newly_out: Vec<PlayerId> = self
            .hands
            .iter()
            .filter(|(p, hand)| hand.is_empty() && !self.out[*p])
            .map(|(p, _)| p)
            .collect();
        for &player in &newly_out {
            self.out[player] = true;
            debug!(player = %player, "player is out");
        }

        let active = self.active_players();
        match active.as_slice() {
            [] => {
                debug!("everyone went out together; draw");
                self.outcome = Some(GameOutcome::Draw);
            }
            [durak] => {
                debug!(durak = %durak, "durak determined");
                self.outcome = Some(GameOutcome::Durak(*durak));
            }
            _ => {}
        }
        newly_out
    }

    /// Refill, eliminate, and rotate the attacker after a resolution.
    pub fn finish_trick(&mut self, outcome: TrickOutcome) -> Vec<PlayerId> {
        self.refill();
        let eliminated = self.out_check();
        self.last_event = Some(outcome);
        if self.is_over() {
            return eliminated;
        }
        let anchor = match outcome {
            TrickOutcome::Beat => self.primary_attacker,
            TrickOutcome::Surrender => self.defender,
        };
        if let Some(next) = self.next_active(anchor) {
            self.primary_attacker = next;
        }
        if let Some(defender) = self.next_active(self.primary_attacker) {
            self.defender = defender;
        }
        eliminated
    }

    // === Invariants ===

    /// Verify card conservation, unique locations, seat relations, and covers.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen: FxHashSet<Card> = FxHashSet::default();
        let mut count = 0usize;
        let locations = self
            .hands
            .iter()
            .flat_map(|(_, h)| h.iter().copied())
            .chain(self.field.cards())
            .chain(self.discard.iter().copied())
            .chain(self.deck.stock().iter().copied())
            .chain(self.deck.indicator());
        for card in locations {
            count += 1;
            if !seen.insert(card) {
                return Err(DurakError::invariant(format!("{card} is in two places")));
            }
        }
        if count != self.total_cards {
            return Err(DurakError::invariant(format!(
                "card count {count} differs from {}",
                self.total_cards
            )));
        }

        for slot in self.field.slots() {
            if let Some((card, _)) = slot.defense() {
                if !card.beats(slot.attack, self.trump) {
                    return Err(DurakError::invariant(format!(
                        "{card} covers {} without beating it",
                        slot.attack
                    )));
                }
            }
        }

        if !self.is_over() {
            if self.active_players().is_empty() {
                return Err(DurakError::invariant("no active seats in a live game"));
            }
            if self.trick.number > 0 {
                if self.next_active(self.primary_attacker) != Some(self.defender) {
                    return Err(DurakError::invariant(format!(
                        "{} is not the next active seat after {}",
                        self.defender, self.primary_attacker
                    )));
                }
                if self.defender == self.primary_attacker {
                    return Err(DurakError::invariant("defender equals attacker"));
                }
            }
        }
        Ok(())
    }
}
