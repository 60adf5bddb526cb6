//! Shared helpers for integration tests.

#![allow(dead_code)]

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use rust_durak::{Card, Deal, GameConfig, GameState, PlayerId, Rank, Suit, TurnController};

static TRACING: OnceCell<()> = OnceCell::new();

/// Install a test-writer subscriber once per test binary.
///
/// The filter comes from `TEST_LOG`, then `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn c(s: &str) -> Card {
    s.parse().unwrap()
}

pub fn cards(list: &str) -> Vec<Card> {
    list.split_whitespace().map(c).collect()
}

pub fn p(i: u8) -> PlayerId {
    PlayerId::new(i)
}

/// Ranks six through nine: a 16-card deck.
pub fn short_ranks() -> Vec<Rank> {
    vec![Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine]
}

pub fn short_config(players: usize) -> GameConfig {
    GameConfig::new().with_players(players).with_ranks(&short_ranks())
}

/// A position with no stock, diamonds trump, and seat 0 attacking.
pub fn position(hands: &[&str], discard: &str) -> GameState {
    let deal = Deal {
        hands: hands.iter().map(|h| cards(h)).collect(),
        trump: Some(Suit::Diamonds),
        discard: cards(discard),
        primary_attacker: p(0),
        ..Deal::default()
    };
    GameState::from_deal(GameConfig::new().with_players(hands.len()), deal).unwrap()
}

pub fn controller(hands: &[&str], discard: &str) -> TurnController {
    TurnController::from_state(position(hands, discard)).unwrap()
}

pub fn sorted(mut hand: Vec<Card>) -> Vec<Card> {
    hand.sort();
    hand
}
