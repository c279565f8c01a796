//! Mutable per-run game state owned by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardCategory};
use crate::config::SimConfig;
use crate::economy::CoinLedger;
use crate::numbers;
use crate::progression::accumulate_unlock_schedule;
use crate::streak::StreakState;

/// Everything one simulation run mutates: the collection, the coin ledger,
/// bluestar total, and the threaded streak counters. One instance per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub day: u32,
    pub cards: Vec<Card>,
    pub total_bluestars: u64,
    pub streak: StreakState,
    pub ledger: CoinLedger,
}

impl GameState {
    /// Initial state: the configured gold and blue counts plus whatever
    /// unique cards day 1's unlock schedule grants, everything at level 1
    /// with zero duplicates.
    #[must_use]
    pub fn initial(config: &SimConfig) -> Self {
        let mut cards = Vec::new();
        for i in 1..=config.num_gold_cards {
            cards.push(Card::new(
                format!("gold_{i}"),
                format!("Gold Shared {i}"),
                CardCategory::GoldShared,
            ));
        }
        for i in 1..=config.num_blue_cards {
            cards.push(Card::new(
                format!("blue_{i}"),
                format!("Blue Shared {i}"),
                CardCategory::BlueShared,
            ));
        }
        let mut state = Self {
            day: 0,
            cards,
            total_bluestars: config.initial_bluestars,
            streak: StreakState::new(),
            ledger: CoinLedger::new(config.initial_coins),
        };
        let initial_unique = accumulate_unlock_schedule(1, &config.unique_unlock_schedule);
        state.unlock_heroes_to(initial_unique);
        state
    }

    /// Count of unique cards currently unlocked.
    #[must_use]
    pub fn unlocked_unique_count(&self) -> u32 {
        let count = self
            .cards
            .iter()
            .filter(|card| card.category == CardCategory::Unique)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Append fresh level-1 heroes until `target` uniques are unlocked.
    /// Never removes cards; a shrinking schedule leaves the roster alone.
    pub fn unlock_heroes_to(&mut self, target: u32) {
        let current = self.unlocked_unique_count();
        for i in (current + 1)..=target {
            self.cards.push(Card::new(
                format!("hero_{i}"),
                format!("Hero {i}"),
                CardCategory::Unique,
            ));
        }
    }

    /// Average raw level across one category, 0.0 when empty.
    #[must_use]
    pub fn category_avg_level(&self, category: CardCategory) -> f64 {
        let mut total = 0u64;
        let mut count = 0usize;
        for card in self.cards.iter().filter(|c| c.category == category) {
            total += u64::from(card.level);
            count += 1;
        }
        if count == 0 {
            0.0
        } else {
            numbers::u64_to_f64(total) / numbers::usize_to_f64(count)
        }
    }
}
