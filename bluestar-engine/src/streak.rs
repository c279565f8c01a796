//! Streak counters suppressing repeated drops of the same rarity, color, or
//! hero.
//!
//! Every update returns a new `StreakState`; callers must thread the
//! returned value into the next pull, in order, within and across pulls.
//! The per-color and per-hero maps use default-zero lookup semantics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::card::CardCategory;

/// Per-run streak counters. All values are non-negative by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// Consecutive shared-rarity pulls.
    pub streak_shared: u32,
    /// Consecutive unique-rarity pulls.
    pub streak_unique: u32,
    /// Consecutive phase-2 picks per shared color.
    pub streak_per_color: HashMap<CardCategory, u32>,
    /// Consecutive phase-2 picks per unique card id.
    pub streak_per_hero: HashMap<String, u32>,
}

impl StreakState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current color streak, defaulting to zero for unseen colors.
    #[must_use]
    pub fn color_streak(&self, category: CardCategory) -> u32 {
        self.streak_per_color.get(&category).copied().unwrap_or(0)
    }

    /// Current hero streak, defaulting to zero for unseen card ids.
    #[must_use]
    pub fn hero_streak(&self, card_id: &str) -> u32 {
        self.streak_per_hero.get(card_id).copied().unwrap_or(0)
    }

    /// Phase-1 update: the chosen rarity's counter increments, the opposite
    /// counter resets. After N consecutive identical-rarity pulls the
    /// winner's counter equals N and the other's equals 0.
    #[must_use]
    pub fn record_rarity(&self, chosen: CardCategory) -> Self {
        let mut next = self.clone();
        if chosen.is_shared() {
            next.streak_shared += 1;
            next.streak_unique = 0;
        } else {
            next.streak_unique += 1;
            next.streak_shared = 0;
        }
        next
    }

    /// Phase-2 shared update: the chosen color increments, every other color
    /// entry resets to zero. The hero map is untouched.
    #[must_use]
    pub fn record_color_pick(&self, chosen: CardCategory) -> Self {
        let mut next = self.clone();
        let bumped = self.color_streak(chosen) + 1;
        for value in next.streak_per_color.values_mut() {
            *value = 0;
        }
        next.streak_per_color.insert(chosen, bumped);
        next
    }

    /// Phase-2 unique update: the chosen hero increments, every other hero
    /// entry resets to zero. The color map is untouched.
    #[must_use]
    pub fn record_hero_pick(&self, card_id: &str) -> Self {
        let mut next = self.clone();
        let bumped = self.hero_streak(card_id) + 1;
        for value in next.streak_per_hero.values_mut() {
            *value = 0;
        }
        next.streak_per_hero.insert(card_id.to_string(), bumped);
        next
    }
}
