//! Two-phase card drop algorithm.
//!
//! Phase 1 decides rarity at the shared/unique granularity with two
//! corrective feedback loops: an exponential progression-gap adjustment
//! (whichever side lags gets boosted) and exponential streak decay
//! (consecutive wins suppress the winner). Phase 2 picks a concrete card
//! inside the chosen rarity, again favoring low levels and cold streaks.
//! Gold/blue disambiguation happens only in phase 2; phase 1 never looks
//! below the shared/unique granularity.

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardCategory};
use crate::config::SimConfig;
use crate::constants::{
    COLOR_STREAK_DECAY, GAP_BASE, HERO_STREAK_DECAY, STREAK_DECAY_SHARED, STREAK_DECAY_UNIQUE,
    UNIQUE_POOL_SIZE,
};
use crate::economy::compute_coin_income;
use crate::numbers;
use crate::sampler::RandomnessSource;
use crate::streak::StreakState;

/// Tuning constants for both phases, passed explicitly so tests can override
/// them instead of reaching for module globals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropTuning {
    /// Base of the progression-gap exponent; must be > 1.
    #[serde(default = "default_gap_base")]
    pub gap_base: f64,
    /// Per-consecutive-pull decay applied to the shared rarity weight.
    #[serde(default = "default_decay_shared")]
    pub streak_decay_shared: f64,
    /// Decay for the unique rarity weight; strictly more aggressive than the
    /// shared decay to keep uniques scarce.
    #[serde(default = "default_decay_unique")]
    pub streak_decay_unique: f64,
    /// Phase-2 decay for the per-color streak.
    #[serde(default = "default_decay_shared")]
    pub color_streak_decay: f64,
    /// Phase-2 decay for the per-hero streak.
    #[serde(default = "default_decay_unique")]
    pub hero_streak_decay: f64,
}

const fn default_gap_base() -> f64 {
    GAP_BASE
}

const fn default_decay_shared() -> f64 {
    STREAK_DECAY_SHARED
}

const fn default_decay_unique() -> f64 {
    STREAK_DECAY_UNIQUE
}

impl Default for DropTuning {
    fn default() -> Self {
        Self {
            gap_base: GAP_BASE,
            streak_decay_shared: STREAK_DECAY_SHARED,
            streak_decay_unique: STREAK_DECAY_UNIQUE,
            color_streak_decay: COLOR_STREAK_DECAY,
            hero_streak_decay: HERO_STREAK_DECAY,
        }
    }
}

/// Normalized probability of a shared drop for the current collection and
/// streak state. Exposed separately so tests can assert on the weights
/// without consuming sampler draws.
#[must_use]
pub fn shared_probability(cards: &[Card], config: &SimConfig, streak: &StreakState) -> f64 {
    use crate::progression::{avg_shared_progression, compute_category_progression};

    let tuning = &config.tuning;
    let s_shared = avg_shared_progression(cards);
    let s_unique = compute_category_progression(cards, CardCategory::Unique);

    // Positive gap means uniques are ahead; boost shared to catch up.
    let gap = s_unique - s_shared;
    let w_shared = config.base_shared_rate * tuning.gap_base.powf(gap);
    let w_unique = config.base_unique_rate * tuning.gap_base.powf(-gap);

    let final_shared =
        w_shared * tuning.streak_decay_shared.powf(f64::from(streak.streak_shared));
    let final_unique =
        w_unique * tuning.streak_decay_unique.powf(f64::from(streak.streak_unique));

    let total = final_shared + final_unique;
    if total > 0.0 {
        final_shared / total
    } else {
        config.base_shared_rate
    }
}

/// Phase 1: decide whether this pull drops a shared or a unique card.
/// Returns `GoldShared` as the shared marker; gold vs blue is resolved in
/// phase 2.
#[must_use]
pub fn decide_rarity(
    cards: &[Card],
    config: &SimConfig,
    streak: &StreakState,
    sampler: &mut dyn RandomnessSource,
) -> CardCategory {
    let prob_shared = shared_probability(cards, config, streak);
    if sampler.pick_shared(prob_shared) {
        CardCategory::GoldShared
    } else {
        CardCategory::Unique
    }
}

/// Phase-2 candidate pool as indices into `cards`.
///
/// Shared pulls draw from the union of gold and blue cards; unique pulls
/// draw from the lowest-level unlocked heroes (ties keep input order).
#[must_use]
pub fn candidate_pool(cards: &[Card], rarity: CardCategory) -> Vec<usize> {
    if rarity.is_shared() {
        cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.category.is_shared())
            .map(|(index, _)| index)
            .collect()
    } else {
        let mut pool: Vec<usize> = cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.category == CardCategory::Unique)
            .map(|(index, _)| index)
            .collect();
        pool.sort_by_key(|&index| cards[index].level);
        pool.truncate(UNIQUE_POOL_SIZE);
        pool
    }
}

fn candidate_weight(card: &Card, streak: &StreakState, tuning: &DropTuning) -> f64 {
    let (decay, streak_count) = if card.category.is_shared() {
        (tuning.color_streak_decay, streak.color_streak(card.category))
    } else {
        (tuning.hero_streak_decay, streak.hero_streak(&card.id))
    };
    1.0 / f64::from(card.level + 1) * decay.powf(f64::from(streak_count))
}

/// Phase 2: pick the concrete card within the decided rarity. Returns the
/// index of the winner, or `None` when the collection is empty.
#[must_use]
pub fn select_card(
    cards: &[Card],
    rarity: CardCategory,
    streak: &StreakState,
    tuning: &DropTuning,
    sampler: &mut dyn RandomnessSource,
) -> Option<usize> {
    let mut pool = candidate_pool(cards, rarity);
    if pool.is_empty() {
        // A rarity can win phase 1 before any of its cards exist (e.g. no
        // hero unlocked yet); fall back to the other pool.
        let fallback = if rarity.is_shared() {
            CardCategory::Unique
        } else {
            CardCategory::GoldShared
        };
        pool = candidate_pool(cards, fallback);
    }
    if pool.is_empty() {
        return None;
    }
    let weights: Vec<f64> = pool
        .iter()
        .map(|&index| candidate_weight(&cards[index], streak, tuning))
        .collect();
    Some(pool[sampler.pick_weighted(&weights)])
}

/// A fully resolved pull: which card dropped, what it granted, and the
/// streak state the caller must thread into the next pull.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPull {
    pub card_index: usize,
    pub duplicates: u32,
    pub coins: u64,
    pub streak: StreakState,
}

/// Run both phases for one pull and compute its rewards. Pure with respect
/// to `cards`; the orchestrator applies duplicates and coins afterwards.
#[must_use]
pub fn perform_card_pull(
    cards: &[Card],
    config: &SimConfig,
    streak: &StreakState,
    sampler: &mut dyn RandomnessSource,
) -> Option<ResolvedPull> {
    let rarity = decide_rarity(cards, config, streak, sampler);
    let after_rarity = streak.record_rarity(rarity);

    let card_index = select_card(cards, rarity, &after_rarity, &config.tuning, sampler)?;
    let card = &cards[card_index];
    let after_selection = if card.category.is_shared() {
        after_rarity.record_color_pick(card.category)
    } else {
        after_rarity.record_hero_pick(&card.id)
    };

    let duplicates = duplicates_for_pull(card, config, sampler);
    let coins = config
        .coin_per_duplicate
        .get(&card.category)
        .map_or(0, |table| {
            compute_coin_income(card, duplicates, table, config.max_level_for(card.category))
        });

    Some(ResolvedPull {
        card_index,
        duplicates,
        coins,
        streak: after_selection,
    })
}

/// Duplicates granted by one pull of `card`: the level's base duplicate cost
/// scaled by a percentile from the configured window. Maxed cards always
/// receive zero.
fn duplicates_for_pull(
    card: &Card,
    config: &SimConfig,
    sampler: &mut dyn RandomnessSource,
) -> u32 {
    if card.is_maxed(config.max_level_for(card.category)) {
        return 0;
    }
    let index = (card.level - 1) as usize;
    let base_cost = config
        .upgrade_tables
        .get(&card.category)
        .and_then(|table| table.duplicate_costs.get(index))
        .copied()
        .unwrap_or(0);
    let pct = config.duplicate_ranges.get(&card.category).map_or(0.0, |range| {
        let min = range.min_pcts.get(index).copied().unwrap_or(0.0);
        let max = range.max_pcts.get(index).copied().unwrap_or(min);
        sampler.duplicate_pct(min, max)
    });
    numbers::round_half_even_u32(f64::from(base_cost) * pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{Deterministic, SeededSampler};
    use crate::testkit::{card_at, minimal_config, rarity_only_config};

    fn balanced_cards() -> Vec<Card> {
        vec![
            card_at("g1", CardCategory::GoldShared, 50),
            card_at("g2", CardCategory::GoldShared, 50),
            card_at("b1", CardCategory::BlueShared, 50),
            card_at("b2", CardCategory::BlueShared, 50),
            card_at("u1", CardCategory::Unique, 5),
            card_at("u2", CardCategory::Unique, 5),
        ]
    }

    fn shared_ratio(cards: &[Card], streak: &StreakState, rolls: u32) -> f64 {
        let config = rarity_only_config();
        let mut sampler = SeededSampler::from_stream(42, b"drops");
        let mut shared = 0u32;
        for _ in 0..rolls {
            if decide_rarity(cards, &config, streak, &mut sampler).is_shared() {
                shared += 1;
            }
        }
        f64::from(shared) / f64::from(rolls)
    }

    #[test]
    fn balanced_state_tracks_base_rates() {
        let ratio = shared_ratio(&balanced_cards(), &StreakState::new(), 10_000);
        assert!((0.67..=0.73).contains(&ratio), "shared ratio {ratio}");
    }

    #[test]
    fn positive_gap_boosts_shared() {
        // Uniques far ahead of shared progression.
        let cards = vec![
            card_at("g1", CardCategory::GoldShared, 10),
            card_at("b1", CardCategory::BlueShared, 30),
            card_at("u1", CardCategory::Unique, 8),
            card_at("u2", CardCategory::Unique, 8),
        ];
        let ratio = shared_ratio(&cards, &StreakState::new(), 10_000);
        assert!(ratio > 0.75, "expected catch-up boost, got {ratio}");
    }

    #[test]
    fn negative_gap_boosts_unique() {
        let cards = vec![
            card_at("g1", CardCategory::GoldShared, 80),
            card_at("b1", CardCategory::BlueShared, 80),
            card_at("u1", CardCategory::Unique, 2),
            card_at("u2", CardCategory::Unique, 2),
        ];
        let ratio = shared_ratio(&cards, &StreakState::new(), 10_000);
        assert!(1.0 - ratio > 0.35, "expected unique boost, got {ratio}");
    }

    #[test]
    fn shared_streak_suppresses_shared() {
        let streak = StreakState {
            streak_shared: 3,
            ..StreakState::new()
        };
        let ratio = shared_ratio(&balanced_cards(), &streak, 10_000);
        assert!(ratio < 0.40, "expected streak penalty, got {ratio}");
    }

    #[test]
    fn unique_streak_suppresses_unique_harder() {
        let streak = StreakState {
            streak_unique: 3,
            ..StreakState::new()
        };
        let ratio = shared_ratio(&balanced_cards(), &streak, 10_000);
        assert!(1.0 - ratio < 0.05, "expected strong penalty, got {ratio}");
    }

    #[test]
    fn deterministic_mode_picks_majority() {
        let config = rarity_only_config();
        let cards = balanced_cards();
        for _ in 0..100 {
            let rarity = decide_rarity(&cards, &config, &StreakState::new(), &mut Deterministic);
            assert_eq!(rarity, CardCategory::GoldShared);
        }
    }

    #[test]
    fn empty_collection_falls_back_to_base_rates() {
        let ratio = shared_ratio(&[], &StreakState::new(), 10_000);
        assert!((0.67..=0.73).contains(&ratio), "shared ratio {ratio}");
    }

    #[test]
    fn unique_pool_is_ten_lowest_levels_stable() {
        let mut cards: Vec<Card> = (1..=12)
            .map(|i| card_at(&format!("hero_{i}"), CardCategory::Unique, 5))
            .collect();
        cards[3].level = 2;
        cards[9].level = 9;
        cards[11].level = 9;
        let pool = candidate_pool(&cards, CardCategory::Unique);
        assert_eq!(pool.len(), 10);
        // Lowest level first, ties in input order, the two level-9s cut.
        assert_eq!(pool[0], 3);
        assert!(!pool.contains(&9));
        assert!(!pool.contains(&11));
    }

    #[test]
    fn deterministic_selection_prefers_low_level_then_first() {
        let cards = vec![
            card_at("g1", CardCategory::GoldShared, 4),
            card_at("b1", CardCategory::BlueShared, 2),
            card_at("b2", CardCategory::BlueShared, 2),
        ];
        let tuning = DropTuning::default();
        let winner = select_card(
            &cards,
            CardCategory::GoldShared,
            &StreakState::new(),
            &tuning,
            &mut Deterministic,
        );
        assert_eq!(winner, Some(1));
    }

    #[test]
    fn hot_streak_hands_selection_to_cold_candidate() {
        let cards = vec![
            card_at("hero_1", CardCategory::Unique, 1),
            card_at("hero_2", CardCategory::Unique, 2),
        ];
        let tuning = DropTuning::default();
        let streak = StreakState::new()
            .record_hero_pick("hero_1")
            .record_hero_pick("hero_1");
        // 1/2 x 0.3^2 for hero_1 loses against 1/3 for hero_2.
        let winner = select_card(
            &cards,
            CardCategory::Unique,
            &streak,
            &tuning,
            &mut Deterministic,
        );
        assert_eq!(winner, Some(1));
    }

    #[test]
    fn unique_rarity_without_heroes_falls_back_to_shared() {
        let cards = vec![card_at("g1", CardCategory::GoldShared, 1)];
        let tuning = DropTuning::default();
        let winner = select_card(
            &cards,
            CardCategory::Unique,
            &StreakState::new(),
            &tuning,
            &mut Deterministic,
        );
        assert_eq!(winner, Some(0));
    }

    #[test]
    fn pull_grants_midpoint_duplicates_and_coins() {
        let config = minimal_config();
        let cards = vec![card_at("g1", CardCategory::GoldShared, 1)];
        let pull = perform_card_pull(&cards, &config, &StreakState::new(), &mut Deterministic)
            .expect("non-empty collection");
        // Level-1 base cost 2 x midpoint 1.0 = 2 dupes, 5 coins each.
        assert_eq!(pull.card_index, 0);
        assert_eq!(pull.duplicates, 2);
        assert_eq!(pull.coins, 10);
        assert_eq!(pull.streak.streak_shared, 1);
        assert_eq!(pull.streak.color_streak(CardCategory::GoldShared), 1);
    }

    #[test]
    fn maxed_card_pull_grants_nothing() {
        let config = minimal_config();
        let cards = vec![card_at("g1", CardCategory::GoldShared, 5)];
        let pull = perform_card_pull(&cards, &config, &StreakState::new(), &mut Deterministic)
            .expect("non-empty collection");
        assert_eq!(pull.duplicates, 0);
        assert_eq!(pull.coins, 0);
    }

    #[test]
    fn empty_collection_yields_no_pull() {
        let config = minimal_config();
        assert!(perform_card_pull(&[], &config, &StreakState::new(), &mut Deterministic).is_none());
    }
}
