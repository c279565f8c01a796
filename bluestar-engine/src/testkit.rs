//! Shared fixtures for module tests.

use std::collections::HashMap;

use crate::card::{Card, CardCategory};
use crate::config::{
    CardTypesEntry, CoinPerDuplicate, DuplicateRange, PackConfig, ProgressionMapping, SimConfig,
    UpgradeTable,
};
use crate::drop::DropTuning;

/// Card at an explicit level, no duplicates.
pub(crate) fn card_at(id: &str, category: CardCategory, level: u32) -> Card {
    let mut card = Card::new(id, id, category);
    card.level = level;
    card
}

/// Small but fully consistent configuration: caps of 5 (shared) and 3
/// (unique) keep the lookup tables short while exercising every code path.
pub(crate) fn minimal_config() -> SimConfig {
    let shared_table = UpgradeTable {
        duplicate_costs: vec![2, 4, 8, 16],
        coin_costs: vec![10, 20, 40, 80],
        bluestar_rewards: vec![1, 2, 3, 4, 5],
    };
    let unique_table = UpgradeTable {
        duplicate_costs: vec![2, 4],
        coin_costs: vec![50, 100],
        bluestar_rewards: vec![5, 10, 15],
    };
    let shared_range = DuplicateRange {
        min_pcts: vec![0.5; 4],
        max_pcts: vec![1.5; 4],
    };
    let unique_range = DuplicateRange {
        min_pcts: vec![0.5; 2],
        max_pcts: vec![1.5; 2],
    };

    let mut upgrade_tables = HashMap::new();
    upgrade_tables.insert(CardCategory::GoldShared, shared_table.clone());
    upgrade_tables.insert(CardCategory::BlueShared, shared_table);
    upgrade_tables.insert(CardCategory::Unique, unique_table);

    let mut duplicate_ranges = HashMap::new();
    duplicate_ranges.insert(CardCategory::GoldShared, shared_range.clone());
    duplicate_ranges.insert(CardCategory::BlueShared, shared_range);
    duplicate_ranges.insert(CardCategory::Unique, unique_range);

    let mut coin_per_duplicate = HashMap::new();
    coin_per_duplicate.insert(
        CardCategory::GoldShared,
        CoinPerDuplicate {
            coins_per_dupe: vec![5, 5, 5, 5],
        },
    );
    coin_per_duplicate.insert(
        CardCategory::BlueShared,
        CoinPerDuplicate {
            coins_per_dupe: vec![5, 5, 5, 5],
        },
    );
    coin_per_duplicate.insert(
        CardCategory::Unique,
        CoinPerDuplicate {
            coins_per_dupe: vec![10, 10],
        },
    );

    let mut unique_unlock_schedule = HashMap::new();
    unique_unlock_schedule.insert(1, 2);

    let mut pack_averages = HashMap::new();
    pack_averages.insert("daily".to_string(), 1.0);

    SimConfig {
        packs: vec![PackConfig {
            name: "daily".to_string(),
            card_types_table: vec![CardTypesEntry {
                min_unlocked: 0,
                card_types: 2,
            }],
        }],
        upgrade_tables,
        duplicate_ranges,
        coin_per_duplicate,
        progression_mapping: ProgressionMapping {
            shared_levels: vec![1, 2, 3, 4, 5],
            unique_levels: vec![1, 1, 2, 2, 3],
        },
        unique_unlock_schedule,
        pack_averages,
        daily_pack_schedule: Vec::new(),
        num_days: 10,
        base_shared_rate: 0.7,
        base_unique_rate: 0.3,
        num_gold_cards: 2,
        num_blue_cards: 2,
        initial_coins: 0,
        initial_bluestars: 0,
        max_shared_level: 5,
        max_unique_level: 3,
        tuning: DropTuning::default(),
    }
}

/// Config shaped like the production defaults (caps 100/10) with the tables
/// left empty; only valid for rarity-decision tests that never touch them.
pub(crate) fn rarity_only_config() -> SimConfig {
    let mut config = minimal_config();
    config.upgrade_tables.clear();
    config.duplicate_ranges.clear();
    config.coin_per_duplicate.clear();
    config.packs.clear();
    config.pack_averages.clear();
    config.unique_unlock_schedule.clear();
    config.max_shared_level = 100;
    config.max_unique_level = 10;
    config.num_days = 100;
    config.progression_mapping = ProgressionMapping {
        shared_levels: vec![1, 5, 10, 20, 40, 60, 80, 100],
        unique_levels: vec![1, 2, 3, 4, 5, 6, 7, 10],
    };
    config
}
