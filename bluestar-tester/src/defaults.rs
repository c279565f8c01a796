//! Built-in configuration used when no config file is supplied: a
//! 90-day economy with production-scale level caps (100 shared, 10
//! unique) and smoothly growing cost curves.

use std::collections::HashMap;

use bluestar_engine::{
    CardCategory, CardTypesEntry, CoinPerDuplicate, DropTuning, DuplicateRange, PackConfig,
    ProgressionMapping, SimConfig, UpgradeTable,
};

const SHARED_CAP: u32 = 100;
const UNIQUE_CAP: u32 = 10;

fn shared_upgrade_table() -> UpgradeTable {
    UpgradeTable {
        duplicate_costs: (1..SHARED_CAP).map(|level| 2 + level / 5).collect(),
        coin_costs: (1..SHARED_CAP).map(|level| u64::from(10 * level)).collect(),
        bluestar_rewards: (0..SHARED_CAP).map(u64::from).collect(),
    }
}

fn unique_upgrade_table() -> UpgradeTable {
    UpgradeTable {
        duplicate_costs: (1..UNIQUE_CAP).map(|level| 2 * level).collect(),
        coin_costs: (1..UNIQUE_CAP).map(|level| u64::from(100 * level)).collect(),
        bluestar_rewards: (0..UNIQUE_CAP).map(|level| u64::from(10 * level)).collect(),
    }
}

fn range(steps: u32) -> DuplicateRange {
    DuplicateRange {
        min_pcts: vec![0.8; steps as usize],
        max_pcts: vec![1.2; steps as usize],
    }
}

/// The configuration every CLI run starts from.
#[must_use]
pub fn build_default_config() -> SimConfig {
    let mut upgrade_tables = HashMap::new();
    upgrade_tables.insert(CardCategory::GoldShared, shared_upgrade_table());
    upgrade_tables.insert(CardCategory::BlueShared, shared_upgrade_table());
    upgrade_tables.insert(CardCategory::Unique, unique_upgrade_table());

    let mut duplicate_ranges = HashMap::new();
    duplicate_ranges.insert(CardCategory::GoldShared, range(SHARED_CAP - 1));
    duplicate_ranges.insert(CardCategory::BlueShared, range(SHARED_CAP - 1));
    duplicate_ranges.insert(CardCategory::Unique, range(UNIQUE_CAP - 1));

    let mut coin_per_duplicate = HashMap::new();
    coin_per_duplicate.insert(
        CardCategory::GoldShared,
        CoinPerDuplicate {
            coins_per_dupe: vec![5; (SHARED_CAP - 1) as usize],
        },
    );
    coin_per_duplicate.insert(
        CardCategory::BlueShared,
        CoinPerDuplicate {
            coins_per_dupe: vec![3; (SHARED_CAP - 1) as usize],
        },
    );
    coin_per_duplicate.insert(
        CardCategory::Unique,
        CoinPerDuplicate {
            coins_per_dupe: vec![20; (UNIQUE_CAP - 1) as usize],
        },
    );

    // Heroes trickle in over the first six weeks.
    let unique_unlock_schedule: HashMap<u32, u32> =
        [(1, 3), (7, 1), (14, 1), (21, 1), (30, 2), (45, 2)]
            .into_iter()
            .collect();

    let pack_averages: HashMap<String, f64> = [("daily".to_string(), 4.0),
        ("premium".to_string(), 0.5)]
    .into_iter()
    .collect();

    SimConfig {
        packs: vec![
            PackConfig {
                name: "daily".to_string(),
                card_types_table: vec![
                    CardTypesEntry {
                        min_unlocked: 0,
                        card_types: 3,
                    },
                    CardTypesEntry {
                        min_unlocked: 5,
                        card_types: 4,
                    },
                    CardTypesEntry {
                        min_unlocked: 10,
                        card_types: 5,
                    },
                ],
            },
            PackConfig {
                name: "premium".to_string(),
                card_types_table: vec![
                    CardTypesEntry {
                        min_unlocked: 0,
                        card_types: 1,
                    },
                    CardTypesEntry {
                        min_unlocked: 10,
                        card_types: 2,
                    },
                ],
            },
        ],
        upgrade_tables,
        duplicate_ranges,
        coin_per_duplicate,
        progression_mapping: ProgressionMapping {
            shared_levels: vec![1, 5, 10, 20, 40, 60, 80, 100],
            unique_levels: vec![1, 2, 3, 4, 5, 6, 7, 10],
        },
        unique_unlock_schedule,
        pack_averages,
        daily_pack_schedule: Vec::new(),
        num_days: 90,
        base_shared_rate: 0.7,
        base_unique_rate: 0.3,
        num_gold_cards: 5,
        num_blue_cards: 5,
        initial_coins: 0,
        initial_bluestars: 0,
        max_shared_level: SHARED_CAP,
        max_unique_level: UNIQUE_CAP,
        tuning: DropTuning::default(),
    }
}
