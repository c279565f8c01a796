//! Simulation configuration: lookup tables, pack definitions, run settings.
//!
//! Configuration is supplied fully populated by the hosting layer and is
//! read-only for the lifetime of a run. [`SimConfig::validate`] fails fast on
//! inconsistent tables so that no contract violation can surface mid-run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::card::{CATEGORY_ORDER, CardCategory};
use crate::constants::{DEFAULT_MAX_SHARED_LEVEL, DEFAULT_MAX_UNIQUE_LEVEL, RATE_SUM_TOLERANCE};
use crate::drop::DropTuning;
use crate::error::EngineError;

/// Per-category upgrade cost and reward tables.
///
/// `duplicate_costs` and `coin_costs` are indexed by `level - 1` (the cost of
/// leaving the current level). `bluestar_rewards` is indexed by the
/// pre-upgrade level itself, so it needs one more entry than the cost tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeTable {
    pub duplicate_costs: Vec<u32>,
    pub coin_costs: Vec<u64>,
    pub bluestar_rewards: Vec<u64>,
}

/// Percentile window for duplicate rewards, indexed by `level - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateRange {
    pub min_pcts: Vec<f64>,
    pub max_pcts: Vec<f64>,
}

/// Coins granted per duplicate copy, indexed by `level - 1`. Entry 0 doubles
/// as the flat rate for maxed cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinPerDuplicate {
    pub coins_per_dupe: Vec<u64>,
}

/// Maps average shared level thresholds to the maximum permitted unique
/// level. `shared_levels` must be strictly ascending and pair 1:1 with
/// `unique_levels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionMapping {
    pub shared_levels: Vec<u32>,
    pub unique_levels: Vec<u32>,
}

/// One row of a pack's card-types table: packs yield `card_types` pulls per
/// open once at least `min_unlocked` unique cards are unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTypesEntry {
    pub min_unlocked: u32,
    pub card_types: u32,
}

/// Definition of one external pack type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackConfig {
    pub name: String,
    pub card_types_table: Vec<CardTypesEntry>,
}

impl PackConfig {
    /// Floor lookup: the row with the largest `min_unlocked` not exceeding
    /// the current unlocked unique count. Returns 0 pulls if no row
    /// qualifies; validation guarantees a `min_unlocked == 0` row exists.
    #[must_use]
    pub fn card_types_for(&self, unlocked_unique: u32) -> u32 {
        self.card_types_table
            .iter()
            .filter(|entry| entry.min_unlocked <= unlocked_unique)
            .max_by_key(|entry| entry.min_unlocked)
            .map_or(0, |entry| entry.card_types)
    }
}

/// Fully populated, validated configuration for one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub packs: Vec<PackConfig>,
    pub upgrade_tables: HashMap<CardCategory, UpgradeTable>,
    pub duplicate_ranges: HashMap<CardCategory, DuplicateRange>,
    pub coin_per_duplicate: HashMap<CardCategory, CoinPerDuplicate>,
    pub progression_mapping: ProgressionMapping,
    /// Day -> number of unique cards unlocked on that day. Keys need not be
    /// sorted; accumulation is order-independent.
    pub unique_unlock_schedule: HashMap<u32, u32>,
    /// Expected packs opened per day, keyed by pack name.
    pub pack_averages: HashMap<String, f64>,
    /// Optional cycling per-day override for `pack_averages`. Day `d` uses
    /// entry `(d - 1) % len`. Empty means use `pack_averages` every day.
    #[serde(default)]
    pub daily_pack_schedule: Vec<HashMap<String, f64>>,
    pub num_days: u32,
    pub base_shared_rate: f64,
    pub base_unique_rate: f64,
    #[serde(default = "default_shared_card_count")]
    pub num_gold_cards: u32,
    #[serde(default = "default_shared_card_count")]
    pub num_blue_cards: u32,
    #[serde(default)]
    pub initial_coins: u64,
    #[serde(default)]
    pub initial_bluestars: u64,
    #[serde(default = "default_max_shared_level")]
    pub max_shared_level: u32,
    #[serde(default = "default_max_unique_level")]
    pub max_unique_level: u32,
    #[serde(default)]
    pub tuning: DropTuning,
}

const fn default_shared_card_count() -> u32 {
    5
}

const fn default_max_shared_level() -> u32 {
    DEFAULT_MAX_SHARED_LEVEL
}

const fn default_max_unique_level() -> u32 {
    DEFAULT_MAX_UNIQUE_LEVEL
}

impl SimConfig {
    /// Parse a configuration from JSON. Validation is separate so callers
    /// can still inspect a structurally sound but inconsistent config.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfig` when the JSON does not match the
    /// configuration schema.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|err| EngineError::InvalidConfig(err.to_string()))
    }

    /// Level cap for a category.
    #[must_use]
    pub const fn max_level_for(&self, category: CardCategory) -> u32 {
        if category.is_shared() {
            self.max_shared_level
        } else {
            self.max_unique_level
        }
    }

    /// Pack-open rates for a given 1-indexed day.
    #[must_use]
    pub fn day_pack_counts(&self, day: u32) -> &HashMap<String, f64> {
        if self.daily_pack_schedule.is_empty() {
            return &self.pack_averages;
        }
        let index = ((day.saturating_sub(1)) as usize) % self.daily_pack_schedule.len();
        &self.daily_pack_schedule[index]
    }

    /// Fail-fast contract check run before any simulation work.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfig` naming the first inconsistency
    /// found: mismatched table lengths, a non-ascending progression mapping,
    /// malformed base rates, or a pack without a floor row.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.validate_rates()?;
        self.validate_mapping()?;
        self.validate_packs()?;
        for category in CATEGORY_ORDER {
            self.validate_tables_for(category)?;
        }
        Ok(())
    }

    fn validate_rates(&self) -> Result<(), EngineError> {
        let sum = self.base_shared_rate + self.base_unique_rate;
        if self.base_shared_rate < 0.0
            || self.base_unique_rate < 0.0
            || (sum - 1.0).abs() > RATE_SUM_TOLERANCE
        {
            return Err(EngineError::InvalidConfig(format!(
                "base rates must be non-negative and sum to 1.0, got {} + {}",
                self.base_shared_rate, self.base_unique_rate
            )));
        }
        if self.max_shared_level < 1 || self.max_unique_level < 1 {
            return Err(EngineError::InvalidConfig(
                "category level caps must be at least 1".to_string(),
            ));
        }
        if self.num_days < 1 {
            return Err(EngineError::InvalidConfig(
                "simulation must cover at least one day".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_mapping(&self) -> Result<(), EngineError> {
        let mapping = &self.progression_mapping;
        if mapping.shared_levels.is_empty() {
            return Err(EngineError::InvalidConfig(
                "progression mapping must have at least one entry".to_string(),
            ));
        }
        if mapping.shared_levels.len() != mapping.unique_levels.len() {
            return Err(EngineError::InvalidConfig(format!(
                "progression mapping length mismatch: {} shared vs {} unique",
                mapping.shared_levels.len(),
                mapping.unique_levels.len()
            )));
        }
        let ascending = mapping
            .shared_levels
            .windows(2)
            .all(|pair| pair[0] < pair[1]);
        if !ascending {
            return Err(EngineError::InvalidConfig(
                "progression mapping shared_levels must be strictly ascending".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_packs(&self) -> Result<(), EngineError> {
        for pack in &self.packs {
            if pack.name.is_empty() {
                return Err(EngineError::InvalidConfig(
                    "pack name must not be empty".to_string(),
                ));
            }
            if !pack
                .card_types_table
                .iter()
                .any(|entry| entry.min_unlocked == 0)
            {
                return Err(EngineError::InvalidConfig(format!(
                    "pack '{}' card_types_table needs a min_unlocked 0 row",
                    pack.name
                )));
            }
        }
        for (name, rate) in self
            .pack_averages
            .iter()
            .chain(self.daily_pack_schedule.iter().flatten())
        {
            if !rate.is_finite() || *rate < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "pack rate for '{name}' must be finite and non-negative, got {rate}"
                )));
            }
        }
        Ok(())
    }

    fn validate_tables_for(&self, category: CardCategory) -> Result<(), EngineError> {
        let max_level = self.max_level_for(category) as usize;
        let steps = max_level - 1;

        let table = self.upgrade_tables.get(&category).ok_or_else(|| {
            EngineError::InvalidConfig(format!("missing upgrade table for {category}"))
        })?;
        if table.duplicate_costs.len() < steps || table.coin_costs.len() < steps {
            return Err(EngineError::InvalidConfig(format!(
                "upgrade cost tables for {category} need {steps} entries"
            )));
        }
        // Rewards are indexed by the pre-upgrade level, so the table needs
        // one entry beyond the cost tables.
        if table.bluestar_rewards.len() < max_level {
            return Err(EngineError::InvalidConfig(format!(
                "bluestar_rewards for {category} needs {max_level} entries"
            )));
        }

        let ranges = self.duplicate_ranges.get(&category).ok_or_else(|| {
            EngineError::InvalidConfig(format!("missing duplicate range for {category}"))
        })?;
        if ranges.min_pcts.len() < steps || ranges.max_pcts.len() < steps {
            return Err(EngineError::InvalidConfig(format!(
                "duplicate ranges for {category} need {steps} entries"
            )));
        }
        for (min, max) in ranges.min_pcts.iter().zip(&ranges.max_pcts) {
            if !min.is_finite() || !max.is_finite() || *min < 0.0 || max < min {
                return Err(EngineError::InvalidConfig(format!(
                    "duplicate range for {category} has invalid window {min}..{max}"
                )));
            }
        }

        let coins = self.coin_per_duplicate.get(&category).ok_or_else(|| {
            EngineError::InvalidConfig(format!("missing coin-per-duplicate table for {category}"))
        })?;
        if coins.coins_per_dupe.len() < steps.max(1) {
            return Err(EngineError::InvalidConfig(format!(
                "coins_per_dupe for {category} needs {} entries",
                steps.max(1)
            )));
        }
        Ok(())
    }
}
