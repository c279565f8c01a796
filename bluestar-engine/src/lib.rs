//! Bluestar Engine
//!
//! Platform-agnostic simulation core for a collectible card economy: weighted
//! card drops with streak feedback, progression-gated upgrades, a coin ledger,
//! and deterministic or Monte Carlo execution. This crate performs no I/O;
//! callers feed it a validated configuration and consume the result records.

pub mod card;
pub mod config;
pub mod constants;
pub mod drop;
pub mod economy;
pub mod error;
pub mod monte_carlo;
pub mod numbers;
pub mod orchestrator;
pub mod packs;
pub mod progression;
pub mod sampler;
pub mod state;
pub mod stats;
pub mod streak;
pub mod upgrade;

#[cfg(test)]
pub(crate) mod testkit;

// Re-export commonly used types
pub use card::{CATEGORY_ORDER, Card, CardCategory};
pub use config::{
    CardTypesEntry, CoinPerDuplicate, DuplicateRange, PackConfig, ProgressionMapping, SimConfig,
    UpgradeTable,
};
pub use drop::{DropTuning, ResolvedPull, perform_card_pull, shared_probability};
pub use economy::{
    CoinLedger, CoinTransaction, DailyLedgerSummary, TransactionKind, compute_coin_income,
};
pub use error::EngineError;
pub use monte_carlo::{DailyStats, MCResult, run_monte_carlo, validate_run_budget};
pub use orchestrator::{DailySnapshot, PullEvent, SimResult, run_simulation};
pub use packs::{CardPull, pulls_for_day};
pub use progression::{
    accumulate_unlock_schedule, avg_shared_progression, can_upgrade_unique, lookup_unique_gate,
};
pub use sampler::{Deterministic, RandomnessSource, SamplerBundle, SeededSampler};
pub use state::GameState;
pub use stats::{OnlineStats, StatSummary};
pub use streak::StreakState;
pub use upgrade::{UpgradeEvent, UpgradeList, attempt_upgrades};
