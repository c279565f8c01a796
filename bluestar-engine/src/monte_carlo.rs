//! Monte Carlo driver: repeated seeded runs folded into online statistics.
//! Run records are dropped as soon as they are folded, so memory scales
//! with days tracked, never with run count.

use std::collections::BTreeMap;

use log::{info, warn};

use crate::card::CATEGORY_ORDER;
use crate::config::SimConfig;
use crate::constants::{MC_HARD_RUN_CAP, MC_SOFT_RUN_CAP};
use crate::error::EngineError;
use crate::numbers;
use crate::orchestrator::{run_simulation, SimResult};
use crate::sampler::SamplerBundle;
use crate::stats::OnlineStats;

/// Accumulators for one simulated day across all runs.
#[derive(Debug, Clone, Default)]
pub struct DailyStats {
    pub bluestars: OnlineStats,
    pub coin_balance: OnlineStats,
    /// Keyed by category snapshot key.
    pub category_avg_levels: BTreeMap<String, OnlineStats>,
}

/// Aggregated output of a Monte Carlo batch.
#[derive(Debug, Clone, Default)]
pub struct MCResult {
    pub runs: u64,
    pub final_bluestars: OnlineStats,
    pub final_coins_earned: OnlineStats,
    pub final_coins_spent: OnlineStats,
    /// One entry per simulated day, in day order.
    pub daily: Vec<DailyStats>,
}

impl MCResult {
    fn with_days(num_days: u32) -> Self {
        Self {
            daily: vec![DailyStats::default(); num_days as usize],
            ..Self::default()
        }
    }

    fn fold(&mut self, result: &SimResult) {
        self.runs += 1;
        self.final_bluestars
            .push(numbers::u64_to_f64(result.total_bluestars));
        self.final_coins_earned
            .push(numbers::u64_to_f64(result.total_coins_earned));
        self.final_coins_spent
            .push(numbers::u64_to_f64(result.total_coins_spent));
        for (stats, snapshot) in self.daily.iter_mut().zip(&result.daily_snapshots) {
            stats
                .bluestars
                .push(numbers::u64_to_f64(snapshot.total_bluestars));
            stats
                .coin_balance
                .push(numbers::u64_to_f64(snapshot.coins_balance));
            for category in CATEGORY_ORDER {
                let key = category.key();
                let avg = snapshot.category_avg_levels.get(key).copied().unwrap_or(0.0);
                stats
                    .category_avg_levels
                    .entry(key.to_owned())
                    .or_default()
                    .push(avg);
            }
        }
    }
}

/// Validate the run budget before any simulation work.
///
/// # Errors
///
/// Zero runs and counts above the hard cap are both `EngineError::RunBudget`.
pub fn validate_run_budget(num_runs: u32) -> Result<(), EngineError> {
    if num_runs == 0 {
        return Err(EngineError::RunBudget(
            "run count must be at least 1".to_string(),
        ));
    }
    if num_runs > MC_HARD_RUN_CAP {
        return Err(EngineError::RunBudget(format!(
            "run count {num_runs} exceeds hard cap {MC_HARD_RUN_CAP}"
        )));
    }
    if num_runs > MC_SOFT_RUN_CAP {
        warn!("run count {num_runs} exceeds soft cap {MC_SOFT_RUN_CAP}; expect a slow batch");
    }
    Ok(())
}

/// Execute `num_runs` independent seeded runs. Run `i` draws from streams
/// derived from `base_seed + i`, so a batch is reproducible from its base
/// seed alone.
///
/// # Errors
///
/// Rejects a bad run budget or configuration before the first run;
/// propagates any run failure as-is.
pub fn run_monte_carlo(
    config: &SimConfig,
    num_runs: u32,
    base_seed: u64,
) -> Result<MCResult, EngineError> {
    validate_run_budget(num_runs)?;
    config.validate()?;

    let mut accumulated = MCResult::with_days(config.num_days);
    for run_index in 0..num_runs {
        let run_seed = base_seed.wrapping_add(u64::from(run_index));
        let mut sampler = SamplerBundle::seeded(run_seed);
        let result = run_simulation(config, &mut sampler)?;
        accumulated.fold(&result);
    }
    info!(
        "monte carlo batch complete: {num_runs} runs, mean bluestars {:.2}",
        accumulated.final_bluestars.mean()
    );
    Ok(accumulated)
}
