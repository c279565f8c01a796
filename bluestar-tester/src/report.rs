//! Report rendering for single runs and Monte Carlo batches.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use bluestar_engine::{MCResult, SimResult, StatSummary};

/// JSON shape for a Monte Carlo batch: summaries only, never raw
/// accumulator internals.
#[derive(Debug, Serialize)]
pub struct McReport {
    pub runs: u64,
    pub final_bluestars: StatSummary,
    pub final_coins_earned: StatSummary,
    pub final_coins_spent: StatSummary,
    pub daily: Vec<McDailyReport>,
}

#[derive(Debug, Serialize)]
pub struct McDailyReport {
    pub day: u32,
    pub bluestars: StatSummary,
    pub coin_balance: StatSummary,
    pub category_avg_levels: BTreeMap<String, StatSummary>,
}

impl McReport {
    #[must_use]
    pub fn from_result(result: &MCResult) -> Self {
        Self {
            runs: result.runs,
            final_bluestars: result.final_bluestars.summary(),
            final_coins_earned: result.final_coins_earned.summary(),
            final_coins_spent: result.final_coins_spent.summary(),
            daily: result
                .daily
                .iter()
                .enumerate()
                .map(|(index, day)| McDailyReport {
                    day: index as u32 + 1,
                    bluestars: day.bluestars.summary(),
                    coin_balance: day.coin_balance.summary(),
                    category_avg_levels: day
                        .category_avg_levels
                        .iter()
                        .map(|(key, stats)| (key.clone(), stats.summary()))
                        .collect(),
                })
                .collect(),
        }
    }
}

pub fn write_sim_json(writer: &mut dyn Write, result: &SimResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, result)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_mc_json(writer: &mut dyn Write, result: &MCResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &McReport::from_result(result))?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_sim_console(
    writer: &mut dyn Write,
    result: &SimResult,
    duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📈 Deterministic Run Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "============================".cyan())?;
    writeln!(writer, "Days simulated: {}", result.daily_snapshots.len())?;
    writeln!(writer, "Total pulls: {}", result.pull_log.len())?;
    writeln!(
        writer,
        "Final bluestars: {}",
        result.total_bluestars.to_string().green()
    )?;
    writeln!(writer, "Coins earned: {}", result.total_coins_earned)?;
    writeln!(writer, "Coins spent: {}", result.total_coins_spent)?;

    if let Some(last) = result.daily_snapshots.last() {
        writeln!(writer)?;
        writeln!(writer, "Final day ({}):", last.day)?;
        writeln!(writer, "  Coin balance: {}", last.coins_balance)?;
        writeln!(writer, "  Unique unlocked: {}", last.total_unique_unlocked)?;
        for (category, avg) in &last.category_avg_levels {
            writeln!(writer, "  Avg level [{category}]: {avg:.2}")?;
        }
    }

    if !result.total_upgrades.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Upgrades per card:")?;
        for (card_id, count) in &result.total_upgrades {
            writeln!(writer, "  {card_id:12} {count}")?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "🏁 Total time: {duration:?}")?;
    Ok(())
}

pub fn write_mc_console(
    writer: &mut dyn Write,
    result: &MCResult,
    duration: Duration,
) -> Result<()> {
    let report = McReport::from_result(result);

    writeln!(writer)?;
    writeln!(writer, "{}", "🎲 Monte Carlo Batch Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "============================".cyan())?;
    writeln!(writer, "Runs: {}", report.runs)?;
    writeln!(writer, "Days per run: {}", report.daily.len())?;
    writeln!(writer)?;
    write_stat_line(writer, "Final bluestars", &report.final_bluestars)?;
    write_stat_line(writer, "Coins earned", &report.final_coins_earned)?;
    write_stat_line(writer, "Coins spent", &report.final_coins_spent)?;

    // Checkpoint days keep the console readable on long horizons.
    writeln!(writer)?;
    writeln!(writer, "Daily bluestar progression (95% CI):")?;
    for daily in checkpoint_days(&report.daily) {
        writeln!(
            writer,
            "  day {:>3}: {:>10.1} ± {:.1}",
            daily.day, daily.bluestars.mean, daily.bluestars.ci_half_width
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "🏁 Total time: {duration:?}")?;
    Ok(())
}

fn write_stat_line(writer: &mut dyn Write, label: &str, summary: &StatSummary) -> Result<()> {
    writeln!(
        writer,
        "{label}: {} ± {} (std {:.2})",
        format!("{:.1}", summary.mean).green(),
        format!("{:.1}", summary.ci_half_width).yellow(),
        summary.std_dev
    )?;
    Ok(())
}

fn checkpoint_days(daily: &[McDailyReport]) -> impl Iterator<Item = &McDailyReport> {
    let step = (daily.len() / 10).max(1);
    daily
        .iter()
        .enumerate()
        .filter(move |(index, _)| index % step == 0 || *index == daily.len() - 1)
        .map(|(_, day)| day)
}
