mod defaults;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use bluestar_engine::{SamplerBundle, SimConfig, run_monte_carlo, run_simulation};
use defaults::build_default_config;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RunMode {
    /// Single run with midpoint/majority decisions (fully reproducible
    /// without a seed)
    Deterministic,
    /// Repeated seeded runs folded into online statistics
    MonteCarlo,
}

#[derive(Debug, Parser)]
#[command(name = "bluestar-tester", version = "0.3.0")]
#[command(about = "Batch runner for the Bluestar card economy simulation")]
struct Args {
    /// Execution mode
    #[arg(long, value_enum, default_value_t = RunMode::Deterministic)]
    mode: RunMode,

    /// Configuration file (JSON); the built-in 90-day economy when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured day count
    #[arg(long)]
    days: Option<u32>,

    /// Number of Monte Carlo runs
    #[arg(long, default_value_t = 50)]
    runs: u32,

    /// Base seed; run i uses seed + i
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "console"])]
    report: String,

    /// Optional path to write the report instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output (debug-level engine logging)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    announce_banner();

    let config = load_config(&args)?;
    config
        .validate()
        .context("configuration failed validation")?;

    let start_time = Instant::now();
    log::info!("simulating {} days", config.num_days);
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.mode {
        RunMode::Deterministic => {
            let mut sampler = SamplerBundle::deterministic();
            let result = run_simulation(&config, &mut sampler)?;
            match args.report.as_str() {
                "json" => report::write_sim_json(output_target.writer(), &result)?,
                _ => report::write_sim_console(
                    output_target.writer(),
                    &result,
                    start_time.elapsed(),
                )?,
            }
        }
        RunMode::MonteCarlo => {
            let result = run_monte_carlo(&config, args.runs, args.seed)?;
            match args.report.as_str() {
                "json" => report::write_mc_json(output_target.writer(), &result)?,
                _ => report::write_mc_console(
                    output_target.writer(),
                    &result,
                    start_time.elapsed(),
                )?,
            }
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn announce_banner() {
    println!("{}", "🌟 Bluestar Economy Tester".bright_cyan().bold());
    println!("{}", "==========================".cyan());
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            SimConfig::from_json(&json)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => build_default_config(),
    };
    if let Some(days) = args.days {
        config.num_days = days;
    }
    Ok(config)
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
