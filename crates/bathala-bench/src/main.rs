use std::path::PathBuf;

use clap::Parser;

use bathala_bench::config::{DuelBenchConfig, ResolvedOutputs};
use bathala_bench::duel::DuelRunner;
use bathala_bench::logging::init_logging;
use bathala_core::AppInfo;

/// Duel harness pitting a scripted player against Bathala creature AIs.
#[derive(Debug, Parser)]
#[command(
    name = "bathala-bench",
    author,
    version,
    about = "Deterministic creature AI duel harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of combats per creature.
    #[arg(long, value_name = "COMBATS")]
    combats: Option<usize>,

    /// Override the RNG seed for decks and creature minds.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Let each creature's level follow its recent win rate.
    #[arg(long)]
    tuning: bool,

    /// Write structured decision logs regardless of config.
    #[arg(long)]
    log_decisions: bool,

    /// Exit after validating the configuration (no duels are run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = DuelBenchConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(combats) = cli.combats {
        config.duels.combats = combats;
    }

    if let Some(seed) = cli.seed {
        config.duels.seed = Some(seed);
    }

    if cli.tuning {
        config.duels.tuning = true;
    }

    if cli.log_decisions {
        config.logging.enable_structured = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let creature_count = config.creatures.len();
    let run_id = config.run_id.clone();
    let combats = config.duels.combats;

    println!(
        "{} {} ({}): loaded '{run_id}' with {creature_count} creature{} ({combats} combats each)",
        AppInfo::name(),
        AppInfo::version(),
        AppInfo::codename(),
        if creature_count == 1 { "" } else { "s" }
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = DuelRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: duels skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Duels complete for '{run_id}': {} combats × {} creatures → {} rows at {}",
        summary.combats_played,
        summary.creatures,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Decision log: {}", guard.decisions_path.display());
    }

    Ok(())
}
