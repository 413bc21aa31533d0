//! Series command - many independent tournaments between two robot kinds
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_series() with a progress bar, report_results()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use robowars_core::{Preset, StrategyKind};
use robowars_tournament::{run_series, SeriesResult, TournamentConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SeriesArgs {
    /// Left robot (random, hunter, sweeper)
    #[arg(long, default_value = "hunter")]
    pub left: StrategyKind,

    /// Right robot (random, hunter, sweeper)
    #[arg(long, default_value = "random")]
    pub right: StrategyKind,

    /// Number of tournaments
    #[arg(long, default_value = "20")]
    pub tournaments: usize,

    /// Rounds per tournament
    #[arg(long, default_value = "4")]
    pub rounds: usize,

    /// Field preset for every round
    #[arg(long, default_value = "normal")]
    pub preset: Preset,

    /// Run tournaments in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON (per-tournament reports included)
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct SeriesRecord<'a> {
    generated_at: String,
    preset: Preset,
    #[serde(flatten)]
    result: &'a SeriesResult,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: SeriesArgs, seed: Option<u64>) -> Result<()> {
    let base_seed = seed.unwrap_or(42);
    // Each tournament consumes two seeds, one per robot
    let seeds: Vec<u64> = (0..args.tournaments as u64)
        .map(|i| base_seed.wrapping_add(i * 2))
        .collect();
    let rounds = vec![args.preset.configuration(); args.rounds];

    let progress = ProgressBar::new(seeds.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} tournaments")?,
    );

    let result = run_series(
        args.left,
        args.right,
        &rounds,
        &seeds,
        &TournamentConfig::default(),
        args.parallel,
        |_| progress.inc(1),
    );
    progress.finish_and_clear();

    report_results(&result, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn report_results(result: &SeriesResult, args: &SeriesArgs) -> Result<()> {
    if args.json {
        let record = SeriesRecord {
            generated_at: chrono::Utc::now().to_rfc3339(),
            preset: args.preset,
            result,
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_text_results(result, args);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_results(result: &SeriesResult, args: &SeriesArgs) {
    println!("\n=== Series Results ===");
    println!(
        "{} vs {}: {} tournaments of {} rounds on {}",
        result.left,
        result.right,
        result.tournaments(),
        args.rounds,
        args.preset
    );
    println!("Tournaments won:  {} {} - {} {}  (tied {})",
        result.left, result.left_tournaments, result.right_tournaments, result.right, result.tied_tournaments
    );
    println!("Rounds won:       {} {} - {} {}  (undecided {})",
        result.left, result.left_rounds, result.right_rounds, result.right, result.undecided_rounds
    );
    println!("Left round share: {:.1}%", result.left_round_rate() * 100.0);
}
