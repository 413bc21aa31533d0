//! Tournament command - several rounds between two robots
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_plan(), play_tournament(), report_results()
//! - Level 3: round list assembly
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use robowars_core::{Preset, StrategyKind};
use robowars_tournament::{PlacementPolicy, Tournament, TournamentPlan, TournamentReport};

use crate::pacing::{run_paced, ConsoleObserver};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct TournamentArgs {
    /// Left robot (random, hunter, sweeper)
    #[arg(long, default_value = "hunter")]
    pub left: StrategyKind,

    /// Right robot (random, hunter, sweeper)
    #[arg(long, default_value = "random")]
    pub right: StrategyKind,

    /// Field preset for every round
    #[arg(long, conflicts_with = "presets")]
    pub preset: Option<Preset>,

    /// Comma-separated presets, cycled over the rounds
    #[arg(long, value_delimiter = ',')]
    pub presets: Vec<Preset>,

    /// Number of rounds (ignored with --config)
    #[arg(long, default_value = "4")]
    pub rounds: usize,

    /// Tournament plan JSON file
    #[arg(long, value_name = "FILE", conflicts_with_all = ["preset", "presets"])]
    pub config: Option<PathBuf>,

    /// Milliseconds between turns; enables live play
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// What to do with illegal fleets
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Placement attempts under the retry policy
    #[arg(long, default_value = "3")]
    pub max_attempts: u32,

    /// Turn cap per round (default 4 x field area)
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PolicyArg {
    Retry,
    Disqualify,
}

#[derive(Serialize)]
struct TournamentRecord<'a> {
    generated_at: String,
    interrupted: bool,
    #[serde(flatten)]
    report: &'a TournamentReport,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run tournament command
///
/// 1. Build the round plan from flags or a plan file
/// 2. Play it, paced or as fast as possible
/// 3. Report results
pub async fn run(args: TournamentArgs, seed: Option<u64>) -> Result<()> {
    let plan = build_plan(&args)?;
    let seed = seed.unwrap_or(42);

    tracing::info!(
        "Starting tournament: {} vs {} ({} rounds)",
        args.left,
        args.right,
        plan.rounds.len()
    );

    let (report, interrupted) = play_tournament(&args, &plan, seed).await?;
    report_results(&report, interrupted, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Plan from file, or from preset flags; explicit flags override file settings
fn build_plan(args: &TournamentArgs) -> Result<TournamentPlan> {
    let mut plan = match &args.config {
        Some(path) => TournamentPlan::load(path)?,
        None => TournamentPlan::from_presets(&round_presets(args)),
    };

    if let Some(policy) = args.policy {
        plan.placement_policy = match policy {
            PolicyArg::Retry => PlacementPolicy::Retry {
                max_attempts: args.max_attempts,
            },
            PolicyArg::Disqualify => PlacementPolicy::Disqualify,
        };
    }
    if args.max_turns.is_some() {
        plan.max_turns_per_round = args.max_turns;
    }
    if let Some(interval) = args.interval_ms {
        plan.tick_interval_ms = interval;
    }

    plan.validate().context("Tournament plan is not playable")?;
    Ok(plan)
}

async fn play_tournament(
    args: &TournamentArgs,
    plan: &TournamentPlan,
    seed: u64,
) -> Result<(TournamentReport, bool)> {
    let config = plan.tournament_config();
    let interval = config.tick_interval_ms;
    let mut tournament = Tournament::new(config);

    if interval > 0 {
        tournament.add_observer(Box::new(ConsoleObserver::default()));
    }
    tournament.start(
        plan.configurations(),
        args.left.build(seed),
        args.right.build(seed.wrapping_add(1)),
    )?;

    if interval > 0 {
        let interrupted = run_paced(&mut tournament, Duration::from_millis(interval)).await?;
        Ok((tournament.report(), interrupted))
    } else {
        Ok((tournament.run_to_completion(), false))
    }
}

fn report_results(report: &TournamentReport, interrupted: bool, json: bool) -> Result<()> {
    if json {
        let record = TournamentRecord {
            generated_at: chrono::Utc::now().to_rfc3339(),
            interrupted,
            report,
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", report.render_text());
        if interrupted {
            println!("(interrupted)");
        }
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Presets for each round, cycling the given list
fn round_presets(args: &TournamentArgs) -> Vec<Preset> {
    let pool = if !args.presets.is_empty() {
        args.presets.clone()
    } else {
        vec![args.preset.unwrap_or(Preset::Normal)]
    };
    pool.iter().copied().cycle().take(args.rounds).collect()
}
