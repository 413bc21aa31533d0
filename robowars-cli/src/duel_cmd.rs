//! Duel command - one game between two robots
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_duel(), play_duel(), report_results()
//! - Level 3: tallying turns
//! - Level 4: formatting utilities

use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use robowars_core::{
    Duel, DuelError, DuelEvent, DuelOutcome, EventRecorder, Preset, Side, StrategyKind,
};
use robowars_tournament::{RobotStats, TournamentConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct DuelArgs {
    /// Left robot (random, hunter, sweeper)
    #[arg(long, default_value = "hunter")]
    pub left: StrategyKind,

    /// Right robot (random, hunter, sweeper)
    #[arg(long, default_value = "random")]
    pub right: StrategyKind,

    /// Field preset
    #[arg(long, default_value = "classic")]
    pub preset: Preset,

    /// Side that shoots first
    #[arg(long, value_enum, default_value = "left")]
    pub first: FirstShooter,

    /// Include the full event log in the output
    #[arg(long)]
    pub events: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FirstShooter {
    Left,
    Right,
}

impl From<FirstShooter> for Side {
    fn from(first: FirstShooter) -> Self {
        match first {
            FirstShooter::Left => Side::Left,
            FirstShooter::Right => Side::Right,
        }
    }
}

/// Everything worth reporting about a finished duel
#[derive(Serialize)]
struct DuelRecord {
    generated_at: String,
    preset: Preset,
    left: String,
    right: String,
    first_shooter: Side,
    outcome: Option<DuelOutcome>,
    stats: [RobotStats; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<DuelEvent>>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run duel command
///
/// 1. Seat both robots and place fleets
/// 2. Play turns until the duel finishes
/// 3. Report results
pub fn run(args: DuelArgs, seed: Option<u64>) -> Result<()> {
    let seed = seed.unwrap_or(42);
    let recorder = EventRecorder::new();
    let mut duel = setup_duel(&args, seed, &recorder)?;

    tracing::info!(
        "Starting duel: {} vs {} on {}",
        args.left,
        args.right,
        args.preset
    );

    let stats = play_duel(&mut duel);
    let record = DuelRecord {
        generated_at: chrono::Utc::now().to_rfc3339(),
        preset: args.preset,
        left: duel.participant(Side::Left).name().to_string(),
        right: duel.participant(Side::Right).name().to_string(),
        first_shooter: duel.first_shooter(),
        outcome: duel.outcome(),
        stats,
        events: args.events.then(|| recorder.take()),
    };

    report_results(&record, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn setup_duel(args: &DuelArgs, seed: u64, recorder: &EventRecorder) -> Result<Duel> {
    let mut duel = Duel::new(
        args.left.build(seed),
        args.right.build(seed.wrapping_add(1)),
        args.preset.configuration(),
    )
    .with_first_shooter(args.first.into());
    duel.add_observer(Box::new(recorder.clone()));

    duel.prepare().map_err(|err| match &err {
        DuelError::Placement { strategy, source, .. } => anyhow!(source.message_for(strategy)),
        DuelError::StrategyFault { .. } => anyhow!(err.to_string()),
    })?;
    Ok(duel)
}

/// Play until the duel finishes, tallying each turn for its shooter
fn play_duel(duel: &mut Duel) -> [RobotStats; 2] {
    let limit = TournamentConfig::default().turn_limit(duel.config());
    let mut stats = [RobotStats::default(); 2];
    duel.start_game();
    while let Some(report) = duel.tick() {
        stats[report.shooter.index()].record(&report);
        if duel.turns() >= limit {
            tracing::warn!("Turn limit of {} reached, stopping the duel", limit);
            duel.stop_game();
        }
    }
    stats
}

fn report_results(record: &DuelRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print_text_results(record);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_results(record: &DuelRecord) {
    println!("\n=== Duel Results ===");
    println!("Preset: {} ({})", record.preset, record.preset.configuration());
    println!("{} (left) vs {} (right), {} shoots first", record.left, record.right, record.first_shooter);

    match record.outcome {
        Some(DuelOutcome { winner: Some(side), reason, turns }) => {
            let name = if side == Side::Left { &record.left } else { &record.right };
            println!("Winner: {} ({:?}, {} turns)", name, reason, turns);
        }
        Some(DuelOutcome { winner: None, reason, turns }) => {
            println!("No winner ({:?}, {} turns)", reason, turns);
        }
        None => println!("Duel did not finish"),
    }

    for (name, stats) in [(&record.left, &record.stats[0]), (&record.right, &record.stats[1])] {
        println!(
            "  {:<10} shots {:>4}  hits {:>4}  kills {:>3}  accuracy {:>3}%",
            name,
            stats.shots,
            stats.hits,
            stats.kills,
            stats.accuracy()
        );
    }

    if let Some(events) = &record.events {
        println!("Events: {}", events.len());
    }
}
