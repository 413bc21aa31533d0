//! Series play - many independent tournaments between two robot kinds
//!
//! Level 1 - Orchestration
//!
//! Each tournament gets its own freshly seeded robots, so tournaments share
//! nothing and can run on rayon workers.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use robowars_core::{FieldConfiguration, Side, StrategyKind};

use crate::config::TournamentConfig;
use crate::stats::TournamentReport;
use crate::tournament::Tournament;

/// Aggregate of a series
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesResult {
    pub left: StrategyKind,
    pub right: StrategyKind,
    /// Tournaments won on round wins
    pub left_tournaments: u32,
    pub right_tournaments: u32,
    pub tied_tournaments: u32,
    pub left_rounds: u32,
    pub right_rounds: u32,
    pub undecided_rounds: u32,
    pub reports: Vec<TournamentReport>,
}

impl SeriesResult {
    fn aggregate(left: StrategyKind, right: StrategyKind, reports: Vec<TournamentReport>) -> Self {
        let count = |side: Side| reports.iter().filter(|r| r.leader() == Some(side)).count() as u32;
        Self {
            left,
            right,
            left_tournaments: count(Side::Left),
            right_tournaments: count(Side::Right),
            tied_tournaments: reports.iter().filter(|r| r.leader().is_none()).count() as u32,
            left_rounds: reports.iter().map(|r| r.left.wins).sum(),
            right_rounds: reports.iter().map(|r| r.right.wins).sum(),
            undecided_rounds: reports.iter().map(|r| r.undecided).sum(),
            reports,
        }
    }

    pub fn tournaments(&self) -> usize {
        self.reports.len()
    }

    /// Share of decided rounds won by the left robot
    pub fn left_round_rate(&self) -> f32 {
        let decided = self.left_rounds + self.right_rounds;
        if decided == 0 {
            0.0
        } else {
            self.left_rounds as f32 / decided as f32
        }
    }
}

/// Run one tournament per seed and aggregate the results.
///
/// The left robot is seeded with `seed`, the right one with `seed + 1`.
/// `on_done` is called after each tournament, from whichever thread ran it.
pub fn run_series<F>(
    left: StrategyKind,
    right: StrategyKind,
    rounds: &[FieldConfiguration],
    seeds: &[u64],
    config: &TournamentConfig,
    parallel: bool,
    on_done: F,
) -> SeriesResult
where
    F: Fn(&TournamentReport) + Sync,
{
    tracing::info!(
        "Series: {} vs {}, {} tournaments of {} rounds{}",
        left,
        right,
        seeds.len(),
        rounds.len(),
        if parallel { " (parallel)" } else { "" }
    );

    let play = |&seed: &u64| {
        let report = play_tournament(left, right, rounds, seed, config);
        on_done(&report);
        report
    };

    let reports: Vec<TournamentReport> = if parallel {
        seeds.par_iter().map(play).collect()
    } else {
        seeds.iter().map(play).collect()
    };

    SeriesResult::aggregate(left, right, reports)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

fn play_tournament(
    left: StrategyKind,
    right: StrategyKind,
    rounds: &[FieldConfiguration],
    seed: u64,
    config: &TournamentConfig,
) -> TournamentReport {
    let mut tournament = Tournament::new(config.clone());
    if let Err(err) = tournament.start(rounds.to_vec(), left.build(seed), right.build(seed.wrapping_add(1))) {
        tracing::warn!("Tournament with seed {} not started: {}", seed, err);
    }
    tournament.run_to_completion()
}
