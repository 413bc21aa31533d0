//! Round records and tournament reports
//!
//! Level 3 - Steps (tallying) and Level 4 - Utilities (rendering)

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use robowars_core::{FieldConfiguration, FinishReason, ShotOutcome, Side, TurnReport};

/// Shot counters for one robot in one round
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotStats {
    /// Every shot fired, including ones outside the field
    pub shots: u32,
    /// Shots that damaged or killed a ship
    pub hits: u32,
    pub kills: u32,
    /// Shots at cells that were already resolved
    pub repeats: u32,
}

impl RobotStats {
    /// Tally one turn fired by this robot
    pub fn record(&mut self, report: &TurnReport) {
        self.shots += 1;
        if report.outcome.is_hit() {
            self.hits += 1;
        }
        if report.outcome == ShotOutcome::Killed {
            self.kills += 1;
        }
        if report.repeat {
            self.repeats += 1;
        }
    }

    /// Hit percentage, integer division; 100 before any shot
    pub fn accuracy(&self) -> u32 {
        accuracy(self.hits, self.shots)
    }

    pub fn merge(&mut self, other: &RobotStats) {
        self.shots += other.shots;
        self.hits += other.hits;
        self.kills += other.kills;
        self.repeats += other.repeats;
    }
}

fn accuracy(hits: u32, shots: u32) -> u32 {
    if shots == 0 {
        100
    } else {
        (u64::from(hits) * 100 / u64::from(shots)) as u32
    }
}

/// How a round ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEnd {
    FleetDestroyed,
    /// A robot handed in illegal fleets or panicked
    Disqualified,
    /// The turn cap ran out
    TurnLimit,
    /// Stopped from outside
    Aborted,
}

impl From<FinishReason> for RoundEnd {
    fn from(reason: FinishReason) -> Self {
        match reason {
            FinishReason::FleetDestroyed => RoundEnd::FleetDestroyed,
            FinishReason::Disqualified => RoundEnd::Disqualified,
            FinishReason::Aborted => RoundEnd::Aborted,
        }
    }
}

/// Result of one round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub index: usize,
    pub config: FieldConfiguration,
    pub first_shooter: Side,
    /// `None` for aborted or turn-limited rounds
    pub winner: Option<Side>,
    pub end: RoundEnd,
    pub turns: u32,
    /// Indexed by side: left, then right
    pub stats: [RobotStats; 2],
}

impl RoundResult {
    pub fn stats_for(&self, side: Side) -> &RobotStats {
        &self.stats[side.index()]
    }
}

/// Totals for one robot across a tournament
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotSummary {
    pub name: String,
    pub wins: u32,
    pub shots: u32,
    pub hits: u32,
    pub kills: u32,
    pub accuracy: u32,
}

impl RobotSummary {
    fn collect(name: &str, side: Side, rounds: &[RoundResult]) -> Self {
        let mut totals = RobotStats::default();
        for round in rounds {
            totals.merge(round.stats_for(side));
        }
        Self {
            name: name.to_string(),
            wins: rounds.iter().filter(|r| r.winner == Some(side)).count() as u32,
            shots: totals.shots,
            hits: totals.hits,
            kills: totals.kills,
            accuracy: totals.accuracy(),
        }
    }
}

/// Final report of a tournament
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentReport {
    pub left: RobotSummary,
    pub right: RobotSummary,
    /// Rounds without a winner
    pub undecided: u32,
    pub rounds: Vec<RoundResult>,
}

impl TournamentReport {
    pub fn new(left_name: &str, right_name: &str, rounds: &[RoundResult]) -> Self {
        Self {
            left: RobotSummary::collect(left_name, Side::Left, rounds),
            right: RobotSummary::collect(right_name, Side::Right, rounds),
            undecided: rounds.iter().filter(|r| r.winner.is_none()).count() as u32,
            rounds: rounds.to_vec(),
        }
    }

    pub fn summary(&self, side: Side) -> &RobotSummary {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Side with more round wins, `None` on a tie
    pub fn leader(&self) -> Option<Side> {
        match self.left.wins.cmp(&self.right.wins) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Human-readable table
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n=== Tournament Results ===");
        let _ = writeln!(out, "Rounds played: {}", self.rounds.len());
        for round in &self.rounds {
            let winner = match round.winner {
                Some(side) => self.summary(side).name.as_str(),
                None => "nobody",
            };
            let _ = writeln!(
                out,
                "  Round {}: {} ({}, {} first) -> {} [{:?}, {} turns]",
                round.index + 1,
                round.config,
                round.first_shooter,
                self.summary(round.first_shooter).name,
                winner,
                round.end,
                round.turns
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<12} {:>5} {:>7} {:>6} {:>6} {:>9}",
            "Robot", "Wins", "Shots", "Hits", "Kills", "Accuracy"
        );
        for summary in [&self.left, &self.right] {
            let _ = writeln!(
                out,
                "{:<12} {:>5} {:>7} {:>6} {:>6} {:>8}%",
                summary.name, summary.wins, summary.shots, summary.hits, summary.kills, summary.accuracy
            );
        }
        if self.undecided > 0 {
            let _ = writeln!(out, "Undecided rounds: {}", self.undecided);
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
