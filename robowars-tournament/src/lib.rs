//! ROBOWARS Tournament - Rounds, statistics and series play
//!
//! This crate provides tournament infrastructure on top of the duel engine:
//! - Multi-round tournaments with alternating first shooter
//! - Placement failure policy and per-round turn cap
//! - Per-robot shot statistics and reports
//! - Independent tournament series, optionally in parallel
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_series, Tournament::run_to_completion (orchestration)
//! - Level 2: Tournament::advance / tick / reset (phases)
//! - Level 3: round setup and recording, stat tallying (steps)
//! - Level 4: configuration, plans, report rendering

mod config;
mod series;
mod stats;
mod tournament;

pub use config::{PlacementPolicy, RoundSpec, TournamentConfig, TournamentPlan};
pub use series::{run_series, SeriesResult};
pub use stats::{RobotStats, RobotSummary, RoundEnd, RoundResult, TournamentReport};
pub use tournament::{first_shooter_for, Tournament, TournamentState};
