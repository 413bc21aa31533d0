//! Paced tournament runner
//!
//! Drives a tournament one step per interval tick. Each step completes before
//! the next tick is awaited, so the engine is never entered re-entrantly.
//! Ctrl-C aborts the current duel and stops the schedule.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::MissedTickBehavior;

use robowars_core::{DuelObserver, DuelState, Point, Side};
use robowars_tournament::{Tournament, TournamentState};

/// Logs live duel events as they are dispatched
#[derive(Default)]
pub struct ConsoleObserver {
    names: [String; 2],
}

impl DuelObserver for ConsoleObserver {
    fn on_participant_named(&mut self, name: &str, side: Side) {
        self.names[side.index()] = name.to_string();
    }

    fn on_participant_message(&mut self, text: &str, side: Side) {
        tracing::info!("{} says: {}", self.names[side.index()], text);
    }

    fn on_shot_resolved(&mut self, position: Point, side: Side, is_hit: bool) {
        let shooter = &self.names[side.opponent().index()];
        tracing::info!("{} fires at {}: {}", shooter, position, if is_hit { "hit" } else { "miss" });
    }

    fn on_state_changed(&mut self, state: DuelState) {
        tracing::debug!("Duel state: {:?}", state);
    }

    fn on_duel_finished(&mut self, winner_name: &str, winner_side: Side) {
        tracing::info!("{} ({}) wins the round", winner_name, winner_side);
    }
}

/// Run the tournament at one step per `interval`.
///
/// Returns true when interrupted by Ctrl-C.
pub async fn run_paced(tournament: &mut Tournament, interval: Duration) -> Result<bool> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while tournament.state() == TournamentState::Running {
        tokio::select! {
            _ = ticker.tick() => {
                if !tournament.step() {
                    break;
                }
            }
            signal = &mut ctrl_c => {
                signal.context("Failed to listen for Ctrl-C")?;
                tracing::warn!("Interrupted, aborting round {}", tournament.current_round() + 1);
                if tournament.reset() {
                    // Record the aborted round
                    tournament.advance();
                }
                return Ok(true);
            }
        }
    }

    Ok(false)
}
