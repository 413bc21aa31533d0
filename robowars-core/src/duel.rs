//! Duel engine - one match between two robots
//!
//! State machine:
//!
//! ```text
//! NotReady --prepare--> Ready --start--> InProgress <--pause/resume--> Paused
//!                                             |
//!                         Finished <----------+ (fleet destroyed / stop)
//!                         Finished --reset--> Ready
//! ```
//!
//! The engine never schedules itself: the host calls [`Duel::tick`] once per
//! turn at whatever pace it likes. Calls made in the wrong state are ignored.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::FieldConfiguration;
use crate::geometry::Point;
use crate::observer::{DuelEvent, DuelObserver};
use crate::ship::{Fleet, ShotOutcome};
use crate::strategy::Strategy;
use crate::validator::{validate_fleet, PlacementError};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Side of the battlefield a participant owns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Position in per-side arrays: left 0, right 1
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Engine lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelState {
    NotReady,
    Ready,
    InProgress,
    Finished,
    Paused,
}

/// How a finished duel ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The loser's last ship was sunk
    FleetDestroyed,
    /// The loser's robot failed during play
    Disqualified,
    /// Stopped from outside before a fleet was destroyed
    Aborted,
}

/// Terminal result of a duel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelOutcome {
    /// `None` when aborted
    pub winner: Option<Side>,
    pub reason: FinishReason,
    pub turns: u32,
}

/// Robot call that failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPhase {
    Placement,
    Shooting,
    Notification,
    GameOver,
}

impl fmt::Display for StrategyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StrategyPhase::Placement => "ship placement",
            StrategyPhase::Shooting => "target selection",
            StrategyPhase::Notification => "shot notification",
            StrategyPhase::GameOver => "game over",
        };
        f.write_str(text)
    }
}

/// Attributable duel failure
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DuelError {
    #[error("robot {strategy} ({side}) placed an illegal fleet: {source}")]
    Placement {
        side: Side,
        strategy: String,
        source: PlacementError,
    },
    #[error("robot {strategy} ({side}) panicked during {phase}")]
    StrategyFault {
        side: Side,
        strategy: String,
        phase: StrategyPhase,
    },
}

impl DuelError {
    /// Side whose robot caused the failure
    pub fn side(&self) -> Side {
        match self {
            DuelError::Placement { side, .. } | DuelError::StrategyFault { side, .. } => *side,
        }
    }
}

/// What happened during one turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Who fired; statistics belong to this side
    pub shooter: Side,
    pub position: Point,
    pub outcome: ShotOutcome,
    /// False when the shot left the field and forfeited the turn
    pub in_field: bool,
    /// The cell had already been resolved by an earlier shot
    pub repeat: bool,
    /// This shot ended the duel
    pub finished: bool,
}

// ============================================================================
// PARTICIPANT
// ============================================================================

/// A robot seated on one side, with its fleet once placed
pub struct Participant {
    side: Side,
    strategy: Box<dyn Strategy>,
    fleet: Option<Fleet>,
}

impl Participant {
    fn new(side: Side, strategy: Box<dyn Strategy>) -> Self {
        Self {
            side,
            strategy,
            fleet: None,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn name(&self) -> &str {
        self.strategy.name()
    }

    /// Placed fleet; `None` before a successful placement
    pub fn fleet(&self) -> Option<&Fleet> {
        self.fleet.as_ref()
    }

    /// Run a robot callback, turning a panic into a fault for this side
    fn call<T>(
        &mut self,
        phase: StrategyPhase,
        f: impl FnOnce(&mut dyn Strategy) -> T,
    ) -> Result<T, DuelError> {
        let strategy = self.strategy.as_mut();
        panic::catch_unwind(AssertUnwindSafe(|| f(strategy))).map_err(|_| DuelError::StrategyFault {
            side: self.side,
            strategy: self.strategy.name().to_string(),
            phase,
        })
    }
}

// ============================================================================
// DUEL
// ============================================================================

pub struct Duel {
    config: FieldConfiguration,
    participants: [Participant; 2],
    first_shooter: Side,
    shooter: Side,
    state: DuelState,
    outcome: Option<DuelOutcome>,
    turns: u32,
    pending: Vec<DuelEvent>,
    observers: Vec<Box<dyn DuelObserver>>,
}

impl Duel {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New duel in `NotReady`; left shoots first unless changed
    pub fn new(left: Box<dyn Strategy>, right: Box<dyn Strategy>, config: FieldConfiguration) -> Self {
        Self {
            config,
            participants: [Participant::new(Side::Left, left), Participant::new(Side::Right, right)],
            first_shooter: Side::Left,
            shooter: Side::Left,
            state: DuelState::NotReady,
            outcome: None,
            turns: 0,
            pending: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn with_first_shooter(mut self, side: Side) -> Self {
        self.first_shooter = side;
        self.shooter = side;
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn DuelObserver>) {
        self.observers.push(observer);
    }

    /// Detach every observer
    pub fn take_observers(&mut self) -> Vec<Box<dyn DuelObserver>> {
        std::mem::take(&mut self.observers)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn state(&self) -> DuelState {
        self.state
    }

    pub fn config(&self) -> &FieldConfiguration {
        &self.config
    }

    pub fn first_shooter(&self) -> Side {
        self.first_shooter
    }

    /// Side whose turn it is, while a game is set up or running
    pub fn shooter(&self) -> Option<Side> {
        match self.state {
            DuelState::Ready | DuelState::InProgress | DuelState::Paused => Some(self.shooter),
            DuelState::NotReady | DuelState::Finished => None,
        }
    }

    pub fn participant(&self, side: Side) -> &Participant {
        &self.participants[side.index()]
    }

    pub fn outcome(&self) -> Option<DuelOutcome> {
        self.outcome
    }

    /// Turns played since the last placement
    pub fn turns(&self) -> u32 {
        self.turns
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Install a new configuration and first shooter; returns to `NotReady`.
    /// Ignored while a game is running or paused.
    pub fn reconfigure(&mut self, config: FieldConfiguration, first_shooter: Side) -> bool {
        if matches!(self.state, DuelState::InProgress | DuelState::Paused) {
            return false;
        }
        self.config = config;
        self.first_shooter = first_shooter;
        self.shooter = first_shooter;
        self.clear_game();
        self.set_state(DuelState::NotReady);
        self.flush();
        true
    }

    /// Ask both robots for fleets and validate them.
    ///
    /// Legal from `NotReady` and `Finished`. On success the duel is `Ready`;
    /// on failure it stays `NotReady` and the offending side is reported.
    /// Returns `Ok(false)` when called in any other state.
    pub fn prepare(&mut self) -> Result<bool, DuelError> {
        if !matches!(self.state, DuelState::NotReady | DuelState::Finished) {
            return Ok(false);
        }

        self.clear_game();
        for side in Side::ALL {
            if let Err(err) = self.place_fleet(side) {
                tracing::warn!("Placement failed: {}", err);
                if let DuelError::Placement { source, strategy, .. } = &err {
                    self.pending.push(DuelEvent::PlacementRejected {
                        error: *source,
                        strategy_name: strategy.clone(),
                    });
                }
                self.set_state(DuelState::NotReady);
                self.flush();
                return Err(err);
            }
        }

        self.shooter = self.first_shooter;
        self.set_state(DuelState::Ready);
        tracing::debug!(
            "Duel ready: {} vs {} ({})",
            self.participant(Side::Left).name(),
            self.participant(Side::Right).name(),
            self.config
        );
        self.flush();
        Ok(true)
    }

    /// Begin the turn loop; only legal from `Ready`
    pub fn start_game(&mut self) -> bool {
        if self.state != DuelState::Ready {
            return false;
        }
        self.shooter = self.first_shooter;
        self.set_state(DuelState::InProgress);
        tracing::info!(
            "Duel started: {} vs {}, {} shoots first",
            self.participant(Side::Left).name(),
            self.participant(Side::Right).name(),
            self.first_shooter
        );
        self.flush();
        true
    }

    pub fn pause_game(&mut self) -> bool {
        self.toggle(DuelState::InProgress, DuelState::Paused)
    }

    pub fn resume_game(&mut self) -> bool {
        self.toggle(DuelState::Paused, DuelState::InProgress)
    }

    /// Force `Finished` with no winner from `Ready`, `InProgress` or `Paused`
    pub fn stop_game(&mut self) -> bool {
        if !matches!(self.state, DuelState::Ready | DuelState::InProgress | DuelState::Paused) {
            return false;
        }
        tracing::info!("Duel stopped after {} turns", self.turns);
        self.finish(None, FinishReason::Aborted);
        self.flush();
        true
    }

    /// Re-run placement for both robots after a finished duel
    pub fn reset_game(&mut self) -> Result<bool, DuelError> {
        if self.state != DuelState::Finished {
            return Ok(false);
        }
        self.prepare()
    }

    // ========================================================================
    // TURN
    // ========================================================================

    /// Play exactly one turn; `None` when no game is running or a robot
    /// failed before its shot resolved
    pub fn tick(&mut self) -> Option<TurnReport> {
        if self.state != DuelState::InProgress {
            return None;
        }

        let report = match self.play_turn() {
            Ok(report) => Some(report),
            Err(fault) => {
                self.disqualify(fault);
                None
            }
        };
        self.flush();
        report
    }

    fn play_turn(&mut self) -> Result<TurnReport, DuelError> {
        let shooter = self.shooter;
        let receiver = shooter.opponent();
        self.turns += 1;

        let position = self.participants[shooter.index()]
            .call(StrategyPhase::Shooting, |s| s.next_shooting_position())?;

        if !self.config.field.contains_point(position) {
            tracing::trace!("{} fired outside the field at {}", shooter, position);
            self.participants[shooter.index()].call(StrategyPhase::Notification, |s| {
                s.did_handle_shoot(position, ShotOutcome::Missed)
            })?;
            self.shooter = receiver;
            return Ok(TurnReport {
                shooter,
                position,
                outcome: ShotOutcome::Missed,
                in_field: false,
                repeat: false,
                finished: false,
            });
        }

        self.participants[receiver.index()]
            .call(StrategyPhase::Notification, |s| s.enemy_did_shoot(position))?;

        let (outcome, repeat, destroyed) = match self.participants[receiver.index()].fleet.as_mut() {
            Some(fleet) => {
                let repeat = fleet.is_resolved_cell(position);
                let outcome = fleet.resolve_shot(position);
                (outcome, repeat, fleet.is_destroyed())
            }
            None => (ShotOutcome::Missed, false, false),
        };

        self.participants[shooter.index()]
            .call(StrategyPhase::Notification, |s| s.did_handle_shoot(position, outcome))?;

        tracing::trace!("{} fired at {}: {:?}", shooter, position, outcome);
        self.pending.push(DuelEvent::ShotResolved {
            position,
            side: receiver,
            is_hit: outcome.is_hit(),
        });

        if destroyed {
            self.finish(Some(shooter), FinishReason::FleetDestroyed);
        } else if outcome == ShotOutcome::Missed {
            self.shooter = receiver;
        }

        Ok(TurnReport {
            shooter,
            position,
            outcome,
            in_field: true,
            repeat,
            finished: destroyed,
        })
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn place_fleet(&mut self, side: Side) -> Result<(), DuelError> {
        let config = &self.config;
        let participant = &mut self.participants[side.index()];

        let placements = participant.call(StrategyPhase::Placement, |s| {
            s.define_field(config.field);
            s.define_ship_count(config.ship_count);
            s.define_allowed_ship_sizes(&config.allowed_ship_sizes);
            s.ship_placements()
        })?;

        self.pending.push(DuelEvent::ParticipantNamed {
            side,
            name: participant.name().to_string(),
        });
        self.pending.push(DuelEvent::ParticipantMessage {
            side,
            text: participant.strategy.greeting_message().to_string(),
        });

        validate_fleet(&placements, config).map_err(|source| DuelError::Placement {
            side,
            strategy: participant.name().to_string(),
            source,
        })?;

        participant.fleet = Some(Fleet::from_placements(&placements));
        self.pending.push(DuelEvent::ShipsPlaced { side, placements });
        Ok(())
    }

    fn finish(&mut self, winner: Option<Side>, reason: FinishReason) {
        if let Some(winner) = winner {
            for side in Side::ALL {
                let strategy = &self.participants[side.index()].strategy;
                let text = if side == winner {
                    strategy.win_message()
                } else {
                    strategy.lose_message()
                };
                self.pending.push(DuelEvent::ParticipantMessage {
                    side,
                    text: text.to_string(),
                });
            }
        }

        for participant in &mut self.participants {
            if let Err(err) = participant.call(StrategyPhase::GameOver, |s| s.on_game_over()) {
                tracing::warn!("{}", err);
            }
        }

        self.outcome = Some(DuelOutcome {
            winner,
            reason,
            turns: self.turns,
        });
        self.set_state(DuelState::Finished);

        if let Some(winner) = winner {
            let winner_name = self.participant(winner).name().to_string();
            tracing::info!(
                "Duel finished after {} turns: {} ({}) wins, {:?}",
                self.turns,
                winner_name,
                winner,
                reason
            );
            self.pending.push(DuelEvent::DuelFinished {
                winner_name,
                winner_side: winner,
            });
        }
    }

    fn disqualify(&mut self, fault: DuelError) {
        tracing::warn!("Disqualified: {}", fault);
        self.finish(Some(fault.side().opponent()), FinishReason::Disqualified);
    }

    fn toggle(&mut self, from: DuelState, to: DuelState) -> bool {
        if self.state != from {
            return false;
        }
        self.set_state(to);
        self.flush();
        true
    }

    fn clear_game(&mut self) {
        for participant in &mut self.participants {
            participant.fleet = None;
        }
        self.outcome = None;
        self.turns = 0;
    }

    fn set_state(&mut self, state: DuelState) {
        if self.state != state {
            self.state = state;
            self.pending.push(DuelEvent::StateChanged { state });
        }
    }

    /// Deliver queued events in order
    fn flush(&mut self) {
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            for observer in &mut self.observers {
                event.dispatch(observer.as_mut());
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
