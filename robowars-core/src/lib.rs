//! ROBOWARS Core - Battleship duel engine
//!
//! This crate provides the rules of a two-robot Battleship duel:
//! - Field geometry (half-open integer rectangles)
//! - Field configurations and the named presets
//! - Fleet placement validation with one-cell spacing
//! - Ship damage tracking and shot resolution
//! - The duel state machine and its observer events
//! - The robot contract plus a few reference robots

pub mod geometry;
pub mod ship;
pub mod field;
pub mod validator;
pub mod strategy;
pub mod strategies;
pub mod observer;
pub mod duel;

// Re-exports for convenient access
pub use geometry::{Point, Rect, Size};
pub use ship::{Fleet, Ship, ShotOutcome};
pub use field::{ConfigError, FieldConfiguration, Preset};
pub use validator::{validate_fleet, PlacementError};
pub use strategy::Strategy;
pub use strategies::{random_fleet, HunterStrategy, RandomStrategy, ScriptedStrategy, SearchMode, StrategyKind};
pub use observer::{DuelEvent, DuelObserver, EventRecorder};
pub use duel::{Duel, DuelError, DuelOutcome, DuelState, FinishReason, Side, StrategyPhase, TurnReport};
