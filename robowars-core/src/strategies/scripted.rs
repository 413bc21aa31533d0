//! Scripted robot with a fixed fleet and shot list

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::geometry::{Point, Rect, Size};
use crate::ship::ShotOutcome;
use crate::strategy::Strategy;

/// Callback received by a scripted robot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyCall {
    EnemyShot(Point),
    Handled(Point, ShotOutcome),
    GameOver,
}

/// Plays a fixed script; once the script runs out it fires outside the
/// field, forfeiting every turn
pub struct ScriptedStrategy {
    name: String,
    placements: Vec<Rect>,
    script: Vec<Point>,
    remaining: VecDeque<Point>,
    field: Rect,
    calls: Arc<Mutex<Vec<StrategyCall>>>,
}

impl ScriptedStrategy {
    pub fn new(name: impl Into<String>, placements: Vec<Rect>, script: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            placements,
            remaining: script.iter().copied().collect(),
            script,
            field: Rect::new(0, 0, 0, 0),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the callbacks this robot has received
    pub fn calls(&self) -> Arc<Mutex<Vec<StrategyCall>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: StrategyCall) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }
}

impl Strategy for ScriptedStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn define_field(&mut self, rect: Rect) {
        self.field = rect;
        self.remaining = self.script.iter().copied().collect();
    }

    fn define_ship_count(&mut self, _count: usize) {}

    fn define_allowed_ship_sizes(&mut self, _sizes: &[Size]) {}

    fn ship_placements(&mut self) -> Vec<Rect> {
        self.placements.clone()
    }

    fn enemy_did_shoot(&mut self, at: Point) {
        self.record(StrategyCall::EnemyShot(at));
    }

    fn next_shooting_position(&mut self) -> Point {
        self.remaining
            .pop_front()
            .unwrap_or_else(|| Point::new(self.field.min_x().saturating_sub(1), self.field.min_y().saturating_sub(1)))
    }

    fn did_handle_shoot(&mut self, at: Point, outcome: ShotOutcome) {
        self.record(StrategyCall::Handled(at, outcome));
    }

    fn on_game_over(&mut self) {
        self.record(StrategyCall::GameOver);
    }
}
