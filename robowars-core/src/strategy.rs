//! The robot capability - what a pluggable strategy must provide
//!
//! A duel drives a strategy through a fixed sequence:
//! 1. `define_field`, `define_ship_count`, `define_allowed_ship_sizes`
//! 2. `ship_placements` (once; the duel never retries)
//! 3. per turn: `next_shooting_position` / `did_handle_shoot` on the shooter,
//!    `enemy_did_shoot` on the receiver
//! 4. `on_game_over` (exactly once)
//!
//! A new configuration push means a new duel: strategies reset any model of
//! the enemy field there.

use crate::geometry::{Point, Rect, Size};
use crate::ship::ShotOutcome;

pub trait Strategy: Send {
    /// Robot's display name
    fn name(&self) -> &str;

    /// Printed when the duel is set up
    fn greeting_message(&self) -> &str {
        "Ready."
    }

    /// Printed if this robot wins
    fn win_message(&self) -> &str {
        "Victory."
    }

    /// Printed if this robot loses
    fn lose_message(&self) -> &str {
        "Defeat."
    }

    fn define_field(&mut self, rect: Rect);

    fn define_ship_count(&mut self, count: usize);

    fn define_allowed_ship_sizes(&mut self, sizes: &[Size]);

    /// Fleet footprints for the configured field
    fn ship_placements(&mut self) -> Vec<Rect>;

    /// The opponent fired at this robot's field
    fn enemy_did_shoot(&mut self, _at: Point) {}

    /// Where to fire next; out-of-field positions forfeit the turn
    fn next_shooting_position(&mut self) -> Point;

    /// Result of this robot's own shot
    fn did_handle_shoot(&mut self, _at: Point, _outcome: ShotOutcome) {}

    fn on_game_over(&mut self) {}
}
