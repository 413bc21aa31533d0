//! Random-fire robot

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::field::FieldConfiguration;
use crate::geometry::{Point, Rect, Size};
use crate::strategy::Strategy;

use super::random_fleet;

/// Fires at uniformly random cells it has not tried before
pub struct RandomStrategy {
    rng: ChaCha8Rng,
    config: FieldConfiguration,
    untried: Vec<Point>,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            config: FieldConfiguration::new(Rect::new(0, 0, 0, 0), 0, Vec::new()),
            untried: Vec::new(),
        }
    }

    fn reset_enemy_field(&mut self) {
        self.untried = self.config.field.cells().collect();
        self.untried.shuffle(&mut self.rng);
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "Teapot"
    }

    fn greeting_message(&self) -> &str {
        "Fortune favours the kettle"
    }

    fn win_message(&self) -> &str {
        "Boiled over, in a good way"
    }

    fn lose_message(&self) -> &str {
        "Just a little steam this time"
    }

    fn define_field(&mut self, rect: Rect) {
        self.config.field = rect;
        self.reset_enemy_field();
    }

    fn define_ship_count(&mut self, count: usize) {
        self.config.ship_count = count;
    }

    fn define_allowed_ship_sizes(&mut self, sizes: &[Size]) {
        self.config.allowed_ship_sizes = sizes.to_vec();
    }

    fn ship_placements(&mut self) -> Vec<Rect> {
        random_fleet(&mut self.rng, &self.config)
    }

    fn next_shooting_position(&mut self) -> Point {
        // Out of untried cells only happens once the enemy is already gone
        self.untried.pop().unwrap_or_else(|| self.config.field.origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_never_repeats_a_cell() {
        let mut robot = RandomStrategy::with_seed(3);
        robot.define_field(Rect::new(0, 0, 5, 4));
        let shots: FxHashSet<Point> = (0..20).map(|_| robot.next_shooting_position()).collect();
        assert_eq!(shots.len(), 20);
        assert!(shots.iter().all(|p| Rect::new(0, 0, 5, 4).contains_point(*p)));
    }

    #[test]
    fn test_new_field_resets_model() {
        let mut robot = RandomStrategy::with_seed(3);
        robot.define_field(Rect::new(0, 0, 2, 2));
        for _ in 0..4 {
            robot.next_shooting_position();
        }
        robot.define_field(Rect::new(0, 0, 2, 2));
        let shots: FxHashSet<Point> = (0..4).map(|_| robot.next_shooting_position()).collect();
        assert_eq!(shots.len(), 4);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = RandomStrategy::with_seed(11);
        let mut b = RandomStrategy::with_seed(11);
        a.define_field(Rect::new(0, 0, 10, 10));
        b.define_field(Rect::new(0, 0, 10, 10));
        for _ in 0..10 {
            assert_eq!(a.next_shooting_position(), b.next_shooting_position());
        }
    }
}
