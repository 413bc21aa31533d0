//! Ships, fleets and hit resolution

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Result of resolving one shot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotOutcome {
    Missed,
    Damaged,
    Killed,
}

impl ShotOutcome {
    pub fn is_hit(self) -> bool {
        !matches!(self, ShotOutcome::Missed)
    }
}

/// A ship with a fixed footprint and per-cell life
#[derive(Clone, Debug)]
pub struct Ship {
    footprint: Rect,
    remaining: FxHashSet<Point>,
}

impl Ship {
    pub fn new(footprint: Rect) -> Self {
        Self {
            footprint,
            remaining: footprint.cells().collect(),
        }
    }

    pub fn footprint(&self) -> Rect {
        self.footprint
    }

    /// Cells not yet hit
    pub fn remaining_cells(&self) -> &FxHashSet<Point> {
        &self.remaining
    }

    pub fn is_alive(&self) -> bool {
        !self.remaining.is_empty()
    }

    /// Apply a shot at `at`.
    ///
    /// A shot at a ship that was already sunk is a miss, so the shooter
    /// loses the turn instead of farming kills on a wreck.
    pub fn resolve_shot(&mut self, at: Point) -> ShotOutcome {
        if !self.footprint.contains_point(at) || !self.is_alive() {
            return ShotOutcome::Missed;
        }
        self.remaining.remove(&at);
        if self.remaining.is_empty() {
            ShotOutcome::Killed
        } else {
            ShotOutcome::Damaged
        }
    }
}

/// Ordered ships of one participant; membership is fixed after placement
#[derive(Clone, Debug, Default)]
pub struct Fleet {
    ships: Vec<Ship>,
}

impl Fleet {
    pub fn from_placements(placements: &[Rect]) -> Self {
        Self {
            ships: placements.iter().copied().map(Ship::new).collect(),
        }
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn alive_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|s| s.is_alive())
    }

    pub fn is_destroyed(&self) -> bool {
        self.alive_ships().next().is_none()
    }

    /// Total cells across every ship
    pub fn total_cells(&self) -> usize {
        self.ships.iter().map(|s| s.footprint().area() as usize).sum()
    }

    pub fn remaining_cells(&self) -> usize {
        self.ships.iter().map(|s| s.remaining_cells().len()).sum()
    }

    /// Resolve against the first ship whose footprint contains `at`
    pub fn resolve_shot(&mut self, at: Point) -> ShotOutcome {
        self.ships
            .iter_mut()
            .find(|s| s.footprint().contains_point(at))
            .map(|s| s.resolve_shot(at))
            .unwrap_or(ShotOutcome::Missed)
    }

    /// Whether a shot at `at` would land on an already-resolved cell
    pub fn is_resolved_cell(&self, at: Point) -> bool {
        self.ships
            .iter()
            .find(|s| s.footprint().contains_point(at))
            .map(|s| !s.remaining_cells().contains(&at))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_life_accounting() {
        let mut ship = Ship::new(Rect::new(2, 3, 3, 2));
        assert_eq!(ship.remaining_cells().len(), 6);

        let mut cells: Vec<_> = ship.footprint().cells().collect();
        cells.reverse();
        let outcomes: Vec<_> = cells.into_iter().map(|c| ship.resolve_shot(c)).collect();

        let killed = outcomes.iter().filter(|&&o| o == ShotOutcome::Killed).count();
        let damaged = outcomes.iter().filter(|&&o| o == ShotOutcome::Damaged).count();
        assert_eq!(killed, 1);
        assert_eq!(damaged, 5);
        assert_eq!(outcomes.last(), Some(&ShotOutcome::Killed));
        assert!(!ship.is_alive());
    }

    #[test]
    fn test_shot_outside_footprint_misses() {
        let mut ship = Ship::new(Rect::new(0, 0, 2, 1));
        assert_eq!(ship.resolve_shot(Point::new(2, 0)), ShotOutcome::Missed);
        assert_eq!(ship.remaining_cells().len(), 2);
    }

    #[test]
    fn test_repeat_hit_on_live_ship_is_damage() {
        let mut ship = Ship::new(Rect::new(0, 0, 2, 1));
        assert_eq!(ship.resolve_shot(Point::new(0, 0)), ShotOutcome::Damaged);
        assert_eq!(ship.resolve_shot(Point::new(0, 0)), ShotOutcome::Damaged);
        assert_eq!(ship.remaining_cells().len(), 1);
    }

    #[test]
    fn test_shot_at_wreck_misses() {
        let mut ship = Ship::new(Rect::new(0, 0, 1, 1));
        assert_eq!(ship.resolve_shot(Point::new(0, 0)), ShotOutcome::Killed);
        assert_eq!(ship.resolve_shot(Point::new(0, 0)), ShotOutcome::Missed);
    }

    #[test]
    fn test_fleet_destruction() {
        let mut fleet = Fleet::from_placements(&[Rect::new(0, 0, 1, 1), Rect::new(2, 0, 1, 2)]);
        assert_eq!(fleet.total_cells(), 3);
        assert!(!fleet.is_destroyed());

        assert_eq!(fleet.resolve_shot(Point::new(0, 0)), ShotOutcome::Killed);
        assert_eq!(fleet.alive_ships().count(), 1);
        assert_eq!(fleet.resolve_shot(Point::new(1, 0)), ShotOutcome::Missed);
        assert_eq!(fleet.resolve_shot(Point::new(2, 0)), ShotOutcome::Damaged);
        assert!(fleet.is_resolved_cell(Point::new(2, 0)));
        assert!(!fleet.is_resolved_cell(Point::new(2, 1)));
        assert_eq!(fleet.resolve_shot(Point::new(2, 1)), ShotOutcome::Killed);

        assert!(fleet.is_destroyed());
        assert_eq!(fleet.ships().len(), 2);
        assert_eq!(fleet.remaining_cells(), 0);
    }
}
