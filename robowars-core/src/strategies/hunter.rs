//! Hunt-pattern robot
//!
//! Keeps a shadow grid of the enemy field. Searches until a shot damages a
//! ship, then tracks that ship: every allowed ship size large enough to cover
//! the hits so far is slid around them, and the first placement that only
//! covers unknown or hit cells gives the next target. Once the ship dies its
//! surroundings are excluded, since ships never touch.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::field::FieldConfiguration;
use crate::geometry::{Point, Rect, Size};
use crate::ship::ShotOutcome;
use crate::strategy::Strategy;

use super::random_fleet;

/// Knowledge about one enemy cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Unknown,
    Miss,
    Hit,
    Killed,
    /// Next to a sunk ship, so cannot hold another one
    Excluded,
}

/// How to pick targets while no damaged ship is tracked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Uniform over unknown cells
    Random,
    /// Stride through the field at the smallest ship dimensions
    Sweep,
}

/// Shadow copy of the enemy field
#[derive(Clone, Debug)]
struct ShadowGrid {
    area: Rect,
    cells: Vec<Cell>,
}

impl ShadowGrid {
    fn new(area: Rect) -> Self {
        Self {
            area,
            cells: vec![Cell::Unknown; area.area() as usize],
        }
    }

    fn index(&self, p: Point) -> Option<usize> {
        if !self.area.contains_point(p) {
            return None;
        }
        let dx = (p.x - self.area.min_x()) as usize;
        let dy = (p.y - self.area.min_y()) as usize;
        Some(dy * self.area.width as usize + dx)
    }

    fn get(&self, p: Point) -> Option<Cell> {
        self.index(p).map(|i| self.cells[i])
    }

    fn set(&mut self, p: Point, cell: Cell) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cell;
        }
    }

    fn is_unknown(&self, p: Point) -> bool {
        self.get(p) == Some(Cell::Unknown)
    }

    fn unknown_cells(&self) -> Vec<Point> {
        self.area.cells().filter(|p| self.is_unknown(*p)).collect()
    }

    /// Could an unsunk ship occupy every cell of `location`
    fn can_host(&self, location: &Rect) -> bool {
        location
            .cells()
            .all(|p| matches!(self.get(p), Some(Cell::Unknown) | Some(Cell::Hit)))
    }

    /// Hit cells 4-connected to `start`; ships never touch, so this is one wreck
    fn connected_hits(&self, start: Point) -> Vec<Point> {
        let mut wreck = vec![start];
        let mut frontier = vec![start];
        while let Some(p) = frontier.pop() {
            for next in [
                Point::new(p.x + 1, p.y),
                Point::new(p.x - 1, p.y),
                Point::new(p.x, p.y + 1),
                Point::new(p.x, p.y - 1),
            ] {
                if self.get(next) == Some(Cell::Hit) && !wreck.contains(&next) {
                    wreck.push(next);
                    frontier.push(next);
                }
            }
        }
        wreck
    }

    fn mark_sunk(&mut self, hits: &[Point]) {
        for hit in hits {
            self.set(*hit, Cell::Killed);
        }
        for hit in hits {
            for around in hit.neighborhood() {
                if self.is_unknown(around) {
                    self.set(around, Cell::Excluded);
                }
            }
        }
    }
}

/// Robot that hunts damaged ships down
pub struct HunterStrategy {
    mode: SearchMode,
    rng: ChaCha8Rng,
    config: FieldConfiguration,
    grid: ShadowGrid,
    /// Hits on the ship currently being tracked
    target: Vec<Point>,
    sweep_cursor: Option<Point>,
}

impl HunterStrategy {
    pub fn new(mode: SearchMode) -> Self {
        Self::with_seed(mode, 42)
    }

    pub fn with_seed(mode: SearchMode, seed: u64) -> Self {
        let empty = Rect::new(0, 0, 0, 0);
        Self {
            mode,
            rng: ChaCha8Rng::seed_from_u64(seed),
            config: FieldConfiguration::new(empty, 0, Vec::new()),
            grid: ShadowGrid::new(empty),
            target: Vec::new(),
            sweep_cursor: None,
        }
    }

    /// Current knowledge about an enemy cell
    pub fn cell(&self, p: Point) -> Option<Cell> {
        self.grid.get(p)
    }

    /// Whether a damaged ship is being tracked
    pub fn is_tracking(&self) -> bool {
        !self.target.is_empty()
    }

    fn reset_enemy_field(&mut self) {
        self.grid = ShadowGrid::new(self.config.field);
        self.target.clear();
        self.sweep_cursor = None;
    }

    // ========================================================================
    // TRACKING
    // ========================================================================

    fn track_target(&self) -> Option<Point> {
        let bounds = Rect::bounding(&self.target)?;

        for size in &self.config.allowed_ship_sizes {
            if size.width < bounds.width || size.height < bounds.height {
                continue;
            }
            for dx in 0..=(size.width - bounds.width) {
                for dy in 0..=(size.height - bounds.height) {
                    let candidate = Rect::new(bounds.x - dx, bounds.y - dy, size.width, size.height);
                    if !self.grid.can_host(&candidate) {
                        continue;
                    }
                    if let Some(open) = candidate.cells().find(|p| self.grid.is_unknown(*p)) {
                        return Some(open);
                    }
                }
            }
        }

        None
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    fn search(&mut self) -> Point {
        let found = match self.mode {
            SearchMode::Random => None,
            SearchMode::Sweep => self.next_sweep_position(),
        };
        found
            .or_else(|| self.grid.unknown_cells().choose(&mut self.rng).copied())
            .unwrap_or_else(|| self.config.field.origin())
    }

    fn sweep_stride(&self) -> Size {
        let sizes = &self.config.allowed_ship_sizes;
        let width = sizes.iter().map(|s| s.width).min().unwrap_or(1).max(1);
        let height = sizes.iter().map(|s| s.height).min().unwrap_or(1).max(1);
        Size::new(width, height)
    }

    /// Next unknown cell on the sweep lattice, `None` once it is exhausted
    fn next_sweep_position(&mut self) -> Option<Point> {
        let field = self.config.field;
        let stride = self.sweep_stride();
        let row_start = field.min_x().saturating_add(stride.width - 1);

        let mut cursor = match self.sweep_cursor {
            Some(last) => advance(last, stride, row_start, field),
            None => Point::new(row_start, field.min_y().saturating_add(stride.height - 1)),
        };

        while cursor.y < field.max_y() {
            if self.grid.is_unknown(cursor) {
                self.sweep_cursor = Some(cursor);
                return Some(cursor);
            }
            cursor = advance(cursor, stride, row_start, field);
        }

        self.sweep_cursor = Some(cursor);
        None
    }
}

fn advance(p: Point, stride: Size, row_start: i32, field: Rect) -> Point {
    let x = p.x.saturating_add(stride.width);
    if x >= field.max_x() {
        Point::new(row_start, p.y.saturating_add(stride.height))
    } else {
        Point::new(x, p.y)
    }
}

impl Strategy for HunterStrategy {
    fn name(&self) -> &str {
        match self.mode {
            SearchMode::Random => "Hunter",
            SearchMode::Sweep => "Sweeper",
        }
    }

    fn greeting_message(&self) -> &str {
        "Nobody leaves this field afloat"
    }

    fn win_message(&self) -> &str {
        "Target neutralised"
    }

    fn lose_message(&self) -> &str {
        "Recalibrating for the next round"
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
        if self.is_tracking() {
            if let Some(p) = self.track_target() {
                return p;
            }
            // Hits no longer fit any ship; fall back to searching
            self.target.clear();
        }
        self.search()
    }

    fn did_handle_shoot(&mut self, at: Point, outcome: ShotOutcome) {
        match outcome {
            ShotOutcome::Missed => {
                if self.grid.is_unknown(at) {
                    self.grid.set(at, Cell::Miss);
                }
            }
            ShotOutcome::Damaged | ShotOutcome::Killed => {
                self.grid.set(at, Cell::Hit);
                if !self.target.contains(&at) {
                    self.target.push(at);
                }
                if outcome == ShotOutcome::Killed {
                    let wreck = self.grid.connected_hits(at);
                    self.target.retain(|p| !wreck.contains(p));
                    self.grid.mark_sunk(&wreck);
                }
            }
        }
    }
}
