//! Reference robots and shared placement helpers

mod hunter;
mod random;
mod scripted;

pub use hunter::{Cell, HunterStrategy, SearchMode};
pub use random::RandomStrategy;
pub use scripted::{ScriptedStrategy, StrategyCall};

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::field::FieldConfiguration;
use crate::geometry::{Point, Rect, Size};
use crate::strategy::Strategy;

/// Attempts to place one ship before restarting the whole fleet
const MAX_SHIP_ATTEMPTS: usize = 1_000;

/// Fleet restarts before giving up
const MAX_FLEET_ATTEMPTS: usize = 50;

/// Random legal fleet for `config`.
///
/// Returns an empty fleet when no layout was found within the attempt
/// budget; the validator then rejects it instead of the caller spinning.
pub fn random_fleet<R: Rng + ?Sized>(rng: &mut R, config: &FieldConfiguration) -> Vec<Rect> {
    let fitting: Vec<Size> = config
        .allowed_ship_sizes
        .iter()
        .copied()
        .filter(|s| {
            s.width > 0 && s.height > 0 && s.width <= config.field.width && s.height <= config.field.height
        })
        .collect();
    if fitting.is_empty() {
        return Vec::new();
    }

    for _ in 0..MAX_FLEET_ATTEMPTS {
        if let Some(fleet) = try_place_fleet(rng, config.field, &fitting, config.ship_count) {
            return fleet;
        }
    }

    tracing::warn!("No fleet layout found for {}", config);
    Vec::new()
}

fn try_place_fleet<R: Rng + ?Sized>(
    rng: &mut R,
    field: Rect,
    sizes: &[Size],
    count: usize,
) -> Option<Vec<Rect>> {
    let mut ships = Vec::with_capacity(count);
    let mut dead_zones: Vec<Rect> = Vec::with_capacity(count);

    for _ in 0..count {
        let ship = (0..MAX_SHIP_ATTEMPTS)
            .map(|_| random_ship(rng, field, sizes))
            .find(|ship| !dead_zones.iter().any(|zone| zone.intersects(ship)))?;
        dead_zones.push(ship.expanded(1));
        ships.push(ship);
    }

    Some(ships)
}

fn random_ship<R: Rng + ?Sized>(rng: &mut R, field: Rect, sizes: &[Size]) -> Rect {
    let size = sizes[rng.gen_range(0..sizes.len())];
    let x = rng.gen_range(field.min_x()..=field.max_x() - size.width);
    let y = rng.gen_range(field.min_y()..=field.max_y() - size.height);
    Rect::at(Point::new(x, y), size)
}

/// Built-in robots selectable by name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Uniform random fire, never repeating a cell
    Random,
    /// Random search, then hunts down damaged ships
    Hunter,
    /// Stride sweep search, then hunts down damaged ships
    Sweeper,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [StrategyKind::Random, StrategyKind::Hunter, StrategyKind::Sweeper];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Hunter => "hunter",
            StrategyKind::Sweeper => "sweeper",
        }
    }

    /// Build a fresh robot seeded for reproducibility
    pub fn build(self, seed: u64) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Random => Box::new(RandomStrategy::with_seed(seed)),
            StrategyKind::Hunter => Box::new(HunterStrategy::with_seed(SearchMode::Random, seed)),
            StrategyKind::Sweeper => Box::new(HunterStrategy::with_seed(SearchMode::Sweep, seed)),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|k| k.name()).collect();
                format!("unknown robot '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Preset;
    use crate::validator::validate_fleet;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_fleet_is_valid_for_presets() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for preset in Preset::ALL {
            let config = preset.configuration();
            let fleet = random_fleet(&mut rng, &config);
            assert_eq!(validate_fleet(&fleet, &config), Ok(()), "{}", preset);
        }
    }

    #[test]
    fn test_random_fleet_gives_up_on_impossible_field() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = FieldConfiguration::square(3, 4, Size::new(2, 2));
        assert!(random_fleet(&mut rng, &config).is_empty());

        let oversized = FieldConfiguration::square(3, 1, Size::new(5, 1));
        assert!(random_fleet(&mut rng, &oversized).is_empty());
    }

    #[test]
    fn test_strategy_kind_parsing() {
        assert_eq!("Hunter".parse::<StrategyKind>(), Ok(StrategyKind::Hunter));
        assert!("gunner".parse::<StrategyKind>().is_err());
        for kind in StrategyKind::ALL {
            assert!(!kind.build(1).name().is_empty());
        }
    }
}
