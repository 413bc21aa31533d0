//! Field configuration - the rules of one duel

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Rect, Size};

/// Largest field robots are asked to model, in cells
pub const MAX_FIELD_CELLS: i64 = 1 << 20;

/// Rejected field configuration
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("field {0} has no cells")]
    EmptyField(Rect),
    #[error("field {0} extends past the coordinate range")]
    FieldOutOfRange(Rect),
    #[error("field {0} has more than {} cells", MAX_FIELD_CELLS)]
    FieldTooLarge(Rect),
    #[error("ship count must be positive")]
    NoShips,
    #[error("no ship sizes are allowed")]
    NoShipSizes,
    #[error("ship size {0} is not positive")]
    InvalidShipSize(Size),
    #[error("unknown preset '{0}' (expected one of: {})", Preset::names().join(", "))]
    UnknownPreset(String),
}

/// Field rect, ship count and allowed ship sizes for one duel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfiguration {
    pub field: Rect,
    pub ship_count: usize,
    pub allowed_ship_sizes: Vec<Size>,
}

impl FieldConfiguration {
    pub fn new(field: Rect, ship_count: usize, allowed_ship_sizes: Vec<Size>) -> Self {
        Self {
            field,
            ship_count,
            allowed_ship_sizes,
        }
    }

    /// Square field at the origin with ships of `size` in both orientations
    pub fn square(side: i32, ship_count: usize, size: Size) -> Self {
        let mut sizes = vec![size];
        if size.transposed() != size {
            sizes.push(size.transposed());
        }
        Self::new(Rect::new(0, 0, side, side), ship_count, sizes)
    }

    pub fn allows(&self, size: Size) -> bool {
        self.allowed_ship_sizes.contains(&size)
    }

    /// Check the configuration can host a game at all
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field.is_empty() {
            return Err(ConfigError::EmptyField(self.field));
        }
        if !self.field.is_bounded() {
            return Err(ConfigError::FieldOutOfRange(self.field));
        }
        if self.field.area() > MAX_FIELD_CELLS {
            return Err(ConfigError::FieldTooLarge(self.field));
        }
        if self.ship_count == 0 {
            return Err(ConfigError::NoShips);
        }
        if self.allowed_ship_sizes.is_empty() {
            return Err(ConfigError::NoShipSizes);
        }
        if let Some(bad) = self
            .allowed_ship_sizes
            .iter()
            .find(|s| s.width <= 0 || s.height <= 0)
        {
            return Err(ConfigError::InvalidShipSize(*bad));
        }
        Ok(())
    }
}

impl fmt::Display for FieldConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes: Vec<String> = self.allowed_ship_sizes.iter().map(|s| s.to_string()).collect();
        write!(
            f,
            "field: {}x{} ships: {}, sizes: [{}]",
            self.field.width,
            self.field.height,
            self.ship_count,
            sizes.join(", ")
        )
    }
}

/// Named field configurations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Huge,
    Tall,
    Fat,
    Normal,
    Weird,
    Classic,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Huge,
        Preset::Tall,
        Preset::Fat,
        Preset::Normal,
        Preset::Weird,
        Preset::Classic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Huge => "huge",
            Preset::Tall => "tall",
            Preset::Fat => "fat",
            Preset::Normal => "normal",
            Preset::Weird => "weird",
            Preset::Classic => "classic",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.name()).collect()
    }

    pub fn configuration(self) -> FieldConfiguration {
        match self {
            Preset::Huge => FieldConfiguration::new(
                Rect::new(0, 0, 40, 40),
                10,
                vec![Size::new(6, 8), Size::new(8, 6)],
            ),
            Preset::Tall => FieldConfiguration::new(
                Rect::new(0, 0, 30, 30),
                30,
                vec![Size::new(1, 8), Size::new(8, 1)],
            ),
            Preset::Fat => {
                FieldConfiguration::new(Rect::new(0, 0, 30, 30), 2, vec![Size::new(10, 10)])
            }
            Preset::Normal => FieldConfiguration::new(
                Rect::new(0, 0, 20, 20),
                12,
                vec![Size::new(3, 2), Size::new(2, 3)],
            ),
            Preset::Weird => FieldConfiguration::new(
                Rect::new(0, 0, 20, 20),
                1,
                vec![Size::new(3, 5), Size::new(5, 3)],
            ),
            Preset::Classic => FieldConfiguration::new(
                Rect::new(0, 0, 20, 20),
                6,
                vec![Size::new(2, 3), Size::new(3, 2)],
            ),
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Preset> for FieldConfiguration {
    fn from(preset: Preset) -> Self {
        preset.configuration()
    }
}
