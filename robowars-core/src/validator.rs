//! Fleet placement legality

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::FieldConfiguration;
use crate::geometry::Rect;

/// Why a proposed fleet was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("wrong number of ships")]
    IncorrectShipCount,
    #[error("ship size is not allowed")]
    IncorrectShipSize,
    #[error("ship lies outside the field")]
    ShipsOutOfField,
    #[error("ships overlap or touch each other")]
    ShipsIntersection,
}

impl PlacementError {
    /// Message attributing the error to a named robot
    pub fn message_for(&self, robot: &str) -> String {
        match self {
            PlacementError::IncorrectShipCount => {
                format!("Robot {} returns wrong amount of ships!", robot)
            }
            PlacementError::IncorrectShipSize => {
                format!("Robot {} returns ships with incorrect size!", robot)
            }
            PlacementError::ShipsOutOfField => {
                format!("Robot {} returns ships with out of field positions!", robot)
            }
            PlacementError::ShipsIntersection => format!(
                "Robot {} returns ships that intersect each other or are connected!",
                robot
            ),
        }
    }
}

/// Validate a proposed fleet against the field rules.
///
/// Checks run count, size, bounds, spacing; the first failing check wins.
/// Every ship keeps a one-cell dead zone that later ships may not enter.
pub fn validate_fleet(placements: &[Rect], config: &FieldConfiguration) -> Result<(), PlacementError> {
    if placements.len() != config.ship_count {
        return Err(PlacementError::IncorrectShipCount);
    }

    if placements.iter().any(|p| !config.allows(p.size())) {
        return Err(PlacementError::IncorrectShipSize);
    }

    if placements.iter().any(|p| !config.field.contains_rect(p)) {
        return Err(PlacementError::ShipsOutOfField);
    }

    let mut dead_zones: Vec<Rect> = Vec::with_capacity(placements.len());
    for ship in placements {
        if dead_zones.iter().any(|zone| zone.intersects(ship)) {
            return Err(PlacementError::ShipsIntersection);
        }
        dead_zones.push(ship.expanded(1));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    fn small_config(ship_count: usize) -> FieldConfiguration {
        FieldConfiguration::square(6, ship_count, Size::new(2, 1))
    }

    #[test]
    fn test_valid_fleet() {
        let config = small_config(2);
        let fleet = [Rect::new(0, 0, 2, 1), Rect::new(0, 2, 1, 2)];
        assert_eq!(validate_fleet(&fleet, &config), Ok(()));
    }

    #[test]
    fn test_rejects_short_and_long_fleets() {
        let config = small_config(2);
        assert_eq!(
            validate_fleet(&[Rect::new(0, 0, 2, 1)], &config),
            Err(PlacementError::IncorrectShipCount)
        );
        assert_eq!(
            validate_fleet(&[], &config),
            Err(PlacementError::IncorrectShipCount)
        );
        let three = [Rect::new(0, 0, 2, 1), Rect::new(0, 2, 2, 1), Rect::new(0, 4, 2, 1)];
        assert_eq!(validate_fleet(&three, &config), Err(PlacementError::IncorrectShipCount));
    }

    #[test]
    fn test_rejects_wrong_size() {
        let config = small_config(1);
        assert_eq!(
            validate_fleet(&[Rect::new(0, 0, 3, 1)], &config),
            Err(PlacementError::IncorrectShipSize)
        );
    }

    #[test]
    fn test_rejects_out_of_field() {
        let config = FieldConfiguration::square(6, 1, Size::new(2, 2));
        assert_eq!(
            validate_fleet(&[Rect::new(-1, 0, 2, 2)], &config),
            Err(PlacementError::ShipsOutOfField)
        );
        assert_eq!(
            validate_fleet(&[Rect::new(5, 5, 2, 2)], &config),
            Err(PlacementError::ShipsOutOfField)
        );
        assert_eq!(validate_fleet(&[Rect::new(4, 4, 2, 2)], &config), Ok(()));
    }

    #[test]
    fn test_rejects_overflowing_placement() {
        let config = FieldConfiguration::square(4, 1, Size::new(2, 1));
        assert_eq!(
            validate_fleet(&[Rect::new(i32::MAX, 0, 2, 1)], &config),
            Err(PlacementError::ShipsOutOfField)
        );
        assert_eq!(
            validate_fleet(&[Rect::new(0, i32::MAX, 1, 2)], &config),
            Err(PlacementError::ShipsOutOfField)
        );
    }

    #[test]
    fn test_spacing_enforced_in_either_order() {
        let config = small_config(2);
        let a = Rect::new(0, 0, 2, 1);
        // Diagonally adjacent
        let b = Rect::new(2, 1, 2, 1);
        assert_eq!(validate_fleet(&[a, b], &config), Err(PlacementError::ShipsIntersection));
        assert_eq!(validate_fleet(&[b, a], &config), Err(PlacementError::ShipsIntersection));

        // Overlapping
        let c = Rect::new(1, 0, 2, 1);
        assert_eq!(validate_fleet(&[a, c], &config), Err(PlacementError::ShipsIntersection));
        assert_eq!(validate_fleet(&[c, a], &config), Err(PlacementError::ShipsIntersection));

        // One empty column between them is fine
        let d = Rect::new(3, 0, 2, 1);
        assert_eq!(validate_fleet(&[a, d], &config), Ok(()));
        assert_eq!(validate_fleet(&[d, a], &config), Ok(()));
    }

    #[test]
    fn test_first_failing_check_wins() {
        let config = small_config(2);
        // Wrong size and out of field: size is checked first
        let fleet = [Rect::new(-1, 0, 3, 1), Rect::new(0, 2, 2, 1)];
        assert_eq!(validate_fleet(&fleet, &config), Err(PlacementError::IncorrectShipSize));
    }

    #[test]
    fn test_error_messages_name_robot() {
        let msg = PlacementError::ShipsOutOfField.message_for("Teapot");
        assert!(msg.contains("Teapot"));
        assert!(msg.contains("out of field"));
    }
}
