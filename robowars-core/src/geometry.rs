//! Grid geometry with integer cells
//!
//! Rectangles are half-open: a rect at `x` with `width` covers columns
//! `x..x + width`, so `max_x` is the first column outside it.
//!
//! Extents are compared in `i64`: a rect whose far edge lies beyond `i32`
//! is never contained in, nor treated as overlapping with, a smaller one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer grid cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The eight surrounding cells plus the cell itself
    pub fn neighborhood(&self) -> impl Iterator<Item = Point> {
        let center = *self;
        (-1..=1).flat_map(move |dy| {
            (-1..=1).map(move |dx| Point::new(center.x.saturating_add(dx), center.y.saturating_add(dy)))
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a ship or field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Same size rotated by 90 degrees
    pub fn transposed(&self) -> Size {
        Size::new(self.height, self.width)
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned integer rectangle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Rect of the given size anchored at `origin`
    pub const fn at(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn min_x(&self) -> i32 {
        self.x
    }

    /// First column past the rect, saturating at `i32::MAX`
    pub fn max_x(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn min_y(&self) -> i32 {
        self.y
    }

    /// First row past the rect, saturating at `i32::MAX`
    pub fn max_y(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Both far edges are representable as `i32`
    pub fn is_bounded(&self) -> bool {
        self.x.checked_add(self.width).is_some() && self.y.checked_add(self.height).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn area(&self) -> i64 {
        self.size().area().max(0)
    }

    /// Check if a cell lies inside
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && i64::from(point.x) < self.right()
            && point.y >= self.min_y()
            && i64::from(point.y) < self.bottom()
    }

    /// Check if `other` lies fully inside
    pub fn contains_rect(&self, other: &Rect) -> bool {
        !other.is_empty()
            && other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Overlap with positive area; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && i64::from(self.x) < other.right()
            && i64::from(other.x) < self.right()
            && i64::from(self.y) < other.bottom()
            && i64::from(other.y) < self.bottom()
    }

    /// Grow by `by` cells on every side, clamped to the `i32` range
    pub fn expanded(&self, by: i32) -> Rect {
        let x = self.x.saturating_sub(by);
        let y = self.y.saturating_sub(by);
        let right = self.max_x().saturating_add(by);
        let bottom = self.max_y().saturating_add(by);
        Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    /// Row-major iteration over every cell below `i32::MAX`
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        let rect = *self;
        (rect.min_y()..rect.max_y())
            .flat_map(move |y| (rect.min_x()..rect.max_x()).map(move |x| Point::new(x, y)))
    }

    /// Smallest rect covering every point, `None` for no points
    pub fn bounding(points: &[Point]) -> Option<Rect> {
        let first = points.first()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let width = max_x.saturating_sub(min_x).saturating_add(1);
        let height = max_y.saturating_sub(min_y).saturating_add(1);
        Some(Rect::new(min_x, min_y, width, height))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at ({}, {})", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_point() {
        let r = Rect::new(0, 0, 2, 1);
        assert!(r.contains_point(Point::new(0, 0)));
        assert!(r.contains_point(Point::new(1, 0)));
        assert!(!r.contains_point(Point::new(2, 0))); // max_x is exclusive
        assert!(!r.contains_point(Point::new(0, 1)));
        assert!(!r.contains_point(Point::new(-1, 0)));
    }

    #[test]
    fn test_rect_contains_rect() {
        let field = Rect::new(0, 0, 4, 4);
        assert!(field.contains_rect(&Rect::new(2, 2, 2, 2)));
        assert!(!field.contains_rect(&Rect::new(3, 0, 2, 1)));
        assert!(!field.contains_rect(&Rect::new(-1, 0, 2, 2)));
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 2, 2);
        assert!(!a.intersects(&Rect::new(2, 0, 2, 2)));
        assert!(a.intersects(&Rect::new(1, 1, 2, 2)));
        assert!(a.expanded(1).intersects(&Rect::new(2, 0, 2, 2)));
        assert!(!a.expanded(1).intersects(&Rect::new(3, 0, 2, 2)));
    }

    #[test]
    fn test_cells() {
        let cells: Vec<_> = Rect::new(1, 2, 3, 2).cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Point::new(1, 2));
        assert_eq!(cells[5], Point::new(3, 3));
    }

    #[test]
    fn test_bounding() {
        let points = [Point::new(3, 1), Point::new(1, 1), Point::new(2, 1)];
        assert_eq!(Rect::bounding(&points), Some(Rect::new(1, 1, 3, 1)));
        assert_eq!(Rect::bounding(&[]), None);
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let field = Rect::new(0, 0, 4, 4);
        let far = Rect::new(i32::MAX, 0, 2, 1);
        assert!(!far.is_bounded());
        assert!(field.is_bounded());
        assert_eq!(far.max_x(), i32::MAX);
        assert!(!field.contains_rect(&far));
        assert!(!far.contains_point(Point::new(0, 0)));
        assert!(!far.intersects(&field));

        let zone = far.expanded(1);
        assert_eq!(zone.x, i32::MAX - 1);
        assert!(zone.intersects(&Rect::new(i32::MAX - 1, 0, 1, 1)));
        assert_eq!(Rect::new(i32::MIN, 0, 1, 1).expanded(1).x, i32::MIN);
        assert_eq!(far.cells().count(), 0);
    }

    #[test]
    fn test_neighborhood() {
        let around: Vec<_> = Point::new(0, 0).neighborhood().collect();
        assert_eq!(around.len(), 9);
        assert!(around.contains(&Point::new(-1, -1)));
        assert!(around.contains(&Point::new(1, 1)));
    }
}
