//! # Geometry Module
//!
//! Axis-aligned rectangles in pixel space and the points that live in them.
//!
//! [`Quadrilateral`] is the shared bounds type of rooms and levels. All of its
//! size queries are derived from the two corners; block queries divide by
//! [`DEFAULT_BLOCK_SIZE`] and truncate.

use crate::config::DEFAULT_BLOCK_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An absolute position in level pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Returns this point moved by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Calculates the Manhattan distance to another point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::PixelPoint;
    ///
    /// let a = PixelPoint::new(0, 0);
    /// let b = PixelPoint::new(32, 16);
    /// assert_eq!(a.manhattan_distance(b), 48);
    /// ```
    pub fn manhattan_distance(self, other: PixelPoint) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four block-sized orthogonal neighbours.
    pub fn block_neighbours(self) -> [PixelPoint; 4] {
        let step = DEFAULT_BLOCK_SIZE as i32;
        [
            self.offset(step, 0),
            self.offset(-step, 0),
            self.offset(0, step),
            self.offset(0, -step),
        ]
    }
}

impl fmt::Display for PixelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Coordinate types a [`Quadrilateral`] can be built over.
pub trait Coordinate: Copy + Into<u32> + fmt::Display {}

impl<T: Copy + Into<u32> + fmt::Display> Coordinate for T {}

/// An axis-aligned rectangle given by its top-left and bottom-right corners.
///
/// The bottom-right corner is expected not to lie left of or above the
/// top-left corner. Dimensions saturate at zero when it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quadrilateral<N: Coordinate = u16> {
    pub top_left_x: N,
    pub top_left_y: N,
    pub bottom_right_x: N,
    pub bottom_right_y: N,
}

impl<N: Coordinate> Quadrilateral<N> {
    /// Creates a rectangle from its corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::Quadrilateral;
    ///
    /// let bounds = Quadrilateral::new(0u16, 0, 64, 32);
    /// assert_eq!(bounds.width_in_pixels(), 64);
    /// assert_eq!(bounds.height_in_blocks(), 2);
    /// assert_eq!(bounds.area_in_blocks(), 8);
    /// ```
    pub fn new(top_left_x: N, top_left_y: N, bottom_right_x: N, bottom_right_y: N) -> Self {
        Self {
            top_left_x,
            top_left_y,
            bottom_right_x,
            bottom_right_y,
        }
    }

    fn left(&self) -> u32 {
        self.top_left_x.into()
    }

    fn top(&self) -> u32 {
        self.top_left_y.into()
    }

    fn right(&self) -> u32 {
        self.bottom_right_x.into()
    }

    fn bottom(&self) -> u32 {
        self.bottom_right_y.into()
    }

    pub fn width_in_pixels(&self) -> u32 {
        self.right().saturating_sub(self.left())
    }

    pub fn height_in_pixels(&self) -> u32 {
        self.bottom().saturating_sub(self.top())
    }

    /// Area in square pixels, wide enough for any `u32` rectangle.
    pub fn area_in_pixels(&self) -> u64 {
        self.width_in_pixels() as u64 * self.height_in_pixels() as u64
    }

    pub fn width_in_blocks(&self) -> u32 {
        self.width_in_pixels() / DEFAULT_BLOCK_SIZE as u32
    }

    pub fn height_in_blocks(&self) -> u32 {
        self.height_in_pixels() / DEFAULT_BLOCK_SIZE as u32
    }

    pub fn area_in_blocks(&self) -> u64 {
        self.width_in_blocks() as u64 * self.height_in_blocks() as u64
    }

    /// The top-left corner as a pixel point.
    pub fn top_left(&self) -> PixelPoint {
        PixelPoint::new(self.left() as i32, self.top() as i32)
    }

    /// Moves the top-left corner. The bottom-right corner stays where it is.
    pub fn set_coordinates(&mut self, x: N, y: N) {
        self.top_left_x = x;
        self.top_left_y = y;
    }

    /// True when both sides are at least four blocks long.
    pub fn meets_minimum_size_in_pixels(&self) -> bool {
        let minimum = 4 * DEFAULT_BLOCK_SIZE as u32;
        self.width_in_pixels() >= minimum && self.height_in_pixels() >= minimum
    }

    /// Axis-aligned overlap test. Rectangles that only share an edge do not
    /// intersect.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldelve::Quadrilateral;
    ///
    /// let a = Quadrilateral::new(0u16, 0, 10, 10);
    /// assert!(!a.intersects(&Quadrilateral::new(10, 0, 20, 10)));
    /// assert!(a.intersects(&Quadrilateral::new(5, 5, 15, 15)));
    /// ```
    pub fn intersects(&self, other: &Quadrilateral<N>) -> bool {
        !(other.right() <= self.left()
            || other.left() >= self.right()
            || other.bottom() <= self.top()
            || other.top() >= self.bottom())
    }

    /// Point containment, inclusive on every edge.
    pub fn contains(&self, x: N, y: N) -> bool {
        let (x, y): (u32, u32) = (x.into(), y.into());
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    /// Containment for a signed pixel point, strictly inside the edges.
    pub fn contains_strictly(&self, point: PixelPoint) -> bool {
        let (left, top) = (self.left() as i64, self.top() as i64);
        let (right, bottom) = (self.right() as i64, self.bottom() as i64);
        let (x, y) = (point.x as i64, point.y as i64);
        x > left && x < right && y > top && y < bottom
    }

    /// Human-readable description of position and size.
    pub fn id(&self) -> String {
        format!(
            "(x = {}, y = {}, width = {}, height = {}, area = {})",
            self.top_left_x,
            self.top_left_y,
            self.width_in_pixels(),
            self.height_in_pixels(),
            self.area_in_pixels()
        )
    }
}

impl<N: Coordinate> fmt::Display for Quadrilateral<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let quad = Quadrilateral::new(16u16, 32, 80, 64);
        assert_eq!(quad.width_in_pixels(), 64);
        assert_eq!(quad.height_in_pixels(), 32);
        assert_eq!(quad.area_in_pixels(), 2048);
        assert_eq!(quad.width_in_blocks(), 4);
        assert_eq!(quad.height_in_blocks(), 2);
        assert_eq!(quad.area_in_blocks(), 8);
    }

    #[test]
    fn test_large_rectangle_area_does_not_overflow() {
        let quad = Quadrilateral::new(0u32, 0, 100_000, 100_000);
        assert_eq!(quad.area_in_pixels(), 10_000_000_000);
        assert_eq!(quad.area_in_blocks(), 6250 * 6250);

        let full = Quadrilateral::new(0u32, 0, u32::MAX, u32::MAX);
        assert_eq!(full.area_in_pixels(), u32::MAX as u64 * u32::MAX as u64);
        assert!(full.id().ends_with(&format!("area = {})", full.area_in_pixels())));
    }

    #[test]
    fn test_block_division_truncates() {
        let quad = Quadrilateral::new(0u16, 0, 40, 15);
        assert_eq!(quad.width_in_blocks(), 2);
        assert_eq!(quad.height_in_blocks(), 0);
    }

    #[test]
    fn test_inverted_corners_saturate() {
        let quad = Quadrilateral::new(50u16, 50, 10, 10);
        assert_eq!(quad.width_in_pixels(), 0);
        assert_eq!(quad.area_in_pixels(), 0);
    }

    #[test]
    fn test_shared_edge_does_not_intersect() {
        let a = Quadrilateral::new(0u16, 0, 10, 10);
        let b = Quadrilateral::new(10u16, 0, 20, 10);
        let c = Quadrilateral::new(5u16, 5, 15, 15);

        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
        assert!(a.intersects(&a));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let quad = Quadrilateral::new(0u8, 0, 10, 10);
        assert!(quad.contains(0, 0));
        assert!(quad.contains(10, 10));
        assert!(quad.contains(5, 10));
        assert!(!quad.contains(11, 5));

        assert!(!quad.contains_strictly(PixelPoint::new(0, 5)));
        assert!(quad.contains_strictly(PixelPoint::new(1, 5)));
        assert!(!quad.contains_strictly(PixelPoint::new(-3, 5)));
    }

    #[test]
    fn test_minimum_size() {
        assert!(Quadrilateral::new(0u16, 0, 64, 64).meets_minimum_size_in_pixels());
        assert!(!Quadrilateral::new(0u16, 0, 64, 63).meets_minimum_size_in_pixels());
        assert!(Quadrilateral::new(0u32, 0, 1024, 512).meets_minimum_size_in_pixels());
    }

    #[test]
    fn test_set_coordinates_and_id() {
        let mut quad = Quadrilateral::new(0u16, 0, 64, 64);
        quad.set_coordinates(32, 16);
        assert_eq!(quad.top_left(), PixelPoint::new(32, 16));
        assert_eq!(
            quad.id(),
            "(x = 32, y = 16, width = 32, height = 48, area = 1536)"
        );
    }

    #[test]
    fn test_point_helpers() {
        let point = PixelPoint::new(16, 16);
        assert_eq!(point.offset(-16, 0), PixelPoint::new(0, 16));
        assert_eq!(point.manhattan_distance(PixelPoint::origin()), 32);
        assert!(point.block_neighbours().contains(&PixelPoint::new(16, 32)));
    }
}
