use crate::math::Point2;

/// An axis-aligned rectangle.
///
/// The constructor normalizes the corners, so `left <= right` and
/// `bottom <= top` always hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    left: f64,
    bottom: f64,
    right: f64,
    top: f64,
}

impl Rect {
    /// Creates a rectangle from its four extents, in any order per axis.
    #[must_use]
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left: left.min(right),
            bottom: bottom.min(top),
            right: left.max(right),
            top: bottom.max(top),
        }
    }

    /// Creates a rectangle spanning two corner points.
    #[must_use]
    pub fn from_corners(p: Point2, q: Point2) -> Self {
        Self::new(p.x, p.y, q.x, q.y)
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.left
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.right
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> Point2 {
        Point2::new(
            f64::midpoint(self.left, self.right),
            f64::midpoint(self.bottom, self.top),
        )
    }

    /// Grows the rectangle by `distance` on every side.
    ///
    /// A negative distance shrinks it; the result is re-normalized if the
    /// sides cross.
    #[must_use]
    pub fn extrude(&self, distance: f64) -> Self {
        Self::new(
            self.left - distance,
            self.bottom - distance,
            self.right + distance,
            self.top + distance,
        )
    }

    /// Corners in counter-clockwise order starting at the bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.left, self.bottom),
            Point2::new(self.right, self.bottom),
            Point2::new(self.right, self.top),
            Point2::new(self.left, self.top),
        ]
    }

    /// Returns `true` if `point` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.bottom
            && point.y <= self.top
    }
}
