use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::doubled_signed_area;
use crate::math::{Point2, TOLERANCE};

/// A triangle in the plane, in either winding order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Point2,
    pub b: Point2,
    pub c: Point2,
}

impl Triangle {
    #[must_use]
    pub fn new(a: Point2, b: Point2, c: Point2) -> Self {
        Self { a, b, c }
    }

    /// Builds triangles from a flat coordinate list `[x0, y0, x1, y1, ...]`.
    ///
    /// Trailing coordinates that do not form a whole triangle are ignored.
    #[must_use]
    pub fn from_flat(coords: &[f64]) -> Vec<Self> {
        coords
            .chunks_exact(6)
            .map(|c| {
                Self::new(
                    Point2::new(c[0], c[1]),
                    Point2::new(c[2], c[3]),
                    Point2::new(c[4], c[5]),
                )
            })
            .collect()
    }

    /// Twice the signed area; positive when counter-clockwise.
    #[must_use]
    pub fn doubled_signed_area(&self) -> f64 {
        doubled_signed_area(&self.a, &self.b, &self.c)
    }

    /// Returns `true` if the triangle has (numerically) zero area or a
    /// non-finite coordinate.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.a, self.b, self.c]
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite());
        if !finite {
            return true;
        }
        let longest = self.longest_edge_squared();
        !longest.is_finite()
            || longest < TOLERANCE * TOLERANCE
            || self.doubled_signed_area().abs() <= TOLERANCE * longest
    }

    /// Returns the same triangle, counter-clockwise, relabelled so that edge
    /// `(a, b)` is the longest.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for zero-area triangles.
    pub fn canonicalize(&self) -> Result<Self> {
        if self.is_degenerate() {
            return Err(GeometryError::Degenerate(format!(
                "zero-area triangle ({}, {}), ({}, {}), ({}, {})",
                self.a.x, self.a.y, self.b.x, self.b.y, self.c.x, self.c.y
            ))
            .into());
        }

        let (a, mut b, mut c) = (self.a, self.b, self.c);
        if self.doubled_signed_area() < 0.0 {
            std::mem::swap(&mut b, &mut c);
        }

        let ab = (b - a).norm_squared();
        let bc = (c - b).norm_squared();
        let ca = (a - c).norm_squared();

        // Rotating the labels keeps the winding.
        let canonical = if bc >= ab && bc >= ca {
            Self::new(b, c, a)
        } else if ca >= ab && ca >= bc {
            Self::new(c, a, b)
        } else {
            Self::new(a, b, c)
        };
        Ok(canonical)
    }

    fn longest_edge_squared(&self) -> f64 {
        let ab = (self.b - self.a).norm_squared();
        let bc = (self.c - self.b).norm_squared();
        let ca = (self.a - self.c).norm_squared();
        ab.max(bc).max(ca)
    }
}
