use crate::error::Result;
use crate::math::polygon_2d::segment_direction;
use crate::math::{Matrix2, Point2, Vector2};

use super::Triangle;

/// A rigid 2D frame: an origin plus a rotation taking a chosen direction to
/// the local +x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    origin: Point2,
    rotation: Matrix2,
}

impl LocalFrame {
    /// Creates a frame at `origin` whose +x axis points towards `toward`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn new(origin: Point2, toward: Point2) -> Result<Self> {
        let u = segment_direction(&origin, &toward)?;
        let rotation = Matrix2::new(u.x, u.y, -u.y, u.x);
        Ok(Self { origin, rotation })
    }

    /// The world-to-local rotation.
    #[must_use]
    pub fn rotation(&self) -> &Matrix2 {
        &self.rotation
    }

    #[must_use]
    pub fn to_local(&self, point: &Point2) -> Point2 {
        Point2::from(self.rotation * (point - self.origin))
    }

    #[must_use]
    pub fn to_local_vector(&self, v: &Vector2) -> Vector2 {
        self.rotation * v
    }

    #[must_use]
    pub fn to_world(&self, point: &Point2) -> Point2 {
        self.origin + self.rotation.transpose() * point.coords
    }

    #[must_use]
    pub fn to_world_vector(&self, v: &Vector2) -> Vector2 {
        self.rotation.transpose() * v
    }
}

/// A canonical triangle together with its local frame and local vertices.
///
/// In the local frame `a` sits at the origin, `b` on the +x axis and `c`
/// above it with `0 <= c.x <= b.x`.
#[derive(Debug, Clone, Copy)]
pub struct FramedTriangle {
    world: Triangle,
    frame: LocalFrame,
    local_c: Point2,
    length: f64,
}

impl FramedTriangle {
    /// Canonicalizes `triangle` and builds its frame.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for zero-area triangles.
    pub fn new(triangle: &Triangle) -> Result<Self> {
        let world = triangle.canonicalize()?;
        let frame = LocalFrame::new(world.a, world.b)?;
        let local_c = frame.to_local(&world.c);
        let length = (world.b - world.a).norm();
        Ok(Self {
            world,
            frame,
            local_c,
            length,
        })
    }

    /// The canonical triangle in world coordinates.
    #[must_use]
    pub fn world(&self) -> &Triangle {
        &self.world
    }

    #[must_use]
    pub fn frame(&self) -> &LocalFrame {
        &self.frame
    }

    /// Local position of `a` (always the origin).
    #[must_use]
    pub fn local_a(&self) -> Point2 {
        Point2::origin()
    }

    #[must_use]
    pub fn local_b(&self) -> Point2 {
        Point2::new(self.length, 0.0)
    }

    #[must_use]
    pub fn local_c(&self) -> Point2 {
        self.local_c
    }

    /// Distance of `c` from the line through `a` and `b`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.local_c.y
    }

    /// Squared length of edge `ab` over the squared height.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        (self.length * self.length) / (self.height() * self.height())
    }
}
