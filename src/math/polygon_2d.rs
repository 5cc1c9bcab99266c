use super::{Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Computes twice the signed area of the triangle `(a, b, c)`.
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn doubled_signed_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        ))
        .into());
    }
    Ok(d / len)
}

/// Returns the right-pointing normal of a direction vector.
///
/// For a counter-clockwise polygon this is the outward normal of the edge.
#[must_use]
pub fn right_normal(dir: Vector2) -> Vector2 {
    Vector2::new(dir.y, -dir.x)
}

/// Returns the miter offset at a corner joining two edges with the given
/// outward unit normals.
///
/// The result bisects the normals and is scaled by `√2 / √(1 + cos θ)` so its
/// perpendicular distance to both edges is exactly one.
#[must_use]
pub fn miter_offset(n_in: Vector2, n_out: Vector2) -> Vector2 {
    let cos_theta = n_in.dot(&n_out);
    let bisector = n_in + n_out;
    let len = bisector.norm();
    if len < TOLERANCE {
        // Anti-parallel normals: a zero-angle spike, offset along either edge.
        return n_in;
    }
    bisector / len * (2.0_f64.sqrt() / (1.0 + cos_theta).sqrt())
}
