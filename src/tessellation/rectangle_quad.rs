use crate::error::Result;
use crate::geometry::Rect;
use crate::math::Point2;
use crate::opacity::evaluate_rectangle_opacity;
use crate::params::ShadowParams;

/// Geometry for a rectangle shadow: the rectangle grown by the blur border.
///
/// Unlike triangles, rectangles need no per-vertex attributes; the fragment
/// stage evaluates the separable formula against the unextruded rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleQuad {
    shape: Rect,
    extruded: Rect,
}

impl RectangleQuad {
    /// Triangles of the quad, indexing [`RectangleQuad::corners`].
    pub const TRIANGLES: [[u8; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

    /// Grows `shape` by `border` on every side.
    #[must_use]
    pub fn new(shape: Rect, border: f64) -> Self {
        Self {
            shape,
            extruded: shape.extrude(border),
        }
    }

    /// Grows `shape` by the border implied by `params`.
    #[must_use]
    pub fn for_params(shape: Rect, params: &ShadowParams) -> Self {
        Self::new(shape, params.border())
    }

    /// The unblurred rectangle.
    #[must_use]
    pub fn shape(&self) -> &Rect {
        &self.shape
    }

    /// The rendered bounds.
    #[must_use]
    pub fn extruded(&self) -> &Rect {
        &self.extruded
    }

    /// Extruded corners, counter-clockwise from the bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        self.extruded.corners()
    }

    /// Opacity a backend would produce at `point`: the analytic value inside
    /// the quad and zero outside it.
    ///
    /// # Errors
    ///
    /// Returns an error if the blur in `params` is invalid.
    pub fn opacity_at(&self, point: &Point2, params: &ShadowParams) -> Result<f64> {
        if !self.extruded.contains(point) {
            return Ok(0.0);
        }
        evaluate_rectangle_opacity(point, &self.shape, params.sigma())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn quad_is_grown_by_border() {
        let params = ShadowParams::new(0.5).unwrap();
        let rect = Rect::new(0.0, 0.0, 2.0, 1.0);
        let quad = RectangleQuad::for_params(rect, &params);
        let border = params.border();
        assert!(border > 0.0);
        assert_abs_diff_eq!(quad.extruded().left(), -border);
        assert_abs_diff_eq!(quad.extruded().top(), 1.0 + border);
        assert_eq!(*quad.shape(), rect);
    }

    #[test]
    fn opacity_is_clipped_outside_quad() {
        let params = ShadowParams::new(0.5).unwrap().with_cutoff(0.1).unwrap();
        let quad = RectangleQuad::for_params(Rect::new(0.0, 0.0, 2.0, 1.0), &params);
        let outside = Point2::new(-params.border() - 0.01, 0.5);
        assert_abs_diff_eq!(quad.opacity_at(&outside, &params).unwrap(), 0.0);
        let inside = Point2::new(1.0, 0.5);
        assert!(quad.opacity_at(&inside, &params).unwrap() > 0.5);
    }

    #[test]
    fn corners_follow_triangle_order() {
        let quad = RectangleQuad::new(Rect::new(0.0, 0.0, 1.0, 1.0), 0.0);
        let c = quad.corners();
        for [i, j, k] in RectangleQuad::TRIANGLES {
            let (u, v, w) = (c[usize::from(i)], c[usize::from(j)], c[usize::from(k)]);
            let area = (v - u).perp(&(w - u));
            assert!(area > 0.0);
        }
    }
}
