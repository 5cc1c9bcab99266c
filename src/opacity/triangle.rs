//! Blurred opacity of an arbitrary triangle.
//!
//! The triangle is expressed in its local frame (longest edge on the x axis,
//! apex above it) relative to the query point, scaled by `1 / sigma`:
//!
//! ```text
//!               (m, t)
//!                 /|\
//!               /  |  \
//!             /    |    \
//!   (l, b)  /______|______\  (r, b)
//! ```
//!
//! It splits along the vertical through the apex into two right-triangle
//! wedges, each integrated in closed form by [`right_triangle_integral`].

use crate::error::Result;
use crate::geometry::{FramedTriangle, Triangle};
use crate::math::erf::{erf, normal_cdf, sign};
use crate::math::{Point2, TOLERANCE};
use crate::params::validate_sigma;

/// Linear coefficient of the tail fit `erfc(h / √2) ≈ exp(-p h - q h²)`.
const TAIL_LINEAR: f64 = 0.778;

/// Quadratic coefficient of the tail fit.
const TAIL_QUADRATIC: f64 = 0.375;

/// The five sigma-scaled local distances from a query point to a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleScalars {
    /// Horizontal distance to the left base vertex.
    pub l: f64,
    /// Horizontal distance to the apex.
    pub m: f64,
    /// Horizontal distance to the right base vertex.
    pub r: f64,
    /// Vertical distance to the base.
    pub b: f64,
    /// Vertical distance to the apex.
    pub t: f64,
}

impl TriangleScalars {
    #[must_use]
    pub fn new(l: f64, m: f64, r: f64, b: f64, t: f64) -> Self {
        Self { l, m, r, b, t }
    }

    /// Computes the scalars of `point` relative to a framed triangle.
    #[must_use]
    pub fn at(triangle: &FramedTriangle, point: &Point2, sigma: f64) -> Self {
        let p = triangle.frame().to_local(point);
        let (a, b, c) = (triangle.local_a(), triangle.local_b(), triangle.local_c());
        Self::from_attributes([a.x - p.x, c.x - p.x, b.x - p.x], [a.y - p.y, c.y - p.y], sigma)
    }

    /// Builds the scalars from unscaled local differences, as carried by mesh
    /// vertex attributes.
    #[must_use]
    pub fn from_attributes(horizontal: [f64; 3], vertical: [f64; 2], sigma: f64) -> Self {
        let inv = 1.0 / sigma;
        Self::new(
            horizontal[0] * inv,
            horizontal[1] * inv,
            horizontal[2] * inv,
            vertical[0] * inv,
            vertical[1] * inv,
        )
    }

    /// Unclamped opacity.
    ///
    /// A wedge whose apex lies outside `[l, r]` enters with a negative sign,
    /// which turns the sum into a difference of wedges.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn opacity(&self) -> f64 {
        let Self { l, m, r, b, t } = *self;
        let l_sig = sign(l - m);
        let r_sig = sign(r - m);
        -l_sig * right_triangle_integral(l_sig * m, b, l_sig * l, t)
            + r_sig * right_triangle_integral(r_sig * m, b, r_sig * r, t)
    }
}

/// Where a wedge's x-range lies relative to the point at which its
/// hypotenuse crosses the x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WedgeRegion {
    /// The hypotenuse is above the axis over the whole range.
    AboveAxis,
    /// The hypotenuse is below the axis over the whole range.
    BelowAxis,
    /// The hypotenuse crosses the axis at `threshold` inside the range.
    Straddling { threshold: f64 },
}

impl WedgeRegion {
    /// Classifies the range `[left, right]` against `threshold`.
    #[must_use]
    pub fn classify(left: f64, right: f64, threshold: f64) -> Self {
        if threshold >= right {
            Self::AboveAxis
        } else if threshold <= left {
            Self::BelowAxis
        } else {
            Self::Straddling { threshold }
        }
    }
}

/// The standard normal density integrated over the right triangle with
/// vertical leg `x = l` from `b` to `t`, base `y = b` from `l` to `r`, and
/// hypotenuse from `(l, t)` to `(r, b)`.
///
/// Returns zero for collapsed wedges (`r <= l` or `t <= b`).
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn right_triangle_integral(l: f64, b: f64, r: f64, t: f64) -> f64 {
    if r - l <= TOLERANCE || t - b <= TOLERANCE {
        return 0.0;
    }
    let wedge = Wedge::new(l, b, r, t);

    // Everything under the hypotenuse minus the strip below the base.
    let below_base = normal_cdf(b) * (normal_cdf(r) - normal_cdf(l));
    let under_hypotenuse = match wedge.region() {
        WedgeRegion::AboveAxis => wedge.above_axis(l, r),
        WedgeRegion::BelowAxis => wedge.below_axis(l, r),
        WedgeRegion::Straddling { threshold } => {
            wedge.above_axis(l, threshold) + wedge.below_axis(threshold, r)
        }
    };
    under_hypotenuse - below_base
}

/// Opacity at `point` of `triangle` blurred by `sigma`, clamped to `[0, 1]`.
///
/// # Errors
///
/// Returns `ParameterError::OutOfRange` if `sigma <= 0`, or
/// `GeometryError::Degenerate` for zero-area triangles.
pub fn evaluate_triangle_opacity(point: &Point2, triangle: &Triangle, sigma: f64) -> Result<f64> {
    validate_sigma(sigma)?;
    let framed = FramedTriangle::new(triangle)?;
    Ok(TriangleScalars::at(&framed, point, sigma)
        .opacity()
        .clamp(0.0, 1.0))
}

/// Hypotenuse `h(x) = intercept - slope * x` of a wedge.
struct Wedge {
    slope: f64,
    intercept: f64,
    left: f64,
    right: f64,
}

impl Wedge {
    fn new(l: f64, b: f64, r: f64, t: f64) -> Self {
        let slope = (t - b) / (r - l);
        Self {
            slope,
            intercept: t + slope * l,
            left: l,
            right: r,
        }
    }

    fn region(&self) -> WedgeRegion {
        WedgeRegion::classify(self.left, self.right, self.intercept / self.slope)
    }

    /// `∫ φ(x) Φ(h(x)) dx` over `[lo, hi]` where `h >= 0`, using
    /// `Φ(h) ≈ 1 - ½ exp(-p h - q h²)`.
    fn above_axis(&self, lo: f64, hi: f64) -> f64 {
        normal_cdf(hi) - normal_cdf(lo) - 0.5 * self.weighted_gaussian(TAIL_LINEAR, lo, hi)
    }

    /// `∫ φ(x) Φ(h(x)) dx` over `[lo, hi]` where `h <= 0`, using
    /// `Φ(h) ≈ ½ exp(p h - q h²)`.
    fn below_axis(&self, lo: f64, hi: f64) -> f64 {
        0.5 * self.weighted_gaussian(-TAIL_LINEAR, lo, hi)
    }

    /// `∫ φ(x) exp(-s h - q h²) dx` over `[lo, hi]`, completing the square
    /// into an `erf` difference.
    ///
    /// The peak exponent is kept in expanded form; the completed-square
    /// difference cancels catastrophically for narrow wedges.
    fn weighted_gaussian(&self, s: f64, lo: f64, hi: f64) -> f64 {
        let (k, c) = (self.slope, self.intercept);
        let q = TAIL_QUADRATIC;
        let quadratic = 0.5 + q * k * k;
        let center = k * (s + 2.0 * q * c) / (2.0 * quadratic);
        let peak = (k * k * s * s - 2.0 * s * c - 2.0 * q * c * c) / (4.0 * quadratic);
        let root = quadratic.sqrt();
        peak.exp() / (2.0 * (2.0 * quadratic).sqrt())
            * (erf(root * (hi - center)) - erf(root * (lo - center)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn normal_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt()
    }

    fn erf_reference(x: f64) -> f64 {
        let t = 1.0 / (1.0 + 0.327_591_1 * x.abs());
        let poly = t
            * (0.254_829_592
                + t * (-0.284_496_736
                    + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
        sign(x) * (1.0 - poly * (-x * x).exp())
    }

    fn cdf_reference(z: f64) -> f64 {
        0.5 * (1.0 + erf_reference(z / std::f64::consts::SQRT_2))
    }

    /// Midpoint-rule integral of the same wedge.
    fn wedge_reference(l: f64, b: f64, r: f64, t: f64) -> f64 {
        let n = 2000;
        let dx = (r - l) / f64::from(n);
        (0..n)
            .map(|i| {
                let x = l + (f64::from(i) + 0.5) * dx;
                let top = t - (t - b) * (x - l) / (r - l);
                normal_pdf(x) * (cdf_reference(top) - cdf_reference(b)) * dx
            })
            .sum()
    }

    #[test]
    fn classify_regions() {
        assert_eq!(WedgeRegion::classify(-1.0, 1.0, 2.0), WedgeRegion::AboveAxis);
        assert_eq!(WedgeRegion::classify(-1.0, 1.0, -1.0), WedgeRegion::BelowAxis);
        assert_eq!(
            WedgeRegion::classify(-1.0, 1.0, 0.25),
            WedgeRegion::Straddling { threshold: 0.25 }
        );
    }

    #[test]
    fn wedge_entirely_above_axis() {
        // Base at y = 0.5, so the hypotenuse never reaches the axis.
        let (l, b, r, t) = (-1.0, 0.5, 2.0, 2.5);
        assert_eq!(Wedge::new(l, b, r, t).region(), WedgeRegion::AboveAxis);
        assert_abs_diff_eq!(
            right_triangle_integral(l, b, r, t),
            wedge_reference(l, b, r, t),
            epsilon = 1e-3
        );
    }

    #[test]
    fn wedge_entirely_below_axis() {
        let (l, b, r, t) = (-0.5, -3.0, 1.5, -0.2);
        assert_eq!(Wedge::new(l, b, r, t).region(), WedgeRegion::BelowAxis);
        assert_abs_diff_eq!(
            right_triangle_integral(l, b, r, t),
            wedge_reference(l, b, r, t),
            epsilon = 1e-3
        );
    }

    #[test]
    fn straddling_wedge_sums_both_branches() {
        let (l, b, r, t) = (-1.5, -1.0, 2.0, 1.5);
        let wedge = Wedge::new(l, b, r, t);
        let WedgeRegion::Straddling { threshold } = wedge.region() else {
            panic!("expected a straddling wedge");
        };
        let split = wedge.above_axis(l, threshold) + wedge.below_axis(threshold, r)
            - normal_cdf(b) * (normal_cdf(r) - normal_cdf(l));
        assert_abs_diff_eq!(right_triangle_integral(l, b, r, t), split, epsilon = 1e-15);
        assert_abs_diff_eq!(split, wedge_reference(l, b, r, t), epsilon = 1e-3);
    }

    #[test]
    fn collapsed_wedge_is_zero() {
        assert_abs_diff_eq!(right_triangle_integral(1.0, 0.0, 1.0, 2.0), 0.0);
        assert_abs_diff_eq!(right_triangle_integral(0.0, 1.0, 2.0, 1.0), 0.0);
    }

    #[test]
    fn apex_outside_base_becomes_difference() {
        // Apex to the right of both base vertices.
        let s = TriangleScalars::new(-1.0, 2.0, 1.0, -0.5, 1.0);
        let big = right_triangle_integral(-2.0, -0.5, 1.0, 1.0);
        let small = right_triangle_integral(-2.0, -0.5, -1.0, 1.0);
        assert_abs_diff_eq!(s.opacity(), big - small, epsilon = 1e-15);
    }

    #[test]
    fn interior_point_is_nearly_opaque() {
        let tri = Triangle::new(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0));
        let o = evaluate_triangle_opacity(&p(0.2, 0.2), &tri, 0.1).unwrap();
        assert!(o > 0.9, "opacity {o}");
    }

    #[test]
    fn far_point_is_transparent() {
        let tri = Triangle::new(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0));
        let o = evaluate_triangle_opacity(&p(5.0, 5.0), &tri, 0.1).unwrap();
        assert!(o < 1e-6, "opacity {o}");
    }

    #[test]
    fn edge_midpoint_is_half_covered() {
        let tri = Triangle::new(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0));
        let o = evaluate_triangle_opacity(&p(0.5, 0.0), &tri, 0.1).unwrap();
        assert_abs_diff_eq!(o, 0.5, epsilon = 2e-3);
    }

    #[test]
    fn winding_does_not_matter() {
        let ccw = Triangle::new(p(0.0, 0.0), p(3.0, 0.5), p(1.0, 2.0));
        let cw = Triangle::new(p(0.0, 0.0), p(1.0, 2.0), p(3.0, 0.5));
        for q in [p(1.0, 1.0), p(-0.5, 0.3), p(2.5, 2.5)] {
            assert_abs_diff_eq!(
                evaluate_triangle_opacity(&q, &ccw, 0.4).unwrap(),
                evaluate_triangle_opacity(&q, &cw, 0.4).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn rejects_bad_inputs() {
        let tri = Triangle::new(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0));
        assert!(evaluate_triangle_opacity(&p(0.0, 0.0), &tri, 0.0).is_err());
        let flat = Triangle::new(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0));
        assert!(evaluate_triangle_opacity(&p(0.0, 0.0), &flat, 1.0).is_err());
    }
}
