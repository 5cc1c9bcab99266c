use std::f64::consts::SQRT_2;

use crate::error::Result;
use crate::geometry::Rect;
use crate::math::erf::erf;
use crate::math::Point2;
use crate::params::validate_sigma;

/// Blurred opacity of the interval `[lower, upper]` seen from coordinate `x`.
///
/// This is the 1D factor of the separable rectangle formula.
#[must_use]
pub fn interval_opacity(x: f64, lower: f64, upper: f64, sigma: f64) -> f64 {
    let scale = 1.0 / (sigma * SQRT_2);
    0.5 * (erf((upper - x) * scale) - erf((lower - x) * scale))
}

/// Opacity at `point` of an axis-aligned rectangle blurred by `sigma`.
///
/// The 2D Gaussian over a box separates into two 1D interval blurs.
///
/// # Errors
///
/// Returns `ParameterError::OutOfRange` if `sigma <= 0`.
pub fn evaluate_rectangle_opacity(point: &Point2, rect: &Rect, sigma: f64) -> Result<f64> {
    validate_sigma(sigma)?;
    let scale = 1.0 / (sigma * SQRT_2);
    let l = (rect.left() - point.x) * scale;
    let b = (rect.bottom() - point.y) * scale;
    let r = (rect.right() - point.x) * scale;
    let t = (rect.top() - point.y) * scale;
    Ok(0.25 * (erf(r) - erf(l)) * (erf(t) - erf(b)))
}
