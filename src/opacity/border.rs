use std::f64::consts::SQRT_2;

use crate::error::Result;
use crate::math::erf::inv_erf;
use crate::params::{validate_cutoff, validate_sigma};

/// Distance beyond a straight edge at which the blurred step falls to
/// `cutoff`.
///
/// Geometry extruded by this distance contains every point whose opacity is
/// at least `cutoff`. Cutoffs above one half give a negative distance.
///
/// # Errors
///
/// Returns `ParameterError::OutOfRange` if `sigma <= 0` or `cutoff` is not in
/// `(0, 1)`.
pub fn compute_border(sigma: f64, cutoff: f64) -> Result<f64> {
    validate_sigma(sigma)?;
    validate_cutoff(cutoff)?;
    let polar_cutoff = 2.0 * cutoff - 1.0;
    Ok(-SQRT_2 * sigma * inv_erf(polar_cutoff))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::erf::normal_cdf;
    use approx::assert_abs_diff_eq;

    #[test]
    fn blurred_step_reaches_cutoff_at_border() {
        for cutoff in [1.0 / 512.0, 0.01, 0.2, 0.7] {
            let sigma = 1.5;
            let border = compute_border(sigma, cutoff).unwrap();
            assert_abs_diff_eq!(normal_cdf(-border / sigma), cutoff, epsilon = 1e-12);
        }
    }

    #[test]
    fn half_cutoff_means_no_extrusion() {
        assert_abs_diff_eq!(compute_border(3.0, 0.5).unwrap(), 0.0);
    }

    #[test]
    fn border_scales_with_sigma() {
        let one = compute_border(1.0, 0.01).unwrap();
        let four = compute_border(4.0, 0.01).unwrap();
        assert!(one > 0.0);
        assert_abs_diff_eq!(four, 4.0 * one, epsilon = 1e-12);
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert!(compute_border(0.0, 0.01).is_err());
        assert!(compute_border(-1.0, 0.01).is_err());
        assert!(compute_border(1.0, 0.0).is_err());
        assert!(compute_border(1.0, 1.0).is_err());
        assert!(compute_border(1.0, 1.5).is_err());
    }
}
