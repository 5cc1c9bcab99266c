//! Rational approximations of the error function and its inverse.
//!
//! Every opacity formula in the crate composes [`erf`] rather than the true
//! error function, so [`inv_erf`] is the exact inverse of this approximation
//! and not of the mathematical `erf`. Maximum absolute error of [`erf`] is
//! about `3.3e-4`.

use std::f64::consts::SQRT_2;

const ERF_A: f64 = 1.273_239_544_735_162_7;
const ERF_B: f64 = 0.140_012_288_686_666_61;

const INV_ERF_C1: f64 = 4.546_884_979_448_284;
const INV_ERF_C2: f64 = 7.142_230_224_076_254;

/// Sign of `x`, returning `0.0` for zero.
///
/// Unlike [`f64::signum`], a zero input yields zero so that a collapsed wedge
/// contributes nothing.
#[must_use]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Approximate error function.
#[must_use]
pub fn erf(x: f64) -> f64 {
    let x2 = x * x;
    let magnitude = (1.0 - (-x2 * (ERF_A + ERF_B * x2) / (1.0 + ERF_B * x2)).exp()).sqrt();
    sign(x) * magnitude
}

/// Approximate inverse error function, valid for `x` in `(-1, 1)`.
///
/// Returns a non-finite value outside that domain; callers validate first.
#[must_use]
pub fn inv_erf(x: f64) -> f64 {
    let ln = (1.0 - x * x).ln();
    let g = INV_ERF_C1 + 0.5 * ln;
    sign(x) * ((g * g - INV_ERF_C2 * ln).sqrt() - g).sqrt()
}

/// Standard normal cumulative distribution built on [`erf`].
#[must_use]
pub fn normal_cdf(z: f64) -> f64 {
    0.5 + 0.5 * erf(z / SQRT_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // Abramowitz & Stegun 7.1.26, accurate to 1.5e-7.
    fn erf_reference(x: f64) -> f64 {
        let t = 1.0 / (1.0 + 0.327_591_1 * x.abs());
        let poly = t
            * (0.254_829_592
                + t * (-0.284_496_736
                    + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
        sign(x) * (1.0 - poly * (-x * x).exp())
    }

    #[test]
    fn erf_zero_and_odd() {
        assert_abs_diff_eq!(erf(0.0), 0.0);
        for x in [0.1, 0.7, 1.3, 2.9] {
            assert_abs_diff_eq!(erf(-x), -erf(x));
        }
    }

    #[test]
    fn erf_error_bound() {
        let mut worst: f64 = 0.0;
        for i in -4000..=4000 {
            let x = f64::from(i) * 1e-3;
            worst = worst.max((erf(x) - erf_reference(x)).abs());
        }
        assert!(worst < 5e-4, "worst erf error {worst}");
    }

    #[test]
    fn erf_saturates() {
        assert_abs_diff_eq!(erf(10.0), 1.0);
        assert_abs_diff_eq!(erf(-10.0), -1.0);
    }

    #[test]
    fn inv_erf_inverts_erf() {
        for x in [-0.999, -0.75, -0.2, 0.0, 0.01, 0.5, 0.9, 0.998] {
            assert_abs_diff_eq!(erf(inv_erf(x)), x, epsilon = 1e-9);
        }
    }

    #[test]
    fn inv_erf_outside_domain_is_not_finite() {
        assert!(!inv_erf(1.0).is_finite());
        assert!(!inv_erf(-1.5).is_finite());
    }

    #[test]
    fn sign_of_zero_is_zero() {
        assert_abs_diff_eq!(sign(0.0), 0.0);
        assert_abs_diff_eq!(sign(-3.0), -1.0);
        assert_abs_diff_eq!(sign(2.0), 1.0);
    }

    #[test]
    fn normal_cdf_midpoint() {
        assert_abs_diff_eq!(normal_cdf(0.0), 0.5);
        assert_abs_diff_eq!(normal_cdf(1.0), 0.841_344_746, epsilon = 5e-4);
    }
}
