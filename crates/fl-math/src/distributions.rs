//! Normal (Gaussian) distribution helpers.
//!
//! The cdf and its inverse delegate to the `statrs` error-function
//! implementations.

use std::f64::consts::{PI, SQRT_2};

use fl_core::Real;
use statrs::function::erf;

/// The standard normal probability density function.
///
/// `phi(x) = exp(-x^2/2) / sqrt(2 pi)`
#[inline]
pub fn normal_pdf(x: Real) -> Real {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// The standard normal cumulative distribution function.
pub fn normal_cdf(x: Real) -> Real {
    0.5 * erf::erfc(-x / SQRT_2)
}

/// The inverse standard normal CDF (probit function).
///
/// # Panics
/// Panics unless `p` is strictly inside `(0, 1)`.
pub fn normal_cdf_inverse(p: Real) -> Real {
    assert!(p > 0.0 && p < 1.0, "p must be in (0, 1), got {p}");
    SQRT_2 * erf::erf_inv(2.0 * p - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_known_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-12);
        assert!((normal_cdf(1.0) - 0.841_344_746_068_543).abs() < 1e-9);
        assert!((normal_cdf(-1.96) - 0.024_997_895_148_220).abs() < 1e-8);
    }

    #[test]
    fn pdf_known_values() {
        assert!((normal_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-12);
        assert!((normal_pdf(1.0) - 0.241_970_724_519_143_37).abs() < 1e-12);
    }

    #[test]
    fn inverse_round_trips() {
        for &p in &[0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99] {
            let x = normal_cdf_inverse(p);
            assert!((normal_cdf(x) - p).abs() < 1e-8, "p={p}: x={x}");
        }
    }

    #[test]
    #[should_panic(expected = "p must be in (0, 1)")]
    fn inverse_rejects_boundary() {
        normal_cdf_inverse(1.0);
    }
}
