//! # fl-math
//!
//! Numerical primitives for the firmloc workspace: the tridiagonal operator,
//! natural cubic spline interpolation, Gauss-Hermite quadrature, 1-D root
//! finding, normal-distribution helpers, seeded random number generation,
//! and a small statistics accumulator.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Normal distribution helpers (pdf, cdf, inverse cdf).
pub mod distributions;

/// 1D interpolation trait and the natural cubic spline.
pub mod interpolation;

/// Gauss-Hermite quadrature and the normalized shock quadrature.
pub mod quadrature;

/// Seeded random number generators.
pub mod random_numbers;

/// 1D root-finding solvers.
pub mod solvers1d;

/// Statistics accumulator.
pub mod statistics;

/// Tridiagonal matrix operator with a Thomas-algorithm solver.
pub mod tridiagonal;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use interpolation::{Interpolation, NaturalCubicSpline};
pub use quadrature::ShockQuadrature;
pub use statistics::Statistics;
pub use tridiagonal::TridiagonalOperator;
