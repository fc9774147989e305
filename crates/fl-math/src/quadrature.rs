//! Gauss-Hermite quadrature and the normalized shock quadrature.
//!
//! The raw rule follows the physicists' convention (weight `e^{-x^2}`), so
//! its weights sum to `sqrt(pi)`.  [`ShockQuadrature`] rescales nodes by
//! `sqrt(2) * sigma` and divides weights by `sqrt(pi)`, turning the rule
//! into a discrete probability measure that approximates `E[f(Z)]` for
//! `Z ~ N(0, sigma^2)`.

use std::f64::consts::PI;

use fl_core::{
    errors::{Error, Result},
    Real,
};

/// Convergence tolerance for the Newton refinement of Hermite roots.
const NEWTON_EPS: Real = 3.0e-14;

/// Iteration cap for the Newton refinement of a single root.
const NEWTON_MAX_ITERATIONS: usize = 16;

/// `pi^(-1/4)`, the leading value of the orthonormal Hermite recurrence.
const PI_M4: Real = 0.751_125_544_464_942_5;

/// Evaluate the orthonormal Hermite recurrence at `z`.
///
/// Returns `(H~_n(z), H~_{n-1}(z))`; the derivative of `H~_n` at a root is
/// `sqrt(2n) * H~_{n-1}`.
fn scaled_hermite(n: usize, z: Real) -> (Real, Real) {
    let mut p1 = PI_M4;
    let mut p2 = 0.0;
    for j in 1..=n {
        let p3 = p2;
        p2 = p1;
        p1 = z * (2.0 / j as Real).sqrt() * p2 - (((j - 1) as Real) / j as Real).sqrt() * p3;
    }
    (p1, p2)
}

/// Compute the nodes and weights of the `n`-point Gauss-Hermite rule.
///
/// Physicists' convention: `sum_i w_i f(x_i) ~ int f(x) e^{-x^2} dx`, so the
/// weights sum to `sqrt(pi)`.  Nodes are returned strictly increasing.
///
/// Roots are found by Newton refinement of the scaled three-term recurrence,
/// seeded with the classical asymptotic guesses and marched inward from the
/// largest root; symmetry supplies the negative half.
///
/// # Errors
/// Returns [`Error::NonConvergence`] if a root fails to settle within the
/// iteration cap.
pub fn gauss_hermite(n: usize) -> Result<(Vec<Real>, Vec<Real>)> {
    fl_core::ensure!(n >= 1, "quadrature order must be at least 1, got {n}");

    let mut x = vec![0.0; n];
    let mut w = vec![0.0; n];
    let half = (n + 1) / 2;
    let mut z = 0.0;

    for i in 0..half {
        z = match i {
            0 => {
                let c = (2 * n + 1) as Real;
                c.sqrt() - 1.85575 * c.powf(-1.0 / 6.0)
            }
            1 => z - 1.14 * (n as Real).powf(0.426) / z,
            2 => 1.86 * z - 0.86 * x[0],
            3 => 1.91 * z - 0.91 * x[1],
            _ => 2.0 * z - x[i - 2],
        };

        let mut pp = 0.0;
        let mut delta = Real::INFINITY;
        let mut settled = false;
        for _ in 0..NEWTON_MAX_ITERATIONS {
            let (p1, p2) = scaled_hermite(n, z);
            pp = (2.0 * n as Real).sqrt() * p2;
            let z1 = z;
            z = z1 - p1 / pp;
            delta = (z - z1).abs();
            if delta <= NEWTON_EPS {
                settled = true;
                break;
            }
        }
        if !settled {
            return Err(Error::NonConvergence {
                iterations: NEWTON_MAX_ITERATIONS,
                residual: delta,
            });
        }

        x[i] = z;
        x[n - 1 - i] = -z;
        let wi = 2.0 / (pp * pp);
        w[i] = wi;
        w[n - 1 - i] = wi;
    }

    // Roots were filled from the largest down; callers expect ascending.
    x.reverse();
    w.reverse();
    Ok((x, w))
}

/// Quadrature measure for expectations over a mean-zero normal shock.
///
/// Holds abscissas `z_i = sqrt(2) * sigma * xi_i` (strictly increasing) and
/// weights normalized to sum to 1, so `sum_i w_i f(z_i)` approximates
/// `E[f(Z)]` with `Z ~ N(0, sigma^2)`.  A pure function of `(n, sigma)`;
/// callers may cache and reuse it freely.
#[derive(Debug, Clone)]
pub struct ShockQuadrature {
    nodes: Vec<Real>,
    weights: Vec<Real>,
    sigma: Real,
}

impl ShockQuadrature {
    /// Build an `n`-point shock quadrature for std-dev `sigma`.
    pub fn new(n: usize, sigma: Real) -> Result<Self> {
        fl_core::ensure!(sigma > 0.0, "shock std-dev must be positive, got {sigma}");
        let (xs, ws) = gauss_hermite(n)?;

        let scale = std::f64::consts::SQRT_2 * sigma;
        let norm = PI.sqrt();
        let nodes: Vec<Real> = xs.iter().map(|&xi| scale * xi).collect();
        let weights: Vec<Real> = ws.iter().map(|&wi| wi / norm).collect();

        let total: Real = weights.iter().sum();
        fl_core::ensure_post!(
            (total - 1.0).abs() < 1e-10,
            "normalized quadrature weights must sum to 1, got {total}"
        );

        Ok(Self {
            nodes,
            weights,
            sigma,
        })
    }

    /// Number of quadrature points.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the rule is empty (never true for a constructed rule).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Scaled abscissas, strictly increasing.
    pub fn nodes(&self) -> &[Real] {
        &self.nodes
    }

    /// Normalized weights, summing to 1.
    pub fn weights(&self) -> &[Real] {
        &self.weights
    }

    /// The shock std-dev the nodes were scaled by.
    pub fn sigma(&self) -> Real {
        self.sigma
    }

    /// Approximate `E[f(Z)]` for `Z ~ N(0, sigma^2)`.
    pub fn expectation<F: Fn(Real) -> Real>(&self, f: F) -> Real {
        self.nodes
            .iter()
            .zip(self.weights.iter())
            .map(|(&z, &w)| w * f(z))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_weights_sum_to_sqrt_pi() {
        for n in [1, 2, 5, 16, 31] {
            let (_, w) = gauss_hermite(n).unwrap();
            let sum: Real = w.iter().sum();
            assert!((sum - PI.sqrt()).abs() < 1e-10, "n={n}: sum={sum}");
        }
    }

    #[test]
    fn nodes_are_strictly_increasing_and_antisymmetric() {
        let (x, _) = gauss_hermite(31).unwrap();
        assert!(x.windows(2).all(|w| w[0] < w[1]));
        for i in 0..x.len() {
            assert!((x[i] + x[x.len() - 1 - i]).abs() < 1e-13);
        }
    }

    #[test]
    fn normalized_weights_sum_to_one() {
        let q = ShockQuadrature::new(31, 0.1).unwrap();
        let sum: Real = q.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-10);
    }

    #[test]
    fn matches_gaussian_moments() {
        let sigma = 0.1;
        let q = ShockQuadrature::new(31, sigma).unwrap();
        assert!((q.expectation(|_| 1.0) - 1.0).abs() < 1e-10);
        assert!(q.expectation(|z| z).abs() < 1e-12);
        assert!((q.expectation(|z| z * z) - sigma * sigma).abs() < 1e-10);
        let m4 = 3.0 * sigma.powi(4);
        assert!((q.expectation(|z| z.powi(4)) - m4).abs() < 1e-10);
    }

    #[test]
    fn accurate_for_smooth_non_polynomials() {
        let sigma = 0.5;
        let q = ShockQuadrature::new(31, sigma).unwrap();
        // E[e^Z] = e^{sigma^2/2}, E[cos Z] = e^{-sigma^2/2}
        let lognormal = (sigma * sigma / 2.0).exp();
        assert!((q.expectation(|z| z.exp()) - lognormal).abs() < 1e-8);
        let cosine = (-sigma * sigma / 2.0).exp();
        assert!((q.expectation(|z| z.cos()) - cosine).abs() < 1e-8);
    }

    #[test]
    fn degrades_gracefully_at_low_order() {
        let sigma = 0.5;
        let q = ShockQuadrature::new(7, sigma).unwrap();
        let lognormal = (sigma * sigma / 2.0).exp();
        assert!((q.expectation(|z| z.exp()) - lognormal).abs() < 1e-4);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(gauss_hermite(0).is_err());
        assert!(ShockQuadrature::new(31, 0.0).is_err());
        assert!(ShockQuadrature::new(31, -1.0).is_err());
    }
}
