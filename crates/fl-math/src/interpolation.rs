//! 1D interpolation trait and the natural cubic spline.
//!
//! The spline turns a value function known only at quadrature nodes into a
//! continuous function of the underlying shock.  Construction solves the
//! natural-boundary tridiagonal system for the second derivatives at each
//! node; evaluation locates the bracketing interval by binary search and
//! combines the stored ordinates and second derivatives.
//!
//! Queries outside `[x_min, x_max]` are not an error: the boundary
//! interval's cubic piece extrapolates.  With natural boundaries the second
//! derivative vanishes at the endpoints, so the extrapolation is close to
//! linear near the grid edge, but callers on stochastic inputs should still
//! watch [`Interpolation::is_in_range`] and treat repeated out-of-range
//! queries as a sign the node grid is too narrow.

use fl_core::{errors::Result, Real};

use crate::tridiagonal::TridiagonalOperator;

/// A 1D interpolation function `f: R -> R` defined by a set of known points.
pub trait Interpolation {
    /// Evaluate the interpolation at `x`.
    fn value(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the interpolation range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

/// A natural cubic spline interpolant.
///
/// Piecewise cubic, twice continuously differentiable, interpolates every
/// `(x_i, y_i)` exactly, and has zero second derivative at both endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalCubicSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    ydp: Vec<Real>,
}

impl NaturalCubicSpline {
    /// Build a natural cubic spline through `(xs, ys)`.
    ///
    /// Requires at least 3 points and strictly increasing abscissas.
    /// Construction is a pure function of the inputs: identical `(xs, ys)`
    /// yield identical second-derivative coefficients.
    ///
    /// # Errors
    /// Returns a precondition error on malformed inputs and
    /// [`fl_core::Error::SingularSystem`] when the node spacing degenerates.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        let n = xs.len();
        fl_core::ensure!(n >= 3, "natural cubic spline requires at least 3 points, got {n}");
        fl_core::ensure!(xs.len() == ys.len(), "xs and ys must have the same length");
        fl_core::ensure!(
            xs.windows(2).all(|w| w[0] < w[1]),
            "abscissas must be strictly increasing"
        );

        // Natural-boundary system for the second derivatives: boundary rows
        // pin ydp to 0, interior rows encode C2 continuity of the cubics.
        let mut op = TridiagonalOperator::new(n);
        let mut rhs = vec![0.0; n];
        op.diag[0] = 1.0;
        op.diag[n - 1] = 1.0;
        for i in 1..n - 1 {
            op.lower[i] = (xs[i] - xs[i - 1]) / 6.0;
            op.diag[i] = (xs[i + 1] - xs[i - 1]) / 3.0;
            op.upper[i] = (xs[i + 1] - xs[i]) / 6.0;
            rhs[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        }
        let ydp = op.solve(&rhs)?;

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            ydp,
        })
    }

    /// The second-derivative coefficients solved at construction.
    pub fn second_derivatives(&self) -> &[Real] {
        &self.ydp
    }

    /// Binary search: find `k` such that `xs[k] <= x < xs[k+1]`, clamped to
    /// the first/last interval for out-of-range queries.
    fn locate(&self, x: Real) -> usize {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return 0;
        }
        if x >= self.xs[n - 1] {
            return n - 2;
        }
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] <= x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Interval geometry at a query point: `(k, h, a, b)` where `h` is the
    /// interval width and `a`, `b` are the interpolation fractions.
    fn bracket(&self, x: Real) -> (usize, Real, Real, Real) {
        let k = self.locate(x);
        let h = self.xs[k + 1] - self.xs[k];
        let a = (self.xs[k + 1] - x) / h;
        let b = (x - self.xs[k]) / h;
        (k, h, a, b)
    }

    /// First derivative of the interpolant at `x`.
    pub fn derivative(&self, x: Real) -> Real {
        let (k, h, a, b) = self.bracket(x);
        (self.ys[k + 1] - self.ys[k]) / h
            - (3.0 * a * a - 1.0) / 6.0 * h * self.ydp[k]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.ydp[k + 1]
    }

    /// Second derivative of the interpolant at `x`.
    pub fn second_derivative(&self, x: Real) -> Real {
        let (k, _, a, b) = self.bracket(x);
        a * self.ydp[k] + b * self.ydp[k + 1]
    }
}

impl Interpolation for NaturalCubicSpline {
    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        *self.xs.last().unwrap()
    }

    fn value(&self, x: Real) -> Real {
        let (k, h, a, b) = self.bracket(x);
        a * self.ys[k]
            + b * self.ys[k + 1]
            + ((a * a * a - a) * self.ydp[k] + (b * b * b - b) * self.ydp[k + 1]) * h * h / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sin_spline(n: usize) -> NaturalCubicSpline {
        let xs: Vec<Real> = (0..n)
            .map(|i| -2.0 + 4.0 * i as Real / (n - 1) as Real)
            .collect();
        let ys: Vec<Real> = xs.iter().map(|&x| x.sin()).collect();
        NaturalCubicSpline::new(&xs, &ys).unwrap()
    }

    #[test]
    fn interpolates_every_node_exactly() {
        let xs = [0.0, 1.0, 2.5, 3.0, 4.0];
        let ys = [0.0, 1.0, 0.5, 2.0, 1.5];
        let s = NaturalCubicSpline::new(&xs, &ys).unwrap();
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let v = s.value(x);
            assert!((v - y).abs() < 1e-12, "at x={x}: expected {y}, got {v}");
        }
    }

    #[test]
    fn natural_boundary_second_derivatives_vanish() {
        let s = sin_spline(11);
        assert!(s.second_derivative(s.x_min()).abs() < 1e-12);
        assert!(s.second_derivative(s.x_max()).abs() < 1e-12);
    }

    #[test]
    fn reproduces_linear_data_everywhere() {
        let xs = [0.0, 0.7, 1.3, 2.0, 3.1];
        let ys: Vec<Real> = xs.iter().map(|&x| 2.0 * x - 1.0).collect();
        let s = NaturalCubicSpline::new(&xs, &ys).unwrap();
        // Linear data solves the system with ydp = 0, so the interpolant is
        // linear inside the grid and under boundary-segment extrapolation.
        for &x in &[-1.0, 0.35, 1.0, 2.9, 4.5] {
            let v = s.value(x);
            let expected = 2.0 * x - 1.0;
            assert!((v - expected).abs() < 1e-10, "at x={x}: got {v}");
            assert!((s.derivative(x) - 2.0).abs() < 1e-10);
        }
    }

    #[test]
    fn approximates_smooth_function_between_nodes() {
        let s = sin_spline(21);
        for i in 0..40 {
            let x = -1.95 + 3.9 * i as Real / 39.0;
            let v = s.value(x);
            assert!(
                (v - x.sin()).abs() < 1e-4,
                "at x={x}: spline {v}, sin {}",
                x.sin()
            );
        }
    }

    #[test]
    fn derivative_tracks_cosine() {
        let s = sin_spline(41);
        for i in 0..20 {
            let x = -1.8 + 3.6 * i as Real / 19.0;
            assert!(
                (s.derivative(x) - x.cos()).abs() < 1e-3,
                "at x={x}: d={}, cos={}",
                s.derivative(x),
                x.cos()
            );
        }
    }

    #[test]
    fn construction_is_idempotent() {
        let xs = [0.0, 0.4, 1.0, 1.9, 2.2, 3.0];
        let ys = [1.0, -0.5, 0.2, 2.0, 1.1, 0.0];
        let a = NaturalCubicSpline::new(&xs, &ys).unwrap();
        let b = NaturalCubicSpline::new(&xs, &ys).unwrap();
        assert_eq!(a.second_derivatives(), b.second_derivatives());
    }

    #[test]
    fn rejects_malformed_inputs() {
        assert!(NaturalCubicSpline::new(&[0.0, 1.0], &[0.0, 1.0]).is_err());
        assert!(NaturalCubicSpline::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).is_err());
        assert!(NaturalCubicSpline::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]).is_err());
        assert!(NaturalCubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0]).is_err());
    }

    #[test]
    fn out_of_range_queries_use_boundary_segment() {
        let s = sin_spline(11);
        assert!(!s.is_in_range(-3.0));
        assert!(s.is_in_range(0.0));
        // Continuous across the boundary.
        let inside = s.value(s.x_max() - 1e-9);
        let outside = s.value(s.x_max() + 1e-9);
        assert!((inside - outside).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_exact_at_nodes_and_idempotent(
            raw in proptest::collection::vec((0.1f64..1.0, -10.0f64..10.0), 3..12)
        ) {
            let mut x = 0.0;
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for (dx, y) in raw {
                x += dx;
                xs.push(x);
                ys.push(y);
            }
            let s = NaturalCubicSpline::new(&xs, &ys).unwrap();
            for (&xi, &yi) in xs.iter().zip(ys.iter()) {
                prop_assert!((s.value(xi) - yi).abs() < 1e-9 * (1.0 + yi.abs()));
            }
            let t = NaturalCubicSpline::new(&xs, &ys).unwrap();
            prop_assert_eq!(s.second_derivatives(), t.second_derivatives());
        }
    }
}
