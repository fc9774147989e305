//! Tridiagonal matrix operator with a Thomas-algorithm solver.
//!
//! The natural-spline smoothness constraints produce a tridiagonal linear
//! system for the unknown second derivatives; this module solves it.  The
//! elimination fails fast when a pivot magnitude falls below tolerance,
//! which signals degenerate (too-close) node spacing, rather than letting a
//! near-singular solve poison the interpolant downstream.

use fl_core::{
    errors::{Error, Result},
    Real,
};

/// Smallest pivot magnitude accepted during forward elimination.
pub const PIVOT_TOLERANCE: Real = 1.0e-12;

/// A tridiagonal matrix operator.
///
/// Stores the lower, diagonal, and upper bands of an `n x n` matrix.
#[derive(Debug, Clone)]
pub struct TridiagonalOperator {
    /// Lower diagonal (index 0 unused, starts from row 1).
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Upper diagonal (last index unused, ends at row n-2).
    pub upper: Vec<Real>,
}

impl TridiagonalOperator {
    /// Create a zero tridiagonal operator of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Size (number of rows/columns).
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Apply the operator: `y = A . x`.
    pub fn apply(&self, x: &[Real]) -> Vec<Real> {
        let n = self.size();
        assert_eq!(x.len(), n);
        let mut y = vec![0.0; n];
        y[0] = self.diag[0] * x[0] + self.upper[0] * x[1];
        for i in 1..n - 1 {
            y[i] = self.lower[i] * x[i - 1] + self.diag[i] * x[i] + self.upper[i] * x[i + 1];
        }
        y[n - 1] = self.lower[n - 1] * x[n - 2] + self.diag[n - 1] * x[n - 1];
        y
    }

    /// Solve `A . x = rhs` using the Thomas algorithm.
    ///
    /// # Errors
    /// Returns [`Error::SingularSystem`] when an elimination pivot magnitude
    /// falls below [`PIVOT_TOLERANCE`].
    pub fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        let n = self.size();
        assert_eq!(rhs.len(), n);

        // Forward sweep
        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        if self.diag[0].abs() < PIVOT_TOLERANCE {
            return Err(Error::SingularSystem(format!(
                "pivot {:.3e} below tolerance at row 0",
                self.diag[0]
            )));
        }
        c_prime[0] = self.upper[0] / self.diag[0];
        d_prime[0] = rhs[0] / self.diag[0];

        for i in 1..n {
            let m = self.diag[i] - self.lower[i] * c_prime[i - 1];
            if m.abs() < PIVOT_TOLERANCE {
                return Err(Error::SingularSystem(format!(
                    "pivot {m:.3e} below tolerance at row {i}"
                )));
            }
            if i < n - 1 {
                c_prime[i] = self.upper[i] / m;
            }
            d_prime[i] = (rhs[i] - self.lower[i] * d_prime[i - 1]) / m;
        }

        // Back substitution
        let mut x = vec![0.0; n];
        x[n - 1] = d_prime[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = d_prime[i] - c_prime[i] * x[i + 1];
        }

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_identity() {
        let mut op = TridiagonalOperator::new(4);
        for i in 0..4 {
            op.diag[i] = 1.0;
        }
        let rhs = vec![1.0, 2.0, 3.0, 4.0];
        let x = op.solve(&rhs).unwrap();
        for i in 0..4 {
            assert!((x[i] - rhs[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn solves_hand_checked_system() {
        // A = [[2, -1, 0], [-1, 2, -1], [0, -1, 2]], x = [1, 2, 3], Ax = [0, 0, 4]
        let mut op = TridiagonalOperator::new(3);
        op.diag = vec![2.0, 2.0, 2.0];
        op.lower = vec![0.0, -1.0, -1.0];
        op.upper = vec![-1.0, -1.0, 0.0];
        let rhs = vec![0.0, 0.0, 4.0];
        let x = op.solve(&rhs).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
        assert!((x[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn solve_round_trips_with_apply() {
        let mut op = TridiagonalOperator::new(5);
        op.diag = vec![4.0, 4.0, 4.0, 4.0, 4.0];
        op.lower = vec![0.0, 1.0, 1.0, 1.0, 1.0];
        op.upper = vec![1.0, 1.0, 1.0, 1.0, 0.0];
        let x_true = vec![0.5, -1.0, 2.0, 0.0, 3.0];
        let rhs = op.apply(&x_true);
        let x = op.solve(&rhs).unwrap();
        for i in 0..5 {
            assert!((x[i] - x_true[i]).abs() < 1e-12, "x[{i}] = {}", x[i]);
        }
    }

    #[test]
    fn vanishing_pivot_is_an_error() {
        // Row 1 pivot: diag[1] - lower[1] * upper[0] / diag[0] = 1 - 1 = 0
        let mut op = TridiagonalOperator::new(3);
        op.diag = vec![1.0, 1.0, 1.0];
        op.lower = vec![0.0, 1.0, 0.0];
        op.upper = vec![1.0, 0.0, 0.0];
        let err = op.solve(&[1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::SingularSystem(_)), "got {err:?}");
    }
}
