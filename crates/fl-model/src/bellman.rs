//! Value function iteration for a fixed aggregate share.
//!
//! The discrete iteration operates directly on the quadrature-node samples:
//! with i.i.d. shocks the continuation expectation is the flat weighted sum
//! of the current iterate, which is exact because the quadrature nodes
//! coincide with the integration points.  The search variant additionally
//! previews realized next-period shocks in both cities through a 2-D
//! quadrature sum over spline-interpolated continuation values, which is
//! where off-grid evaluation (and hence the spline) enters.
//!
//! A solve is pure: it allocates its own working arrays, mutates them in
//! place across iterations, and returns fresh vectors, so concurrent solves
//! at different trial shares never share state.

use fl_core::{
    errors::{Error, Result},
    Real, Share,
};
use fl_math::interpolation::{Interpolation, NaturalCubicSpline};
use fl_math::quadrature::ShockQuadrature;

use crate::config::ModelConfig;

/// The outcome of a value function iteration at one trial share.
///
/// Immutable once returned.  `converged == false` means the iteration cap
/// was exhausted; the last iterate is still returned and the caller decides
/// whether that is fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct BellmanSolution {
    shocks: Vec<Real>,
    v1: Vec<Real>,
    v2: Vec<Real>,
    iterations: usize,
    converged: bool,
    sup_norm: Real,
}

impl BellmanSolution {
    /// Shock grid the value functions are sampled on.
    pub fn shocks(&self) -> &[Real] {
        &self.shocks
    }

    /// Value of being located in city 1, per node.
    pub fn v1(&self) -> &[Real] {
        &self.v1
    }

    /// Value of being located in city 2, per node.
    pub fn v2(&self) -> &[Real] {
        &self.v2
    }

    /// Iterations performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the sup-norm change fell below tolerance.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Sup-norm change of the last iteration.
    pub fn sup_norm(&self) -> Real {
        self.sup_norm
    }

    /// Build continuous interpolants of both value functions.
    pub fn interpolants(&self) -> Result<(NaturalCubicSpline, NaturalCubicSpline)> {
        let s1 = NaturalCubicSpline::new(&self.shocks, &self.v1)?;
        let s2 = NaturalCubicSpline::new(&self.shocks, &self.v2)?;
        Ok((s1, s2))
    }

    /// Error value describing this solution's convergence failure.
    pub(crate) fn non_convergence(&self) -> Error {
        Error::NonConvergence {
            iterations: self.iterations,
            residual: self.sup_norm,
        }
    }
}

/// Expected value of previewing realized next-period shocks in both cities:
/// `E[max(V_own(mean + e), V_other(mean + e') - moving_cost)]` over two
/// independent innovations.
fn search_continuation(
    own: &NaturalCubicSpline,
    other: &NaturalCubicSpline,
    mean: Real,
    quadrature: &ShockQuadrature,
    moving_cost: Real,
) -> Real {
    let own_vals: Vec<Real> = quadrature
        .nodes()
        .iter()
        .map(|&e| own.value(mean + e))
        .collect();
    let other_vals: Vec<Real> = quadrature
        .nodes()
        .iter()
        .map(|&e| other.value(mean + e) - moving_cost)
        .collect();
    let w = quadrature.weights();

    let mut acc = 0.0;
    for (j, &vo) in own_vals.iter().enumerate() {
        let mut inner = 0.0;
        for (k, &vn) in other_vals.iter().enumerate() {
            inner += w[k] * vo.max(vn);
        }
        acc += w[j] * inner;
    }
    acc
}

/// Iterate the discrete-choice Bellman operator to its fixed point at the
/// given aggregate share.
///
/// # Errors
/// Fails on an out-of-range share or when the search variant cannot build
/// its interpolants.  Exhausting `max_iterations` is *not* an error; see
/// [`BellmanSolution::converged`].
pub fn solve(
    config: &ModelConfig,
    quadrature: &ShockQuadrature,
    share: Share,
) -> Result<BellmanSolution> {
    fl_core::ensure!(
        share > 0.0 && share < 1.0,
        "aggregate share must lie in (0, 1), got {share}"
    );

    let n = quadrature.len();
    let z = quadrature.nodes();
    let w = quadrature.weights();
    let beta = config.discount_factor;
    let moving_cost = config.moving_cost;
    let rho = config.shock_persistence;

    // Flow profits are invariant across iterations.
    let p1: Vec<Real> = z.iter().map(|&zi| config.profit_city1(zi, share)).collect();
    let p2: Vec<Real> = z.iter().map(|&zi| config.profit_city2(zi, share)).collect();

    let mut v1 = vec![0.0; n];
    let mut v2 = vec![0.0; n];
    let mut next_v1 = vec![0.0; n];
    let mut next_v2 = vec![0.0; n];
    let mut sup_norm = Real::INFINITY;
    let mut converged = false;
    let mut iterations = 0;

    for it in 1..=config.max_iterations {
        iterations = it;
        let ev1: Real = w.iter().zip(v1.iter()).map(|(&wi, &vi)| wi * vi).sum();
        let ev2: Real = w.iter().zip(v2.iter()).map(|(&wi, &vi)| wi * vi).sum();

        // Fresh splines over the current iterate for the search preview.
        let search = match config.search_cost {
            Some(cost) => Some((
                cost,
                NaturalCubicSpline::new(z, &v1)?,
                NaturalCubicSpline::new(z, &v2)?,
            )),
            None => None,
        };

        for i in 0..n {
            let stay1 = p1[i] + beta * ev1;
            let relocate1 = p2[i] - moving_cost + beta * ev2;
            let mut best1 = stay1.max(relocate1);

            let stay2 = p2[i] + beta * ev2;
            let relocate2 = p1[i] - moving_cost + beta * ev1;
            let mut best2 = stay2.max(relocate2);

            if let Some((cost, s1, s2)) = &search {
                let mean = rho * z[i];
                best1 = best1.max(
                    p1[i] - cost + beta * search_continuation(s1, s2, mean, quadrature, moving_cost),
                );
                best2 = best2.max(
                    p2[i] - cost + beta * search_continuation(s2, s1, mean, quadrature, moving_cost),
                );
            }

            next_v1[i] = best1;
            next_v2[i] = best2;
        }

        sup_norm = 0.0;
        for i in 0..n {
            sup_norm = sup_norm
                .max((next_v1[i] - v1[i]).abs())
                .max((next_v2[i] - v2[i]).abs());
        }
        std::mem::swap(&mut v1, &mut next_v1);
        std::mem::swap(&mut v2, &mut next_v2);

        if sup_norm < config.tolerance {
            converged = true;
            break;
        }
    }

    Ok(BellmanSolution {
        shocks: z.to_vec(),
        v1,
        v2,
        iterations,
        converged,
        sup_norm,
    })
}
