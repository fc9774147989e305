//! The law-of-motion map, equilibrium fixed point, and decision rule.
//!
//! `phi(alpha)` is the expected next-period share of firms in city 1 when
//! every firm relocates optimally given the value functions solved at
//! `alpha`.  The equilibrium share is the root of `phi(alpha) - alpha` on
//! an interior bracket, found with Brent's method; a bracket without a sign
//! change is an explicit error, never a silently returned endpoint.

use fl_core::{errors::Result, Real, Share, Shock};
use fl_math::interpolation::{Interpolation, NaturalCubicSpline};
use fl_math::quadrature::ShockQuadrature;
use fl_math::solvers1d::brent;

use crate::bellman::{self, BellmanSolution};
use crate::config::ModelConfig;

/// Interior bracket searched for the equilibrium share.  Assumes an
/// interior equilibrium exists and is unique within this band.
pub const SHARE_BRACKET: (Share, Share) = (0.05, 0.95);

/// Probability that a firm relocates given its surplus of moving.
///
/// With `taste_scale == 0` this is the hard threshold rule (move iff the
/// surplus is strictly positive); otherwise the logistic-smoothed choice
/// probability.
pub fn move_probability(surplus: Real, taste_scale: Real) -> Real {
    if taste_scale == 0.0 {
        if surplus > 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 / (1.0 + (-surplus / taste_scale).exp())
    }
}

/// The relocation decision rule implied by a solved Bellman problem.
///
/// Evaluates the surplus of moving at arbitrary (off-grid) shock values
/// through the spline interpolants, comparing the relocate branch (the
/// other city's profit now, continuation there, minus the moving cost)
/// against the stay branch.
pub struct DecisionRule<'a> {
    config: &'a ModelConfig,
    quadrature: &'a ShockQuadrature,
    share: Share,
    v1: NaturalCubicSpline,
    v2: NaturalCubicSpline,
    /// With i.i.d. shocks the continuation values do not depend on the
    /// current shock; cache them.
    iid_continuations: Option<(Real, Real)>,
}

impl<'a> DecisionRule<'a> {
    /// Build the decision rule from a converged Bellman solution.
    pub fn new(
        config: &'a ModelConfig,
        quadrature: &'a ShockQuadrature,
        share: Share,
        solution: &BellmanSolution,
    ) -> Result<Self> {
        let (v1, v2) = solution.interpolants()?;
        let iid_continuations = if config.shock_persistence == 0.0 {
            let c1 = quadrature.expectation(|e| v1.value(e));
            let c2 = quadrature.expectation(|e| v2.value(e));
            Some((c1, c2))
        } else {
            None
        };
        Ok(Self {
            config,
            quadrature,
            share,
            v1,
            v2,
            iid_continuations,
        })
    }

    fn continuation_city1(&self, z: Shock) -> Real {
        match self.iid_continuations {
            Some((c1, _)) => c1,
            None => {
                let mean = self.config.shock_persistence * z;
                self.quadrature.expectation(|e| self.v1.value(mean + e))
            }
        }
    }

    fn continuation_city2(&self, z: Shock) -> Real {
        match self.iid_continuations {
            Some((_, c2)) => c2,
            None => {
                let mean = self.config.shock_persistence * z;
                self.quadrature.expectation(|e| self.v2.value(mean + e))
            }
        }
    }

    /// Surplus of relocating for a firm currently in city 1 with shock `z`.
    pub fn surplus_city1(&self, z: Shock) -> Real {
        let beta = self.config.discount_factor;
        let stay = self.config.profit_city1(z, self.share) + beta * self.continuation_city1(z);
        let relocate = self.config.profit_city2(z, self.share) - self.config.moving_cost
            + beta * self.continuation_city2(z);
        relocate - stay
    }

    /// Surplus of relocating for a firm currently in city 2 with shock `z`.
    pub fn surplus_city2(&self, z: Shock) -> Real {
        let beta = self.config.discount_factor;
        let stay = self.config.profit_city2(z, self.share) + beta * self.continuation_city2(z);
        let relocate = self.config.profit_city1(z, self.share) - self.config.moving_cost
            + beta * self.continuation_city1(z);
        relocate - stay
    }

    /// Move probability at the given surplus under this configuration.
    pub fn move_probability(&self, surplus: Real) -> Real {
        move_probability(surplus, self.config.taste_shock_scale)
    }

    /// Whether `z` lies inside the interpolation grid.
    pub fn is_in_range(&self, z: Shock) -> bool {
        self.v1.is_in_range(z)
    }
}

/// One evaluation of the law-of-motion map.
#[derive(Debug)]
pub struct LawOfMotion {
    /// Expected next-period share of firms in city 1.
    pub phi: Real,
    /// Quadrature-weighted move probability of city-1 firms.
    pub move_rate_city1: Real,
    /// Quadrature-weighted move probability of city-2 firms.
    pub move_rate_city2: Real,
    /// The Bellman solution at the trial share.
    pub solution: BellmanSolution,
}

/// Evaluate `phi(alpha)`: solve the Bellman problem at the trial share and
/// aggregate the optimal relocation probabilities over the shock measure.
///
/// # Errors
/// Propagates Bellman failures; an unconverged value function iteration is
/// treated as fatal here, since a biased `phi` would silently corrupt the
/// root search.
pub fn law_of_motion(
    config: &ModelConfig,
    quadrature: &ShockQuadrature,
    share: Share,
) -> Result<LawOfMotion> {
    let solution = bellman::solve(config, quadrature, share)?;
    if !solution.converged() {
        return Err(solution.non_convergence());
    }
    let rule = DecisionRule::new(config, quadrature, share, &solution)?;

    let mut rate1 = 0.0;
    let mut rate2 = 0.0;
    for (&z, &w) in quadrature.nodes().iter().zip(quadrature.weights()) {
        rate1 += w * rule.move_probability(rule.surplus_city1(z));
        rate2 += w * rule.move_probability(rule.surplus_city2(z));
    }
    let phi = share * (1.0 - rate1) + (1.0 - share) * rate2;

    Ok(LawOfMotion {
        phi,
        move_rate_city1: rate1,
        move_rate_city2: rate2,
        solution,
    })
}

/// An equilibrium of the two-city model.
#[derive(Debug)]
pub struct Equilibrium {
    /// The equilibrium share of firms in city 1.
    pub share: Share,
    /// `|phi(share) - share|` at the returned share.
    pub residual: Real,
    /// The Bellman solution at the equilibrium share.
    pub solution: BellmanSolution,
}

/// Find the share `alpha*` with `phi(alpha*) = alpha*` inside
/// [`SHARE_BRACKET`].
///
/// # Errors
/// Fails with a precondition error when `phi(alpha) - alpha` does not
/// change sign across the bracket, which indicates either no interior
/// equilibrium or a parameterization outside the validated regime.
pub fn solve(config: &ModelConfig) -> Result<Equilibrium> {
    config.validate()?;
    let quadrature = ShockQuadrature::new(config.node_count, config.shock_std_dev)?;
    let (lo, hi) = SHARE_BRACKET;

    let share = brent(
        |a| law_of_motion(config, &quadrature, a).map(|lom| lom.phi - a),
        lo,
        hi,
        config.tolerance,
    )?;
    let at_root = law_of_motion(config, &quadrature, share)?;

    Ok(Equilibrium {
        share,
        residual: (at_root.phi - share).abs(),
        solution: at_root.solution,
    })
}

/// The deterministic relocation threshold `z*` for city-1 firms at the
/// given share: the shock at which the surplus of moving crosses zero.
/// Under the threshold rule a city-1 firm moves iff `z < z*`.
///
/// # Errors
/// Fails when the surplus does not change sign across the node range.
pub fn deterministic_cutoff(config: &ModelConfig, share: Share) -> Result<Real> {
    config.validate()?;
    let quadrature = ShockQuadrature::new(config.node_count, config.shock_std_dev)?;
    let solution = bellman::solve(config, &quadrature, share)?;
    if !solution.converged() {
        return Err(solution.non_convergence());
    }
    let rule = DecisionRule::new(config, &quadrature, share, &solution)?;

    let lo = quadrature.nodes()[0];
    let hi = quadrature.nodes()[quadrature.len() - 1];
    brent(|z| Ok(rule.surplus_city1(z)), lo, hi, config.tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use fl_core::Error;

    #[test]
    fn symmetric_baseline_equilibrium_is_one_half() {
        let config = ModelConfig::default();
        let eq = solve(&config).unwrap();
        assert!(eq.share > SHARE_BRACKET.0 && eq.share < SHARE_BRACKET.1);
        assert_abs_diff_eq!(eq.share, 0.5, epsilon = 1e-6);
        assert!(eq.residual < 1e-6, "residual {}", eq.residual);
        assert!(eq.solution.converged());
    }

    #[test]
    fn map_pulls_toward_the_interior() {
        let config = ModelConfig::default();
        let quadrature = ShockQuadrature::new(config.node_count, config.shock_std_dev).unwrap();
        let below = law_of_motion(&config, &quadrature, 0.3).unwrap();
        let above = law_of_motion(&config, &quadrature, 0.7).unwrap();
        assert!(below.phi > 0.3, "phi(0.3) = {}", below.phi);
        assert!(above.phi < 0.7, "phi(0.7) = {}", above.phi);
    }

    #[test]
    fn move_rates_are_probabilities() {
        let config = ModelConfig::default();
        let quadrature = ShockQuadrature::new(config.node_count, config.shock_std_dev).unwrap();
        let lom = law_of_motion(&config, &quadrature, 0.4).unwrap();
        for rate in [lom.move_rate_city1, lom.move_rate_city2] {
            assert!((0.0..=1.0).contains(&rate), "rate {rate}");
        }
    }

    #[test]
    fn productivity_gap_shifts_the_equilibrium_toward_city1() {
        let mut config = ModelConfig::default();
        config.productivity_gap = 0.2;
        let eq = solve(&config).unwrap();
        assert!(eq.share > 0.505, "share {}", eq.share);
    }

    #[test]
    fn missing_sign_change_is_an_explicit_error() {
        // An overwhelming city-1 advantage pins the map above the diagonal
        // on the whole bracket.
        let mut config = ModelConfig::default();
        config.productivity_gap = 5.0;
        let err = solve(&config).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)), "got {err:?}");
    }

    #[test]
    fn cutoff_matches_analytic_formula_at_symmetric_share() {
        // At alpha = 1/2 with i.i.d. shocks the continuation terms cancel,
        // so the surplus is c*(e^{-z} - e^{z}) - m with c = 0.5^{-theta},
        // giving z* = -asinh(m / (2c)).
        let config = ModelConfig::default();
        let cutoff = deterministic_cutoff(&config, 0.5).unwrap();
        let c = 0.5_f64.powf(-config.congestion_elasticity);
        let expected = -(config.moving_cost / (2.0 * c)).asinh();
        assert_abs_diff_eq!(cutoff, expected, epsilon = 1e-6);
    }

    #[test]
    fn doubling_the_moving_cost_lowers_the_cutoff() {
        let config = ModelConfig::default();
        let base = deterministic_cutoff(&config, 0.5).unwrap();

        let mut doubled = config.clone();
        doubled.moving_cost *= 2.0;
        let shifted = deterministic_cutoff(&doubled, 0.5).unwrap();

        assert!(
            shifted < base - 1e-3,
            "z*(2m) = {shifted} should be below z*(m) = {base}"
        );
    }

    #[test]
    fn threshold_rule_is_the_zero_taste_limit() {
        // Logistic probabilities collapse onto the indicator as the taste
        // scale shrinks.
        for &surplus in &[-0.4, -0.01, 0.01, 0.4] {
            let hard = move_probability(surplus, 0.0);
            let soft = move_probability(surplus, 1e-4);
            assert!((hard - soft).abs() < 1e-10, "surplus {surplus}");
        }
        assert_eq!(move_probability(0.0, 0.0), 0.0);
    }

    #[test]
    fn decisions_match_the_cutoff_under_zero_taste_scale() {
        let mut config = ModelConfig::default();
        config.taste_shock_scale = 0.0;
        let cutoff = deterministic_cutoff(&config, 0.5).unwrap();

        let quadrature = ShockQuadrature::new(config.node_count, config.shock_std_dev).unwrap();
        let solution = bellman::solve(&config, &quadrature, 0.5).unwrap();
        let rule = DecisionRule::new(&config, &quadrature, 0.5, &solution).unwrap();

        for &z in quadrature.nodes() {
            if (z - cutoff).abs() < 1e-6 {
                continue;
            }
            let p = rule.move_probability(rule.surplus_city1(z));
            let expected = if z < cutoff { 1.0 } else { 0.0 };
            assert_eq!(p, expected, "z = {z}, cutoff = {cutoff}");
        }
    }
}
