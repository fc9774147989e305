//! Monte Carlo simulation of the transition path.
//!
//! Each period the simulator re-solves the Bellman problem at the current
//! aggregate share, rebuilds the spline interpolants, draws a cross-section
//! of idiosyncratic productivity shocks, evaluates every firm's relocation
//! surplus through the splines, realizes moves against uniform draws, and
//! advances the share by the realized cross-sectional move rates.  The
//! share is recorded at the *start* of each period, so the first element of
//! the returned path equals the supplied initial share.
//!
//! Two granularities are supported through `path_count`: a single large
//! cross-section (law-of-large-numbers approximation) or several smaller
//! independent paths averaged together.

use fl_core::{errors::Result, Real, Share};
use fl_math::random_numbers::ShockRng;
use fl_math::{quadrature::ShockQuadrature, Statistics};

use crate::bellman;
use crate::config::ModelConfig;
use crate::equilibrium::DecisionRule;

/// Floor keeping the congestion term finite when a period empties a city.
const MIN_SHARE: Share = 1e-6;

/// The output of a simulation run.
#[derive(Debug, Clone)]
pub struct TransitionResult {
    /// Aggregate share per period, recorded pre-update and averaged across
    /// paths; `shares[0]` equals the initial share.
    pub shares: Vec<Share>,
    /// Average move probability per period (across both cities and paths).
    pub move_rates: Vec<Real>,
    /// Number of surplus evaluations outside the node grid.  A large count
    /// means drawn shocks repeatedly exceed the configured grid range and
    /// the node grid under-covers the shock distribution.
    pub out_of_range: usize,
}

/// Simulates the path of the aggregate share from an arbitrary initial
/// condition.
pub struct TransitionSimulator<'a> {
    config: &'a ModelConfig,
    quadrature: ShockQuadrature,
}

impl<'a> TransitionSimulator<'a> {
    /// Create a simulator for the given configuration.
    pub fn new(config: &'a ModelConfig) -> Result<Self> {
        config.validate()?;
        let quadrature = ShockQuadrature::new(config.node_count, config.shock_std_dev)?;
        Ok(Self { config, quadrature })
    }

    /// Run the simulation.
    ///
    /// * `initial_share` - the share of firms in city 1 at the start.
    /// * `horizon` - number of simulated periods.
    /// * `cross_section` - number of firms drawn per period and path.
    /// * `path_count` - independent sample paths averaged together; each
    ///   path seeds its own generator with `seed + path index`.
    pub fn run(
        &self,
        initial_share: Share,
        horizon: usize,
        cross_section: usize,
        path_count: usize,
    ) -> Result<TransitionResult> {
        fl_core::ensure!(
            initial_share > 0.0 && initial_share < 1.0,
            "initial share must lie in (0, 1), got {initial_share}"
        );
        fl_core::ensure!(horizon >= 1, "horizon must be at least 1");
        fl_core::ensure!(cross_section >= 1, "cross-section must be at least 1");
        fl_core::ensure!(path_count >= 1, "path count must be at least 1");

        let mut share_stats = vec![Statistics::new(); horizon];
        let mut rate_stats = vec![Statistics::new(); horizon];
        let mut out_of_range = 0;

        for path in 0..path_count {
            let mut rng = ShockRng::new(self.config.seed.wrapping_add(path as u64));
            self.run_path(
                initial_share,
                horizon,
                cross_section,
                &mut rng,
                &mut share_stats,
                &mut rate_stats,
                &mut out_of_range,
            )?;
        }

        Ok(TransitionResult {
            shares: share_stats
                .iter()
                .map(|s| s.mean().unwrap_or(initial_share))
                .collect(),
            move_rates: rate_stats.iter().map(|s| s.mean().unwrap_or(0.0)).collect(),
            out_of_range,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn run_path(
        &self,
        initial_share: Share,
        horizon: usize,
        cross_section: usize,
        rng: &mut ShockRng,
        share_stats: &mut [Statistics],
        rate_stats: &mut [Statistics],
        out_of_range: &mut usize,
    ) -> Result<()> {
        let config = self.config;
        let rho = config.shock_persistence;
        let sigma = config.shock_std_dev;

        // Stationary dispersion of the AR(1) state; equals sigma when iid.
        let initial_std = sigma / (1.0 - rho * rho).sqrt();
        let mut shocks: Vec<Real> = (0..cross_section)
            .map(|_| rng.next_normal(0.0, initial_std))
            .collect();
        let mut share = initial_share;

        for t in 0..horizon {
            share_stats[t].add(share);

            // Full re-optimization at the current share, every period.
            let solution = bellman::solve(config, &self.quadrature, share)?;
            if !solution.converged() {
                return Err(solution.non_convergence());
            }
            let rule = DecisionRule::new(config, &self.quadrature, share, &solution)?;

            let mut movers1 = 0usize;
            let mut movers2 = 0usize;
            for z in shocks.iter_mut() {
                *z = rho * *z + rng.next_normal(0.0, sigma);
                if !rule.is_in_range(*z) {
                    *out_of_range += 1;
                }
                if rng.next_uniform() < rule.move_probability(rule.surplus_city1(*z)) {
                    movers1 += 1;
                }
                if rng.next_uniform() < rule.move_probability(rule.surplus_city2(*z)) {
                    movers2 += 1;
                }
            }
            let rate1 = movers1 as Real / cross_section as Real;
            let rate2 = movers2 as Real / cross_section as Real;
            rate_stats[t].add(share * rate1 + (1.0 - share) * rate2);

            share = share * (1.0 - rate1) + (1.0 - share) * rate2;
            share = share.clamp(MIN_SHARE, 1.0 - MIN_SHARE);
        }
        Ok(())
    }
}
