//! Comparative-statics sweeps over parameter overrides.
//!
//! A sweep solves for the equilibrium share at each parameter case and
//! records the outcome per case; a failed point is recorded as failed and
//! the sweep continues, so one bad parameterization never aborts a table.

use fl_core::{errors::Result, Real, Share};

use crate::config::ModelConfig;
use crate::equilibrium;
use crate::profit::ProfitFunction;

/// A single parameter override applied on top of a base configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamOverride {
    /// Set the discount factor.
    DiscountFactor(Real),
    /// Set the congestion elasticity.
    CongestionElasticity(Real),
    /// Set the moving cost.
    MovingCost(Real),
    /// Set (or clear) the search cost.
    SearchCost(Option<Real>),
    /// Set the shock std-dev.
    ShockStdDev(Real),
    /// Set the shock persistence.
    ShockPersistence(Real),
    /// Set the taste-shock scale.
    TasteShockScale(Real),
    /// Set the city-1 productivity gap.
    ProductivityGap(Real),
    /// Set the profit functional.
    Profit(ProfitFunction),
    /// Set the quadrature node count.
    NodeCount(usize),
    /// Set the convergence tolerance.
    Tolerance(Real),
    /// Set the iteration cap.
    MaxIterations(usize),
    /// Set the simulation seed.
    Seed(u64),
}

impl ParamOverride {
    /// Apply this override to a configuration.
    pub fn apply_to(&self, config: &mut ModelConfig) {
        match *self {
            ParamOverride::DiscountFactor(v) => config.discount_factor = v,
            ParamOverride::CongestionElasticity(v) => config.congestion_elasticity = v,
            ParamOverride::MovingCost(v) => config.moving_cost = v,
            ParamOverride::SearchCost(v) => config.search_cost = v,
            ParamOverride::ShockStdDev(v) => config.shock_std_dev = v,
            ParamOverride::ShockPersistence(v) => config.shock_persistence = v,
            ParamOverride::TasteShockScale(v) => config.taste_shock_scale = v,
            ParamOverride::ProductivityGap(v) => config.productivity_gap = v,
            ParamOverride::Profit(v) => config.profit = v,
            ParamOverride::NodeCount(v) => config.node_count = v,
            ParamOverride::Tolerance(v) => config.tolerance = v,
            ParamOverride::MaxIterations(v) => config.max_iterations = v,
            ParamOverride::Seed(v) => config.seed = v,
        }
    }
}

/// The outcome of one sweep case.
#[derive(Debug, Clone)]
pub struct SweepRecord {
    /// The overrides this case applied to the base configuration.
    pub overrides: Vec<ParamOverride>,
    /// The equilibrium share, or the error that made the point fail.
    pub share: Result<Share>,
}

/// Solve for the equilibrium share under each list of overrides.
///
/// Cases are independent; output order matches input order.
pub fn equilibrium_sweep(base: &ModelConfig, cases: &[Vec<ParamOverride>]) -> Vec<SweepRecord> {
    cases
        .iter()
        .map(|case| {
            let mut config = base.clone();
            for o in case {
                o.apply_to(&mut config);
            }
            SweepRecord {
                overrides: case.clone(),
                share: equilibrium::solve(&config).map(|eq| eq.share),
            }
        })
        .collect()
}
