//! The immutable model configuration.
//!
//! Structural parameters are passed into every solver call as one explicit
//! structure; nothing in the workspace reads parameters from module-level
//! state.  `Default` is the baseline two-city scenario.

use fl_core::{errors::Result, Real, Share, Shock};

use crate::profit::ProfitFunction;

/// Structural parameters of the two-city firm-location model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelConfig {
    /// Discount factor, in (0, 1).
    pub discount_factor: Real,
    /// Congestion elasticity: how strongly profitability declines as more
    /// firms locate in the same city.
    pub congestion_elasticity: Real,
    /// Fixed cost paid by a relocating firm.
    pub moving_cost: Real,
    /// Cost of previewing next-period shocks in both cities before the
    /// relocation decision.  `Some` enables the search variant of the
    /// Bellman operator.
    pub search_cost: Option<Real>,
    /// Std-dev of the productivity-shock innovation.
    pub shock_std_dev: Real,
    /// AR(1) persistence of the idiosyncratic shock; 0 is the i.i.d. variant.
    pub shock_persistence: Real,
    /// Dispersion of the idiosyncratic relocation preference shock; 0 yields
    /// the deterministic threshold rule.
    pub taste_shock_scale: Real,
    /// Additive log-productivity advantage of city 1; 0 keeps the two
    /// cities symmetric.
    pub productivity_gap: Real,
    /// Per-period profit functional.
    pub profit: ProfitFunction,
    /// Number of quadrature nodes.
    pub node_count: usize,
    /// Sup-norm convergence tolerance for iterative solvers.
    pub tolerance: Real,
    /// Iteration cap for the value function iteration.
    pub max_iterations: usize,
    /// Base seed for simulation randomness; each sample path offsets it by
    /// its path index.
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            discount_factor: 0.95,
            congestion_elasticity: 0.4,
            moving_cost: 0.25,
            search_cost: None,
            shock_std_dev: 0.1,
            shock_persistence: 0.0,
            taste_shock_scale: 0.5,
            productivity_gap: 0.0,
            profit: ProfitFunction::Isoelastic,
            node_count: 31,
            tolerance: 1e-8,
            max_iterations: 1_000,
            seed: 42,
        }
    }
}

impl ModelConfig {
    /// Check that every parameter lies in its admissible range.
    pub fn validate(&self) -> Result<()> {
        fl_core::ensure!(
            self.discount_factor > 0.0 && self.discount_factor < 1.0,
            "discount factor must lie in (0, 1), got {}",
            self.discount_factor
        );
        fl_core::ensure!(
            self.congestion_elasticity > 0.0,
            "congestion elasticity must be positive, got {}",
            self.congestion_elasticity
        );
        fl_core::ensure!(
            self.moving_cost >= 0.0,
            "moving cost must be non-negative, got {}",
            self.moving_cost
        );
        if let Some(cost) = self.search_cost {
            fl_core::ensure!(cost >= 0.0, "search cost must be non-negative, got {cost}");
        }
        fl_core::ensure!(
            self.shock_std_dev > 0.0,
            "shock std-dev must be positive, got {}",
            self.shock_std_dev
        );
        fl_core::ensure!(
            (0.0..1.0).contains(&self.shock_persistence),
            "shock persistence must lie in [0, 1), got {}",
            self.shock_persistence
        );
        fl_core::ensure!(
            self.taste_shock_scale >= 0.0,
            "taste-shock scale must be non-negative, got {}",
            self.taste_shock_scale
        );
        fl_core::ensure!(
            self.productivity_gap.is_finite(),
            "productivity gap must be finite, got {}",
            self.productivity_gap
        );
        fl_core::ensure!(
            self.node_count >= 3,
            "node count must be at least 3, got {}",
            self.node_count
        );
        fl_core::ensure!(
            self.tolerance > 0.0,
            "tolerance must be positive, got {}",
            self.tolerance
        );
        fl_core::ensure!(
            self.max_iterations >= 1,
            "max iterations must be at least 1, got {}",
            self.max_iterations
        );
        Ok(())
    }

    /// Per-period profit of a firm in city 1 with shock `z` when city 1
    /// hosts the fraction `share` of firms.
    pub fn profit_city1(&self, z: Shock, share: Share) -> Real {
        self.profit
            .flow(z + self.productivity_gap, share, self.congestion_elasticity)
    }

    /// Per-period profit of a firm in city 2 with shock `z`: the mirror of
    /// city 1, with the complementary share and the negated shock.
    pub fn profit_city2(&self, z: Shock, share: Share) -> Real {
        self.profit.flow(-z, 1.0 - share, self.congestion_elasticity)
    }
}
