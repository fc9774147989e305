//! Per-period profit functionals.
//!
//! Two structural variants are supported; the congestion share enters
//! either as a negative power (unbounded) or through a capacity term that
//! clips at zero.  Callers pick the variant in [`crate::ModelConfig`].

use fl_core::{Real, Share, Shock};

/// The mapping from (productivity shock, congestion share) to a firm's
/// per-period profit in a city.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProfitFunction {
    /// `exp(z) * share^(-theta)`.
    Isoelastic,
    /// `max(scale * exp(z) * (1 - share^theta), 0)`.
    BoundedCapacity {
        /// Productivity scale of the capacity term.
        scale: Real,
    },
}

impl ProfitFunction {
    /// Flow profit at shock `z` in a city hosting the fraction `share` of
    /// firms, with congestion elasticity `theta`.
    pub fn flow(&self, z: Shock, share: Share, theta: Real) -> Real {
        match *self {
            ProfitFunction::Isoelastic => z.exp() * share.powf(-theta),
            ProfitFunction::BoundedCapacity { scale } => {
                (scale * z.exp() * (1.0 - share.powf(theta))).max(0.0)
            }
        }
    }
}
