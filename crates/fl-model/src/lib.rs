//! # fl-model
//!
//! The two-city endogenous firm-location model: a discrete-choice dynamic
//! program over a continuous productivity-shock space, solved by value
//! function iteration, closed in general equilibrium by a bracketed fixed
//! point on the aggregate share, and simulated forward by Monte Carlo.
//!
//! Every solver call takes an immutable [`ModelConfig`] and is pure with
//! respect to global state, so trial shares can be evaluated independently
//! (and, by the caller, in parallel).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Value function iteration for a fixed aggregate share.
pub mod bellman;

/// The immutable model configuration.
pub mod config;

/// The law-of-motion map, equilibrium fixed point, and decision rule.
pub mod equilibrium;

/// Per-period profit functionals.
pub mod profit;

/// Comparative-statics sweeps over parameter overrides.
pub mod sweep;

/// Monte Carlo simulation of the transition path.
pub mod transition;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use bellman::BellmanSolution;
pub use config::ModelConfig;
pub use equilibrium::{DecisionRule, Equilibrium, LawOfMotion};
pub use profit::ProfitFunction;
pub use sweep::{equilibrium_sweep, ParamOverride, SweepRecord};
pub use transition::{TransitionResult, TransitionSimulator};
