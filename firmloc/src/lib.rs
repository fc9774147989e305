//! # firmloc
//!
//! A two-city endogenous firm-location equilibrium solver: value function
//! iteration over a Gauss-Hermite shock grid, natural-cubic-spline
//! interpolation of the value functions, a bracketed fixed point on the
//! aggregate share, and Monte Carlo simulation of the transition path.
//!
//! This crate is a **facade** that re-exports the public items of the
//! underlying workspace crates.  Application code should depend on this
//! crate rather than the individual `fl-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! firmloc = "0.1"
//! ```
//!
//! ```rust
//! use firmloc::model::{equilibrium, ModelConfig};
//!
//! let config = ModelConfig::default();
//! let eq = equilibrium::solve(&config).unwrap();
//! assert!(eq.share > 0.0 && eq.share < 1.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use fl_core as core;

/// Numerical primitives: spline, quadrature, solvers, RNG, statistics.
pub use fl_math as math;

/// The two-city model: Bellman solver, equilibrium, simulation, sweeps.
pub use fl_model as model;
