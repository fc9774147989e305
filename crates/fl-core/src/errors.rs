//! Error types for the firmloc workspace.
//!
//! All numerical failures in the workspace are local and recoverable by the
//! caller (a different trial share, a different seed, a wider node grid), so
//! they are reported through a single `thiserror`-derived enum rather than
//! panics.  The `ensure!` and `fail!` macros cover the common
//! check-and-return pattern.

use thiserror::Error;

/// The top-level error type used throughout the firmloc workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Postcondition violated.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// A tridiagonal elimination pivot fell below tolerance.
    #[error("singular tridiagonal system: {0}")]
    SingularSystem(String),

    /// An iterative scheme exhausted its iteration budget.
    #[error("failed to converge after {iterations} iterations (last change {residual:.3e})")]
    NonConvergence {
        /// Iterations performed before giving up.
        iterations: usize,
        /// Magnitude of the last update step.
        residual: f64,
    },
}

/// Shorthand `Result` type used throughout the firmloc workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Check a precondition; return `Err(Error::Precondition(...))` if it fails.
///
/// # Example
/// ```
/// use fl_core::ensure;
/// fn positive(x: f64) -> fl_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Check a postcondition; return `Err(Error::Postcondition(...))` if it fails.
///
/// # Example
/// ```
/// use fl_core::ensure_post;
/// fn halve(x: f64) -> fl_core::errors::Result<f64> {
///     let result = x / 2.0;
///     ensure_post!(result.is_finite(), "result must be finite, got {result}");
///     Ok(result)
/// }
/// assert!(halve(1.0).is_ok());
/// assert!(halve(f64::INFINITY).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Return `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use fl_core::fail;
/// fn always_err() -> fl_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
