//! Seeded random number generators.
//!
//! All randomness in the workspace flows through explicit generator handles
//! seeded by the caller; there is no ambient RNG state.  Simulation code
//! creates one [`ShockRng`] per sample path (seed offset by the path index)
//! so runs are reproducible and paths are independent.

use fl_core::Real;
use rand_mt::Mt19937GenRand64;

use crate::distributions::normal_cdf_inverse;

/// A uniform pseudo-random number generator based on the Mersenne Twister
/// MT19937-64 algorithm.
pub struct UniformRng {
    rng: Mt19937GenRand64,
}

impl UniformRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }

    /// Generate the next uniform deviate in `[0, 1)`.
    pub fn next_real(&mut self) -> Real {
        let u: u64 = self.rng.next_u64();
        u as f64 / (u64::MAX as f64 + 1.0)
    }
}

/// Draws idiosyncratic shocks for the transition simulator: uniforms for
/// realized relocation decisions, normals (by inverse-CDF transform of the
/// same underlying stream) for productivity innovations.
pub struct ShockRng {
    uniform: UniformRng,
}

impl ShockRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            uniform: UniformRng::new(seed),
        }
    }

    /// Next uniform deviate in `[0, 1)`.
    pub fn next_uniform(&mut self) -> Real {
        self.uniform.next_real()
    }

    /// Next standard normal deviate.
    pub fn next_standard_normal(&mut self) -> Real {
        // Avoid exact 0, which would map to -inf.
        let u = loop {
            let u = self.uniform.next_real();
            if u > 0.0 {
                break u;
            }
        };
        normal_cdf_inverse(u)
    }

    /// Next normal deviate with the given mean and std-dev.
    pub fn next_normal(&mut self, mean: Real, std_dev: Real) -> Real {
        mean + std_dev * self.next_standard_normal()
    }
}
