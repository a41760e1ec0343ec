//! Seeded random streams.
//!
//! One `SimRng` per run drives Poisson spike trains and probabilistic
//! connection masks; each projection draws from its own `child` stream.
//! Random-distribution components get a `StreamRng` each, numbered in
//! declaration order, so appending a distribution to a model leaves the
//! samples of the existing ones unchanged.
//!
//! Stream seeds are `seed ^ (stream * GOLDEN)`, with `GOLDEN` the 64-bit
//! fractional part of the golden ratio.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

#[inline]
fn mixed(seed: u64, stream: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed ^ stream.wrapping_mul(GOLDEN))
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// The run's master generator.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Split off an independent generator for `stream` (a projection id).
    /// Advances `self` by one draw.
    pub fn child(&mut self, stream: u64) -> SimRng {
        let seed = self.0.r#gen::<u64>();
        SimRng(mixed(seed, stream))
    }

    /// For `rand_distr` samplers.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen()
    }

    /// `true` with probability `p`; `p` outside `[0, 1]` is clamped.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── StreamRng ─────────────────────────────────────────────────────────────────

/// Generator owned by one random-distribution component.
pub struct StreamRng(SmallRng);

impl StreamRng {
    pub fn new(seed: u64, stream: u64) -> Self {
        StreamRng(mixed(seed, stream))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}
