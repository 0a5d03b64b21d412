// random.rs - Scene-owned random source
//
// Every scene holds its own generator so preview thumbnails can be replayed
// from a fixed seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed) }
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }

    /// Uniform in `[0, max)`.
    #[inline]
    pub fn below(&mut self, max: f32) -> f32 {
        self.next() * max
    }

    /// Uniform in `[lo, hi)`. A degenerate range returns `lo`.
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next()
    }

    /// Uniform slot index in `0..n`; `n` must be non-zero.
    #[inline]
    pub fn index(&mut self, n: usize) -> usize {
        ((self.next() * n as f32) as usize).min(n - 1)
    }

    /// Fair coin.
    #[inline]
    pub fn coin(&mut self) -> bool {
        self.next() > 0.5
    }

    /// Standard normal sample (Box-Muller).
    pub fn gauss(&mut self) -> f32 {
        let u1 = self.next().max(f32::MIN_POSITIVE);
        let u2 = self.next();
        (-2.0 * u1.ln()).sqrt() * (core::f32::consts::TAU * u2).cos()
    }
}
