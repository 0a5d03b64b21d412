// turbulence.rs - Fractal noise for wind-like motion
//
// Octaves of Perlin noise folded into [0, 1].

use noise::{NoiseFn, Perlin};

pub struct Turbulence {
    perlin: Perlin,
}

impl Turbulence {
    pub fn new(seed: u32) -> Self {
        Self { perlin: Perlin::new(seed) }
    }

    /// Sum of `octaves` noise layers, each at twice the frequency and half the
    /// weight of the previous one. Output is in `[0, 1]`.
    pub fn sample(&self, x: f32, y: f32, octaves: u32) -> f32 {
        let octaves = octaves.max(1);
        let mut total = 0.0f64;
        let mut weight_sum = 0.0f64;
        let mut freq = 1.0f64;
        for _ in 0..octaves {
            let n = self.perlin.get([x as f64 * freq, y as f64 * freq]);
            let w = 1.0 / freq;
            total += (n * 0.5 + 0.5) * w;
            weight_sum += w;
            freq *= 2.0;
        }
        ((total / weight_sum) as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_unit_range_and_deterministic() {
        let a = Turbulence::new(5);
        let b = Turbulence::new(5);
        for i in 0..200 {
            let x = i as f32 * 0.37;
            let v = a.sample(x, x * 0.5, 4);
            assert!((0.0..=1.0).contains(&v));
            assert_eq!(v.to_bits(), b.sample(x, x * 0.5, 4).to_bits());
        }
    }
}
