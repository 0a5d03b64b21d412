// math/ - Numeric helpers shared by every scene
//
// Pure functions plus the scene-owned random source.
// No scene state lives here.

mod color;
mod random;
mod turbulence;

pub use color::*;
pub use random::Random;
pub use turbulence::Turbulence;

/// Linear interpolation from `a` to `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where `v` sits between `a` and `b`, as a fraction (inverse of `lerp`).
#[inline]
pub fn norm(a: f32, b: f32, v: f32) -> f32 {
    (v - a) / (b - a)
}

/// Remap `v` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`.
#[inline]
pub fn remap(in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32, v: f32) -> f32 {
    lerp(out_lo, out_hi, norm(in_lo, in_hi, v))
}

/// Radians to degrees.
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians.to_degrees()
}
