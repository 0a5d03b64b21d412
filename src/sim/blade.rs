// blade.rs - Grass blades
//
// Each blade is a strip of quads climbing from the bottom of the screen. The
// strip bends by an angle eased toward a wind sample, each segment turning a
// little further than the one below (`hardness`).

use core::f32::consts::FRAC_PI_2;

use crate::math::{Random, Turbulence};
use crate::vertex::BladeVertex;

/// Screen pixels per tessellation step.
pub const TESSELLATION: f32 = 0.5;
const HALF_TESSELLATION: f32 = TESSELLATION * 0.5;

/// Largest bend, radians either way.
pub const MAX_BEND: f32 = 0.09;

/// Fraction of the gap to the wind angle closed per frame.
const EASE: f32 = 0.15;

/// Texture coordinates of the six vertices in each segment.
const SEGMENT_UV: [(f32, f32); 6] = [
    (0.0, 1.0),
    (0.0, 0.0),
    (1.0, 0.0),
    (0.0, 0.0),
    (1.0, 1.0),
    (1.0, 0.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Blade {
    /// Current bend, radians.
    pub angle: f32,
    /// Segment count.
    pub segments: usize,
    pub x: f32,
    pub y: f32,
    /// Rest bend added to the wind.
    pub offset: f32,
    pub scale: f32,
    pub length_x: f32,
    pub length_y: f32,
    pub hardness: f32,
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
    /// Noise-space column this blade reads its wind from.
    pub turbulence_x: f32,
}

impl Blade {
    /// A random blade rooted somewhere along the bottom edge.
    pub fn random(width: f32, height: f32, rng: &mut Random) -> Self {
        let size = rng.below(4.0) + 4.0;
        let x = rng.below(width).floor();
        let steps = size / TESSELLATION;
        Self {
            angle: 0.0,
            segments: steps as usize,
            x,
            y: height,
            offset: rng.below(0.2) - 0.1,
            scale: 4.0 / steps + (rng.below(0.6) + 0.2) * TESSELLATION,
            length_x: (rng.below(4.5) + 3.0) * TESSELLATION * size,
            length_y: (rng.below(5.5) + 2.0) * TESSELLATION * size,
            hardness: (rng.below(1.0) + 0.2) * TESSELLATION,
            hue: rng.below(0.02) + 0.2,
            saturation: rng.below(0.22) + 0.78,
            brightness: rng.below(0.65) + 0.35,
            turbulence_x: x * 0.006,
        }
    }

    /// Vertices this blade writes per frame.
    pub fn vertex_count(&self) -> usize {
        self.segments * 6
    }

    /// Ease the bend toward the wind at `wind_time` (noise units).
    pub fn sway(&mut self, turbulence: &Turbulence, wind_time: f32) {
        let wind = (turbulence.sample(self.turbulence_x, wind_time, 4) - 0.5) * 0.5;
        let eased = self.angle + (wind + self.offset - self.angle) * EASE;
        self.angle = eased.clamp(-MAX_BEND, MAX_BEND);
    }

    /// Append two triangles per segment, shifted right by `x_shift` pixels.
    pub fn tessellate(&self, x_shift: f32, color: u32, out: &mut Vec<BladeVertex>) {
        let mut bottom_x = self.x + x_shift;
        let mut bottom_y = self.y;
        let mut current = FRAC_PI_2;
        let d = self.angle * self.hardness;

        for size in (1..=self.segments).rev() {
            let top_x = bottom_x - current.cos() * self.length_x;
            let top_y = bottom_y - current.sin() * self.length_y;

            let si = size as f32 * self.scale;
            let spi = si - self.scale;
            let bottom = bottom_y + HALF_TESSELLATION;

            let corners = [
                (bottom_x - si, bottom),
                (top_x - spi, top_y),
                (top_x + spi, top_y),
                (bottom_x - si, bottom),
                (top_x + spi, top_y),
                (bottom_x + si, bottom),
            ];
            out.extend(corners.iter().zip(SEGMENT_UV).map(|(&(x, y), (s, t))| BladeVertex {
                color,
                x,
                y,
                s,
                t,
            }));

            bottom_x = top_x;
            bottom_y = top_y;
            current += d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upright() -> Blade {
        Blade {
            segments: 3,
            x: 100.0,
            y: 400.0,
            scale: 1.0,
            length_x: 10.0,
            length_y: 10.0,
            hardness: 0.5,
            ..Default::default()
        }
    }

    #[test]
    fn random_blades_stay_in_range() {
        let mut rng = Random::seeded(2);
        for _ in 0..200 {
            let b = Blade::random(480.0, 800.0, &mut rng);
            assert!((8..16).contains(&b.segments));
            assert!((0.0..480.0).contains(&b.x));
            assert_eq!(b.y, 800.0);
            assert!((-0.1..0.1).contains(&b.offset));
            assert!((0.2..=0.22).contains(&b.hue));
        }
    }

    #[test]
    fn upright_blade_climbs_straight() {
        let b = upright();
        let mut out = Vec::new();
        b.tessellate(0.0, 7, &mut out);
        assert_eq!(out.len(), b.vertex_count());

        // Segment tops rise by length_y each step
        for (seg, quad) in out.chunks(6).enumerate() {
            let top_y = 400.0 - 10.0 * (seg + 1) as f32;
            assert!((quad[1].y - top_y).abs() < 1e-3);
            assert!((quad[0].y - (top_y + 10.0 + 0.25)).abs() < 1e-3);
        }
        // Widest at the root, tapering
        assert!((out[0].x - 97.0).abs() < 1e-3);
        assert!((out[5].x - 103.0).abs() < 1e-3);
        assert!(out.iter().all(|v| v.color == 7));
        assert_eq!((out[4].s, out[4].t), (1.0, 1.0));
    }

    #[test]
    fn shift_moves_every_vertex() {
        let b = upright();
        let (mut a, mut c) = (Vec::new(), Vec::new());
        b.tessellate(0.0, 0, &mut a);
        b.tessellate(50.0, 0, &mut c);
        for (p, q) in a.iter().zip(&c) {
            assert!((q.x - p.x - 50.0).abs() < 1e-3);
        }
    }

    #[test]
    fn sway_is_clamped() {
        let turb = Turbulence::new(9);
        let mut b = Blade { offset: 5.0, ..upright() };
        for i in 0..100 {
            b.sway(&turb, i as f32 * 0.01);
            assert!(b.angle.abs() <= MAX_BEND);
        }
        assert!((b.angle - MAX_BEND).abs() < 1e-6);
    }
}
