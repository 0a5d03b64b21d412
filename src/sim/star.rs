// star.rs - Galaxy stars
//
// Stars orbit on a squashed ellipse; each one's orbit plane is twisted by an
// angle that grows with its distance from the core, which is what draws the
// spiral arms. Distances are stored in projection units (viewport -1..1).

use crate::math::{Random, pack_abgr, remap};
use crate::vertex::StarVertex;

/// Galaxy radius in pixels.
pub const GALAXY_RADIUS: f32 = 300.0;
/// Vertical squash of every orbit.
pub const ELLIPSE_RATIO: f32 = 0.892;
/// Orbit-plane twist per pixel of distance.
pub const ELLIPSE_TWIST: f32 = 0.023_333_333;

// Keeps the core star's speed finite.
const MIN_DISTANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Star {
    pub angle: f32,
    pub distance: f32,
    pub speed: f32,
    /// Cosine of the orbit twist.
    pub s: f32,
    /// Sine of the orbit twist.
    pub t: f32,
}

impl Star {
    /// A new star and its initial vertex (colour, depth and point size are
    /// fixed for life). `scale` maps the galaxy radius into projection units.
    pub fn random(scale: f32, rng: &mut Random) -> (Self, StarVertex) {
        let d = rng.gauss().abs() * GALAXY_RADIUS / 2.0 + rng.range(-4.0, 4.0);
        let z = rng.gauss() * 0.5 * 0.8 * ((GALAXY_RADIUS - d) / GALAXY_RADIUS);
        let twist = -d * ELLIPSE_TWIST;

        let nd = d / GALAXY_RADIUS;
        let byte = |v: f32| v.clamp(0.0, 255.0) as u8;
        let (r, g, b) = if d < GALAXY_RADIUS / 3.0 {
            (byte(220.0 + nd * 35.0), 220, 220)
        } else {
            (180, 180, byte((140.0 + nd * 115.0).clamp(140.0, 255.0)))
        };
        let color = pack_abgr(r, g, b, byte(40.0 + nd * 215.0));

        let distance = remap(-4.0, GALAXY_RADIUS + 4.0, 0.0, scale, d);
        let star = Star {
            angle: rng.range(0.0, core::f32::consts::TAU),
            distance,
            speed: rng.range(0.0015, 0.0025) * (0.5 + scale / distance.max(MIN_DISTANCE)) * 0.8,
            s: twist.cos(),
            t: twist.sin(),
        };
        let vertex = StarVertex {
            color,
            x: 0.0,
            y: 0.0,
            z: z / 5.0,
            size: rng.range(1.2, 2.1) * 6.0,
        };
        (star, vertex)
    }

    /// Move one step along the orbit and write the new position into
    /// `vertex`, shifted horizontally by `x_shift`.
    pub fn orbit(&mut self, x_shift: f32, vertex: &mut StarVertex) {
        let a = self.angle + self.speed;
        let x = self.distance * a.sin();
        let y = self.distance * a.cos() * ELLIPSE_RATIO;
        vertex.x = self.t * x + self.s * y + x_shift;
        vertex.y = self.s * x - self.t * y;
        self.angle = a;
    }
}
