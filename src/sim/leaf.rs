// leaf.rs - Falling leaves over the water
//
// A leaf drops in from above (settling: altitude > 0, spinning fast), lands
// on the surface and makes one splash, then drifts down the screen until it
// leaves the view and respawns above the water. Positions are GL units with
// the origin at the screen centre.

use super::{Handle, ParticlePool};
use crate::error::ConfigError;
use crate::math::{Random, degrees};

/// Half-size of the leaf quad before scaling.
pub const LEAF_SIZE: f32 = 0.55;

/// Altitude a respawned leaf starts settling from.
pub const DROP_ALTITUDE: f32 = 0.6;

const SETTLE_RATE: f32 = 0.005;

/// Visible water in GL units: `width` across (always 2), `height` tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafArea {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafPhase {
    /// On the water, drifting.
    Falling,
    /// Still in the air above its landing spot.
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Leaf {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Degrees.
    pub angle: f32,
    /// Degrees per frame.
    pub spin: f32,
    pub u1: f32,
    pub u2: f32,
    pub altitude: f32,
    /// Set while the leaf still owes the water its landing splash.
    pub splash_armed: bool,
    pub dx: f32,
    pub dy: f32,
}

impl Leaf {
    pub fn phase(&self) -> LeafPhase {
        if self.altitude > 0.0 {
            LeafPhase::Settling
        } else {
            LeafPhase::Falling
        }
    }

    /// Whether the scaled quad is fully past the left, right or bottom edge.
    pub fn is_outside(&self, area: LeafArea) -> bool {
        let r = LEAF_SIZE * self.scale;
        -r + self.x > area.width || r + self.x < -area.width || r + self.y < -area.height / 2.0
    }

    /// Opacity of the leaf quad while settling: transparent at drop
    /// altitude, opaque once it is below `fade_from`.
    pub fn fade_alpha(&self, fade_from: f32) -> f32 {
        if self.altitude >= fade_from {
            (1.0 - (self.altitude - 0.5) / 0.1).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    fn randomize(&mut self, area: LeafArea, texture_cells: usize, rng: &mut Random) {
        let sprite = rng.index(texture_cells);
        self.x = rng.range(-area.width, area.width);
        self.y = rng.range(-area.height * 0.5, area.height * 0.5);
        self.scale = rng.range(0.4, 0.5);
        self.spin = degrees(rng.range(-0.02, 0.02)) * 0.25;
        self.u1 = sprite as f32 / texture_cells as f32;
        self.u2 = (sprite + 1) as f32 / texture_cells as f32;
        self.dx = rng.range(-0.02, 0.02) / 60.0;
        self.dy = -0.08 * rng.range(0.9, 1.1) / 60.0;
    }

    /// Start-of-scene placement: already on the water, no splash owed.
    fn scatter(&mut self, area: LeafArea, texture_cells: usize, rng: &mut Random) {
        self.randomize(area, texture_cells, rng);
        self.angle = rng.range(0.0, 360.0);
        self.altitude = -1.0;
        self.splash_armed = false;
    }

    fn respawn(&mut self, area: LeafArea, texture_cells: usize, rng: &mut Random) {
        self.randomize(area, texture_cells, rng);
        self.altitude = DROP_ALTITUDE;
        self.splash_armed = true;
    }

    /// Advance by `frames` (1.0 = one 60 Hz frame). Returns the landing
    /// point when this step fires the splash.
    pub fn advance(&mut self, frames: f32, spin_damping: f32) -> Option<(f32, f32)> {
        match self.phase() {
            LeafPhase::Falling => {
                let mut splash = None;
                if self.splash_armed {
                    splash = Some((self.x, self.y));
                    self.spin *= spin_damping;
                    self.splash_armed = false;
                }
                self.x += self.dx * frames;
                self.y += self.dy * frames;
                self.angle += self.spin * frames;
                splash
            }
            LeafPhase::Settling => {
                self.altitude -= SETTLE_RATE * frames;
                self.angle += self.spin * 2.0 * frames;
                None
            }
        }
    }
}

/// The scene's leaves and the knobs their lifecycle needs.
pub struct Leaves {
    pool: ParticlePool<Leaf>,
    area: LeafArea,
    texture_cells: usize,
    spin_damping: f32,
    reorder: bool,
}

impl Leaves {
    pub fn new(
        count: usize,
        texture_cells: usize,
        spin_damping: f32,
        reorder: bool,
        area: LeafArea,
        rng: &mut Random,
    ) -> Result<Self, ConfigError> {
        if texture_cells == 0 {
            return Err(ConfigError::InvalidParameter { name: "texture_cells", value: 0.0 });
        }
        let pool = ParticlePool::new(count, "leaf", |_| {
            let mut leaf = Leaf::default();
            leaf.scatter(area, texture_cells, rng);
            leaf
        })?;
        Ok(Self { pool, area, texture_cells, spin_damping, reorder })
    }

    pub fn pool(&self) -> &ParticlePool<Leaf> {
        &self.pool
    }

    pub fn area(&self) -> LeafArea {
        self.area
    }

    #[cfg(test)]
    pub(crate) fn pool_mut(&mut self) -> &mut ParticlePool<Leaf> {
        &mut self.pool
    }

    /// Scatter every leaf over a new surface.
    pub fn reset(&mut self, area: LeafArea, rng: &mut Random) {
        self.area = area;
        for leaf in self.pool.slots_mut() {
            leaf.scatter(area, self.texture_cells, rng);
        }
        self.pool.clear_recycled();
    }

    /// Move every leaf in draw order. Landing splashes are reported through
    /// `on_splash(x, y)` as they happen. Returns how many leaves respawned.
    pub fn step(
        &mut self,
        frames: f32,
        rng: &mut Random,
        mut on_splash: impl FnMut(f32, f32),
    ) -> usize {
        let mut respawned = 0;
        for i in 0..self.pool.len() {
            let h: Handle = self.pool.draw_order()[i];
            let leaf = self.pool.get_mut(h);
            if let Some((x, y)) = leaf.advance(frames, self.spin_damping) {
                on_splash(x, y);
            }
            if leaf.is_outside(self.area) {
                leaf.respawn(self.area, self.texture_cells, rng);
                respawned += 1;
                if self.reorder {
                    self.pool.mark_recycled(h);
                }
            }
        }
        if respawned > 0 {
            log::trace!("{respawned} leaves respawned");
        }
        if self.reorder {
            self.pool.reorder();
        }
        respawned
    }
}
