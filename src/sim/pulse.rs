// pulse.rs - Light pulses running along the nexus grid
//
// A pulse starts on a screen edge at a grid line, waits out a random delay,
// then runs straight across dragging a trail. When its trail has fully left
// the opposite edge it relaunches from a fresh edge. Extras only run when a
// tap fires them, four at a time, and go dormant after one crossing.
//
// The travel area is twice the screen width so the grid can scroll with the
// wallpaper offset. Coordinates are pixels, times milliseconds.

use super::ParticlePool;
use crate::error::ConfigError;
use crate::math::Random;
use crate::render::Rect;

/// Grid cell size.
pub const PULSE_SIZE: f32 = 8.0;
const HALF_PULSE_SIZE: f32 = PULSE_SIZE / 2.0;
/// Leading glow size.
pub const GLOW_SIZE: f32 = 32.0;
const HALF_GLOW_SIZE: f32 = GLOW_SIZE / 2.0;
/// Pixels per millisecond at unit speed.
pub const SPEED: f32 = 0.1;
pub const SPEED_VARIANCE: f32 = 0.15;
/// Cells in a trail.
pub const TRAIL_SIZE: f32 = 40.0;
/// Longest wait before a pulse (re)starts.
pub const MAX_DELAY: f64 = 2000.0;
/// Unit speed of tap-fired extras.
pub const EXTRA_SPEED: f32 = 1.5;
/// Palette entries a pulse can pick.
pub const COLOR_COUNT: usize = 4;

pub const MAX_PULSES: usize = 20;
pub const MAX_EXTRAS: usize = 40;

const TRAIL_LENGTH: f32 = TRAIL_SIZE * PULSE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseKind {
    /// Always cycling.
    Normal,
    /// Dormant until a tap fires it.
    Extra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
    Up,
    Down,
}

impl Heading {
    /// Rotation of the trail texture, degrees about z.
    pub fn texture_rotation(self) -> f32 {
        match self {
            Heading::Left => 0.0,
            Heading::Right => 180.0,
            Heading::Up => -90.0,
            Heading::Down => 90.0,
        }
    }
}

/// What the renderer needs for one visible pulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseSprite {
    pub heading: Heading,
    pub color: usize,
    pub trail: Rect,
    pub glow: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub kind: PulseKind,
    pub origin_x: f32,
    pub origin_y: f32,
    pub color: usize,
    pub start: f64,
    pub dx: f32,
    pub dy: f32,
    pub active: bool,
}

enum Progress {
    Waiting,
    Finished,
    Visible(PulseSprite),
}

impl Pulse {
    fn dormant(kind: PulseKind) -> Self {
        Self {
            kind,
            origin_x: 0.0,
            origin_y: 0.0,
            color: 0,
            start: 0.0,
            dx: 0.0,
            dy: 0.0,
            active: false,
        }
    }

    pub fn heading(&self) -> Option<Heading> {
        if self.dx < 0.0 {
            Some(Heading::Left)
        } else if self.dx > 0.0 {
            Some(Heading::Right)
        } else if self.dy < 0.0 {
            Some(Heading::Up)
        } else if self.dy > 0.0 {
            Some(Heading::Down)
        } else {
            None
        }
    }

    /// Pick a random edge, direction, colour and start delay.
    fn launch(&mut self, width: f32, height: f32, now: f64, rng: &mut Random) {
        let speed = |rng: &mut Random| rng.range(1.0 - SPEED_VARIANCE, 1.0 + SPEED_VARIANCE);
        if rng.coin() {
            self.origin_x = (rng.below(width * 2.0 / PULSE_SIZE) as i32) as f32 * PULSE_SIZE;
            self.dx = 0.0;
            if rng.coin() {
                self.origin_y = 0.0;
                self.dy = speed(rng);
            } else {
                self.origin_y = height;
                self.dy = -speed(rng);
            }
        } else {
            self.origin_y = (rng.below(height / PULSE_SIZE) as i32) as f32 * PULSE_SIZE;
            self.dy = 0.0;
            if rng.coin() {
                self.origin_x = 0.0;
                self.dx = speed(rng);
            } else {
                self.origin_x = width * 2.0;
                self.dx = -speed(rng);
            }
        }
        self.start = now + (rng.next() as f64 * MAX_DELAY).floor();
        self.color = rng.index(COLOR_COUNT);
        self.active = self.kind == PulseKind::Normal;
    }

    fn progress(&self, width: f32, height: f32, now: f64) -> Progress {
        let delta = now - self.start;
        if !self.active || delta < 0.0 {
            return Progress::Waiting;
        }
        let Some(heading) = self.heading() else {
            return Progress::Waiting;
        };
        let delta = delta as f32;
        let mut x = self.origin_x + self.dx * SPEED * delta;
        let mut y = self.origin_y + self.dy * SPEED * delta;

        let (trail, glow) = match heading {
            Heading::Left => {
                let xx = x + TRAIL_LENGTH;
                if xx <= 0.0 {
                    return Progress::Finished;
                }
                (
                    Rect::new(x, y, xx, y + PULSE_SIZE),
                    glow_at(x + HALF_PULSE_SIZE, y + HALF_PULSE_SIZE),
                )
            }
            Heading::Right => {
                // Lead from the far side of the cell
                x += PULSE_SIZE;
                let xx = x - TRAIL_LENGTH;
                if xx >= width * 2.0 {
                    return Progress::Finished;
                }
                (
                    Rect::new(xx, y, x, y + PULSE_SIZE),
                    glow_at(x - HALF_PULSE_SIZE, y + HALF_PULSE_SIZE),
                )
            }
            Heading::Up => {
                let yy = y + TRAIL_LENGTH;
                if yy <= 0.0 {
                    return Progress::Finished;
                }
                (
                    Rect::new(x, y, x + PULSE_SIZE, yy),
                    glow_at(x + HALF_PULSE_SIZE, y + HALF_PULSE_SIZE),
                )
            }
            Heading::Down => {
                y += PULSE_SIZE;
                let yy = y - TRAIL_LENGTH;
                if yy >= height {
                    return Progress::Finished;
                }
                (
                    Rect::new(x, yy, x + PULSE_SIZE, y),
                    glow_at(x + HALF_PULSE_SIZE, y - HALF_PULSE_SIZE),
                )
            }
        };
        Progress::Visible(PulseSprite { heading, color: self.color, trail, glow })
    }
}

fn glow_at(cx: f32, cy: f32) -> Rect {
    Rect::new(cx - HALF_GLOW_SIZE, cy - HALF_GLOW_SIZE, cx + HALF_GLOW_SIZE, cy + HALF_GLOW_SIZE)
}

/// Both pulse pools over a `width` x `height` screen.
pub struct Pulses {
    normal: ParticlePool<Pulse>,
    extras: ParticlePool<Pulse>,
    width: f32,
    height: f32,
}

impl Pulses {
    pub fn new(
        width: f32,
        height: f32,
        normal: usize,
        extras: usize,
        now: f64,
        rng: &mut Random,
    ) -> Result<Self, ConfigError> {
        let normal = ParticlePool::new(normal, "pulse", |_| {
            let mut p = Pulse::dormant(PulseKind::Normal);
            p.launch(width, height, now, rng);
            p
        })?;
        let extras =
            ParticlePool::new(extras, "extra pulse", |_| Pulse::dormant(PulseKind::Extra))?;
        Ok(Self { normal, extras, width, height })
    }

    pub fn normal(&self) -> &ParticlePool<Pulse> {
        &self.normal
    }

    pub fn extras(&self) -> &ParticlePool<Pulse> {
        &self.extras
    }

    /// New screen size. Pulses already running keep their paths.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Fire up to four dormant extras from the grid cell under `(x, y)`, one
    /// per direction, colours cycling from a random start. Returns how many fired.
    pub fn tap(&mut self, x: f32, y: f32, now: f64, rng: &mut Random) -> usize {
        const DIRECTIONS: [(f32, f32); 4] = [
            (EXTRA_SPEED, 0.0),
            (-EXTRA_SPEED, 0.0),
            (0.0, EXTRA_SPEED),
            (0.0, -EXTRA_SPEED),
        ];
        let x = (x / PULSE_SIZE).trunc() * PULSE_SIZE;
        let y = (y / PULSE_SIZE).trunc() * PULSE_SIZE;
        let mut color = rng.index(COLOR_COUNT);

        let dormant = self.extras.slots_mut().iter_mut().filter(|p| !p.active);
        let mut fired = 0;
        for (p, (dx, dy)) in dormant.zip(DIRECTIONS) {
            p.origin_x = x;
            p.origin_y = y;
            p.dx = dx;
            p.dy = dy;
            p.active = true;
            p.color = color;
            p.start = now;
            color = (color + 1) % COLOR_COUNT;
            fired += 1;
        }
        log::trace!("tap at ({x}, {y}) fired {fired} extras");
        fired
    }

    /// Relaunch finished pulses and collect the visible ones, normals
    /// first, each pool in draw order.
    pub fn step(&mut self, now: f64, rng: &mut Random, out: &mut Vec<PulseSprite>) {
        let (w, h) = (self.width, self.height);
        for pool in [&mut self.normal, &mut self.extras] {
            for i in 0..pool.len() {
                let handle = pool.draw_order()[i];
                let pulse = pool.get_mut(handle);
                match pulse.progress(w, h, now) {
                    Progress::Waiting => {}
                    Progress::Finished => pulse.launch(w, h, now, rng),
                    Progress::Visible(sprite) => out.push(sprite),
                }
            }
        }
    }
}
