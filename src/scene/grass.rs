// grass.rs - Grass swaying under a sky that follows the time of day
//
// The sky is two stacked layers: the current band's backdrop and the next
// band's, faded in as the band progresses. Blades darken through the
// afternoon and stay dark from dusk until morning brightens them again.

use super::{FrameDelay, FrameState, Scene, check_screen};
use crate::config::GrassProfile;
use crate::error::ConfigError;
use crate::math::{Random, Turbulence, WHITE, alpha, hsb_to_abgr, lerp, norm};
use crate::render::{MeshId, ProgramId, Quad, Rect, Renderer, Stage, TextureId};
use crate::sim::Blade;
use crate::vertex::{BladeVertex, as_bytes};

pub const MIDNIGHT: f32 = 0.0;
pub const MORNING: f32 = 0.375;
pub const AFTERNOON: f32 = 0.6;
pub const DUSK: f32 = 0.8;

const MS_PER_DAY: f64 = 86_400_000.0;
/// Noise-space wind drift per millisecond.
const WIND_RATE: f64 = 0.000_04;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPhase {
    /// Midnight to morning.
    Night,
    Morning,
    Afternoon,
    /// Dusk to midnight.
    Dusk,
}

/// Fraction of a day, `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeOfDay(pub f32);

impl TimeOfDay {
    /// Position in a repeating demo day of `cycle_ms`.
    pub fn from_cycle(now_ms: f64, cycle_ms: f64) -> Self {
        let t = now_ms / cycle_ms;
        TimeOfDay((t - t.floor()) as f32)
    }

    /// Position in the UTC day of an epoch timestamp.
    pub fn from_wall_clock(epoch_ms: f64) -> Self {
        TimeOfDay((epoch_ms.rem_euclid(MS_PER_DAY) / MS_PER_DAY) as f32)
    }

    pub fn phase(self) -> DayPhase {
        match self.0 {
            t if t < MORNING => DayPhase::Night,
            t if t < AFTERNOON => DayPhase::Morning,
            t if t < DUSK => DayPhase::Afternoon,
            _ => DayPhase::Dusk,
        }
    }

    /// Blade brightness multiplier.
    pub fn brightness(self) -> f32 {
        let t = self.0;
        match self.phase() {
            DayPhase::Night => t / MORNING,
            DayPhase::Morning => 1.0,
            DayPhase::Afternoon => 1.0 - norm(AFTERNOON, DUSK, t),
            DayPhase::Dusk => 0.0,
        }
    }

    /// Backdrop, overlay and overlay opacity.
    fn sky_layers(self) -> (TextureId, TextureId, f32) {
        let t = self.0;
        match self.phase() {
            DayPhase::Night => (TextureId::Night, TextureId::Sunrise, norm(MIDNIGHT, MORNING, t)),
            DayPhase::Morning => (TextureId::Sunrise, TextureId::Noon, norm(MORNING, AFTERNOON, t)),
            DayPhase::Afternoon => (TextureId::Noon, TextureId::Sunset, norm(AFTERNOON, DUSK, t)),
            DayPhase::Dusk => (TextureId::Night, TextureId::Sunset, 1.0 - norm(DUSK, 1.0, t)),
        }
    }
}

pub struct GrassScene {
    profile: GrassProfile,
    width: u32,
    height: u32,
    blades: Vec<Blade>,
    vertices: Vec<BladeVertex>,
    turbulence: Turbulence,
    rng: Random,
}

impl GrassScene {
    pub fn new(
        profile: GrassProfile,
        width: u32,
        height: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        profile.validate()?;
        check_screen(width, height)?;
        let mut scene = Self {
            profile,
            width,
            height,
            blades: Vec::new(),
            vertices: Vec::new(),
            turbulence: Turbulence::new(seed as u32),
            rng: Random::seeded(seed),
        };
        scene.plant();
        log::debug!("grass scene {width}x{height}, {} blades", scene.blades.len());
        Ok(scene)
    }

    pub fn blades(&self) -> &[Blade] {
        &self.blades
    }

    pub fn time_of_day(&self, now_ms: f64) -> TimeOfDay {
        if self.profile.real_time {
            TimeOfDay::from_wall_clock(now_ms)
        } else {
            TimeOfDay::from_cycle(now_ms, self.profile.day_cycle_ms)
        }
    }

    fn plant(&mut self) {
        let (w, h) = (self.width as f32, self.height as f32);
        let rng = &mut self.rng;
        self.blades = (0..self.profile.blade_count).map(|_| Blade::random(w, h, rng)).collect();
        let total = self.blades.iter().map(Blade::vertex_count).sum();
        self.vertices = Vec::with_capacity(total);
    }

    fn draw_sky(&self, time: TimeOfDay, out: &mut dyn Renderer) {
        let (w, h) = (self.width as f32, self.height as f32);
        let (backdrop, overlay, fade) = time.sky_layers();
        out.set_color(WHITE);
        self.draw_layer(backdrop, w, h, out);
        out.set_color(alpha(fade));
        self.draw_layer(overlay, w, h, out);
    }

    fn draw_layer(&self, texture: TextureId, w: f32, h: f32, out: &mut dyn Renderer) {
        out.bind_texture(ProgramId::Background, texture);
        if texture == TextureId::Night {
            // Star field tile, taller than the screen and repeated twice across
            out.draw_quad(&Quad::textured(0.0, -32.0, w, 1024.0 - 32.0, 2.0));
        } else {
            out.draw_rect(Rect::new(0.0, 0.0, w, h), 0.0);
        }
    }

    fn draw_blades(&mut self, time: TimeOfDay, now_ms: f64, x_offset: f32, out: &mut dyn Renderer) {
        let shift = lerp(self.width as f32, 0.0, x_offset);
        let brightness = time.brightness();
        let wind_time = (now_ms * WIND_RATE) as f32;

        self.vertices.clear();
        for blade in &mut self.blades {
            blade.sway(&self.turbulence, wind_time);
            let value = lerp(0.0, blade.brightness, brightness);
            let color = hsb_to_abgr(blade.hue, blade.saturation, value, 1.0);
            blade.tessellate(shift, color, &mut self.vertices);
        }

        out.bind_texture(ProgramId::Background, TextureId::BladeEdge);
        out.upload(MeshId::Blades, as_bytes(&self.vertices));
        out.draw_mesh_range(MeshId::Blades, 0, self.vertices.len() as u32);
    }
}

impl Scene for GrassScene {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        check_screen(width, height)?;
        self.width = width;
        self.height = height;
        self.plant();
        log::debug!("grass scene resized to {width}x{height}");
        Ok(())
    }

    fn frame(&mut self, state: &mut FrameState, out: &mut dyn Renderer) -> FrameDelay {
        // Grass ignores pointer events
        state.take_tap();
        let time = self.time_of_day(state.now_ms);

        out.bind_program(Stage::Vertex, ProgramId::Ortho);
        out.bind_program(Stage::Fragment, ProgramId::Background);
        out.bind_program(Stage::Store, ProgramId::Blend);

        self.draw_sky(time, out);
        out.set_color(WHITE);
        self.draw_blades(time, state.now_ms, state.x_offset, out);

        FrameDelay::from_millis(self.profile.frame_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Command, CommandLog};

    #[test]
    fn day_phases_and_brightness() {
        let at = |t: f32| TimeOfDay(t);
        assert_eq!(at(0.1).phase(), DayPhase::Night);
        assert!((at(0.1875).brightness() - 0.5).abs() < 1e-6);
        assert_eq!(at(0.5).phase(), DayPhase::Morning);
        assert_eq!(at(0.5).brightness(), 1.0);
        assert!((at(0.7).brightness() - 0.5).abs() < 1e-5);
        assert_eq!(at(0.9).phase(), DayPhase::Dusk);
        assert_eq!(at(0.9).brightness(), 0.0);
    }

    #[test]
    fn cycle_wraps() {
        let t = TimeOfDay::from_cycle(25_000.0, 20_000.0);
        assert!((t.0 - 0.25).abs() < 1e-6);
        let noon = TimeOfDay::from_wall_clock(12.0 * 3_600_000.0 + 5.0 * MS_PER_DAY);
        assert!((noon.0 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn dusk_fades_sunset_out() {
        let (back, over, fade) = TimeOfDay(0.9).sky_layers();
        assert_eq!((back, over), (TextureId::Night, TextureId::Sunset));
        assert!((fade - 0.5).abs() < 1e-5);
    }

    #[test]
    fn frame_uploads_every_blade() {
        let profile = GrassProfile { blade_count: 12, ..Default::default() };
        let mut scene = GrassScene::new(profile, 480, 800, 6).unwrap();
        let mut state = FrameState::new(480, 800);
        state.now_ms = 9_000.0;
        let mut log = CommandLog::new();
        assert_eq!(scene.frame(&mut state, &mut log), FrameDelay::Asap);

        let expected: usize = scene.blades().iter().map(Blade::vertex_count).sum();
        let bytes = log.last_upload(MeshId::Blades).unwrap();
        assert_eq!(bytes.len(), expected * core::mem::size_of::<BladeVertex>());
        assert!(log.commands.contains(&Command::MeshRange(MeshId::Blades, 0, expected as u32)));
    }

    #[test]
    fn night_blades_are_black() {
        let profile = GrassProfile { blade_count: 3, ..Default::default() };
        let mut scene = GrassScene::new(profile, 480, 800, 6).unwrap();
        let mut state = FrameState::new(480, 800);
        // 0.9 of a 20 s day
        state.now_ms = 18_000.0;
        let mut log = CommandLog::new();
        scene.frame(&mut state, &mut log);
        let bytes = log.last_upload(MeshId::Blades).unwrap();
        let verts: Vec<BladeVertex> = bytes
            .chunks_exact(core::mem::size_of::<BladeVertex>())
            .map(bytemuck::pod_read_unaligned)
            .collect();
        assert_eq!(verts.len(), scene.blades().iter().map(Blade::vertex_count).sum::<usize>());
        assert!(verts.iter().all(|v| v.color & 0x00FF_FFFF == 0));
    }
}
