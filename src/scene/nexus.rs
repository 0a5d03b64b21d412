// nexus.rs - Light pulses over a circuit-board background
//
// The background is two screens wide and slides with the wallpaper offset.
// Pulses are drawn as a coloured trail rect plus a glow rect at the head; the
// trail texture is rotated to face the direction of travel.

use glam::{Mat4, Vec3};

use super::{FrameDelay, FrameState, Scene, check_screen};
use crate::config::{NexusProfile, Rgb};
use crate::error::ConfigError;
use crate::math::{Random, WHITE};
use crate::render::{ProgramId, Rect, Renderer, Stage, TextureId};
use crate::sim::{PulseSprite, Pulses};

pub struct NexusScene {
    profile: NexusProfile,
    palette: [Rgb; 4],
    width: u32,
    height: u32,
    pulses: Pulses,
    sprites: Vec<PulseSprite>,
    rng: Random,
}

impl NexusScene {
    pub fn new(
        profile: NexusProfile,
        width: u32,
        height: u32,
        now_ms: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        profile.validate()?;
        check_screen(width, height)?;
        let palette = *profile.palette()?;

        let mut rng = Random::seeded(seed);
        let pulses = Pulses::new(
            width as f32,
            height as f32,
            profile.pulse_count,
            profile.extra_count,
            now_ms,
            &mut rng,
        )?;
        log::debug!("nexus scene {width}x{height}, preset {}", profile.preset);
        Ok(Self {
            sprites: Vec::with_capacity(profile.pulse_count + profile.extra_count),
            profile,
            palette,
            width,
            height,
            pulses,
            rng,
        })
    }

    pub fn pulses(&self) -> &Pulses {
        &self.pulses
    }

    /// Swap the pulse palette.
    pub fn set_preset(&mut self, preset: usize) -> Result<(), ConfigError> {
        let profile = NexusProfile { preset, ..self.profile.clone() };
        self.palette = *profile.palette()?;
        self.profile = profile;
        Ok(())
    }

    pub fn set_dark_background(&mut self, dark: bool) {
        self.profile.dark_background = dark;
    }

    /// Sprites drawn by the last frame.
    pub fn sprites(&self) -> &[PulseSprite] {
        &self.sprites
    }

    fn rotated(&self) -> bool {
        self.width > self.height
    }

    fn draw_background(&self, out: &mut dyn Renderer) {
        let texture = if self.profile.dark_background {
            TextureId::BackgroundDark
        } else {
            TextureId::Background
        };
        out.bind_texture(ProgramId::Background, texture);
        out.set_color(WHITE);
        let (w, h) = (self.width as f32, self.height as f32);
        let rect = if self.rotated() {
            Rect::new(0.0, 0.0, h * 2.0, w)
        } else {
            Rect::new(0.0, 0.0, w * 2.0, h)
        };
        out.draw_rect(rect, 0.0);
    }

    fn draw_pulses(&self, out: &mut dyn Renderer) {
        out.bind_program(Stage::Fragment, ProgramId::Background);
        out.bind_program(Stage::Store, ProgramId::Blend);
        for sprite in &self.sprites {
            let rotation = Mat4::from_rotation_z(sprite.heading.texture_rotation().to_radians());
            out.load_texture_matrix(&rotation);
            let [r, g, b] = self.palette[sprite.color];
            out.set_color([r, g, b, 1.0]);
            out.bind_texture(ProgramId::Background, TextureId::Pulse);
            out.draw_rect(sprite.trail, 0.0);
            out.bind_texture(ProgramId::Background, TextureId::Glow);
            out.draw_rect(sprite.glow, 0.0);
        }
        out.load_texture_matrix(&Mat4::IDENTITY);
    }
}

impl Scene for NexusScene {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        check_screen(width, height)?;
        self.width = width;
        self.height = height;
        self.pulses.resize(width as f32, height as f32);
        log::debug!("nexus scene resized to {width}x{height}");
        Ok(())
    }

    fn frame(&mut self, state: &mut FrameState, out: &mut dyn Renderer) -> FrameDelay {
        let now = state.now_ms;
        let w = self.width as f32;

        if let Some(tap) = state.take_tap() {
            // Taps arrive in screen space; the grid spans two screens
            let x = tap.x + state.x_offset * (w * 2.0 - w);
            self.pulses.tap(x, tap.y, now, &mut self.rng);
        }

        out.bind_program(Stage::Vertex, ProgramId::Ortho);
        out.bind_program(Stage::Fragment, ProgramId::Background);
        out.bind_program(Stage::Store, ProgramId::Solid);
        let model = if self.rotated() {
            Mat4::IDENTITY
        } else {
            Mat4::from_translation(Vec3::new(-(state.x_offset * w), 0.0, 0.0))
        };
        out.load_model_matrix(&model);

        self.draw_background(out);

        self.sprites.clear();
        self.pulses.step(now, &mut self.rng, &mut self.sprites);
        self.draw_pulses(out);

        FrameDelay::from_millis(self.profile.frame_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Command, CommandLog};
    use crate::scene::TapKind;
    use crate::sim::EXTRA_SPEED;

    #[test]
    fn unknown_preset_fails_construction() {
        let profile = NexusProfile { preset: 7, ..Default::default() };
        assert_eq!(
            NexusScene::new(profile, 480, 800, 0.0, 1).err(),
            Some(ConfigError::UnknownPreset(7))
        );
    }

    #[test]
    fn background_spans_two_screens_and_scrolls() {
        let mut scene = NexusScene::new(NexusProfile::default(), 480, 800, 0.0, 1).unwrap();
        let mut state = FrameState::new(480, 800);
        state.x_offset = 0.5;
        let mut log = CommandLog::new();
        let delay = scene.frame(&mut state, &mut log);

        assert_eq!(delay, FrameDelay::Millis(45));
        assert!(log.commands.contains(&Command::Rect(Rect::new(0.0, 0.0, 960.0, 800.0), 0.0)));
        assert!(log.commands.contains(&Command::ModelMatrix(Mat4::from_translation(Vec3::new(
            -240.0, 0.0, 0.0
        )))));
    }

    #[test]
    fn tap_fires_extras_from_scrolled_cell() {
        let mut scene = NexusScene::new(NexusProfile::default(), 480, 800, 0.0, 1).unwrap();
        let mut state = FrameState::new(480, 800);
        state.x_offset = 1.0;
        state.now_ms = 10.0;
        state.push_tap(TapKind::Tap, 20.0, 20.0);
        let mut log = CommandLog::new();
        scene.frame(&mut state, &mut log);

        let fired: Vec<_> = scene.pulses().extras().slots().iter().filter(|p| p.active).collect();
        assert_eq!(fired.len(), 4);
        assert!(fired.iter().all(|p| p.origin_x == 496.0 && p.origin_y == 16.0));
        assert!(fired.iter().any(|p| p.dx == EXTRA_SPEED));
        // All four are on screen the frame they fire
        assert!(scene.sprites().len() >= 4);
    }

    #[test]
    fn dark_background_and_palette_swap() {
        let mut scene = NexusScene::new(NexusProfile::default(), 480, 800, 0.0, 1).unwrap();
        scene.set_dark_background(true);
        assert!(scene.set_preset(5).is_err());
        scene.set_preset(1).unwrap();
        let mut log = CommandLog::new();
        scene.frame(&mut FrameState::new(480, 800), &mut log);
        assert!(log.commands.contains(&Command::BindTexture(
            ProgramId::Background,
            TextureId::BackgroundDark
        )));
    }
}
