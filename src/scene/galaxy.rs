// galaxy.rs - Rotating spiral galaxy
//
// Stars are point sprites in projection space; only their x/y change per
// frame, so colour, depth and size are written once and the whole buffer is
// re-uploaded each frame. The scene opens tilted and zoomed out and settles
// face-on over the first ~90 frames.

use glam::{Mat4, Vec3};

use super::{FrameDelay, FrameState, Scene, check_screen};
use crate::config::GalaxyProfile;
use crate::error::ConfigError;
use crate::math::{Random, WHITE, lerp};
use crate::render::{MeshId, ProgramId, Quad, Renderer, Stage, TextureId};
use crate::sim::{GALAXY_RADIUS, Star};
use crate::vertex::{StarVertex, as_bytes};

/// Degrees of tilt unwound per frame during the intro.
const INTRO_STEP: f32 = 0.4;
/// Tilt-to-zoom ratio of the intro.
const INTRO_ZOOM: f32 = 68.0;
/// Light glow texture size in pixels.
const LIGHT_SIZE: f32 = 512.0;

pub struct GalaxyScene {
    profile: GalaxyProfile,
    width: u32,
    height: u32,
    stars: Vec<Star>,
    vertices: Vec<StarVertex>,
    /// Current tilt, degrees.
    angle: f32,
    /// Current zoom-out, 0 when settled.
    distance: f32,
    rng: Random,
}

impl GalaxyScene {
    pub fn new(
        profile: GalaxyProfile,
        width: u32,
        height: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        profile.validate()?;
        check_screen(width, height)?;
        let mut scene = Self {
            angle: profile.intro_angle,
            distance: 0.55,
            profile,
            width,
            height,
            stars: Vec::new(),
            vertices: Vec::new(),
            rng: Random::seeded(seed),
        };
        scene.populate();
        log::debug!("galaxy scene {width}x{height}, {} stars", scene.stars.len());
        Ok(scene)
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Current tilt and zoom-out of the intro.
    pub fn intro(&self) -> (f32, f32) {
        (self.angle, self.distance)
    }

    fn populate(&mut self) {
        let scale = GALAXY_RADIUS / (self.width as f32 * 0.5);
        let rng = &mut self.rng;
        let (stars, vertices): (Vec<Star>, Vec<StarVertex>) =
            (0..self.profile.star_count).map(|_| Star::random(scale, rng)).unzip();
        self.stars = stars;
        self.vertices = vertices;
    }

    fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0 - 6.0 * self.distance))
            * Mat4::from_scale(Vec3::new(6.6, 6.0, 1.0))
            * Mat4::from_axis_angle(Vec3::new(1.0, 0.5, 0.0).normalize(), self.angle.to_radians())
    }

    fn draw_space(&self, out: &mut dyn Renderer) {
        let (w, h) = (self.width as f32, self.height as f32);
        out.bind_texture(ProgramId::Background, TextureId::Space);
        out.set_color(WHITE);
        out.draw_quad(&Quad::textured(0.0, 0.0, w, h, 2.0));
    }

    fn draw_stars(&mut self, x_shift: f32, out: &mut dyn Renderer) {
        out.bind_program(Stage::Vertex, ProgramId::Stars);
        out.bind_program(Stage::Fragment, ProgramId::Stars);
        out.bind_program(Stage::Store, ProgramId::Flare);
        out.bind_texture(ProgramId::Stars, TextureId::Flares);
        out.load_model_matrix(&self.model_matrix());

        for (star, vertex) in self.stars.iter_mut().zip(&mut self.vertices) {
            star.orbit(x_shift, vertex);
        }
        out.upload(MeshId::Stars, as_bytes(&self.vertices));
        out.draw_mesh_range(MeshId::Stars, 0, self.vertices.len() as u32);
    }

    fn draw_light(&self, x_shift: f32, out: &mut dyn Renderer) {
        out.bind_program(Stage::Vertex, ProgramId::Stars);
        out.bind_program(Stage::Fragment, ProgramId::Background);
        out.bind_texture(ProgramId::Background, TextureId::Light);

        let mut scale = LIGHT_SIZE / self.width as f32;
        let x = -scale + x_shift - scale * 0.05;
        let y = -scale;
        scale *= 2.0;
        out.draw_quad(&Quad::textured(x, y, x + scale * 1.1, y + scale, 1.0));
    }
}

impl Scene for GalaxyScene {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        check_screen(width, height)?;
        self.width = width;
        self.height = height;
        self.populate();
        log::debug!("galaxy scene resized to {width}x{height}");
        Ok(())
    }

    fn frame(&mut self, state: &mut FrameState, out: &mut dyn Renderer) -> FrameDelay {
        state.take_tap();
        let x_shift = lerp(1.0, -1.0, state.x_offset);

        out.bind_program(Stage::Vertex, ProgramId::Ortho);
        out.bind_program(Stage::Fragment, ProgramId::Background);
        out.bind_program(Stage::Store, ProgramId::Solid);
        self.draw_space(out);
        self.draw_stars(x_shift, out);
        self.draw_light(x_shift, out);

        if state.preview {
            self.angle = 0.0;
            self.distance = 0.0;
        } else if self.angle > 0.0 {
            self.angle -= INTRO_STEP;
            self.distance = self.angle / INTRO_ZOOM;
        }

        FrameDelay::from_millis(self.profile.frame_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Command, CommandLog};

    fn small() -> GalaxyProfile {
        GalaxyProfile { star_count: 64, ..Default::default() }
    }

    #[test]
    fn intro_unwinds_then_stops() {
        let mut scene = GalaxyScene::new(small(), 480, 800, 2).unwrap();
        assert_eq!(scene.intro(), (37.0, 0.55));
        let mut state = FrameState::new(480, 800);
        let mut log = CommandLog::new();
        scene.frame(&mut state, &mut log);
        let (angle, distance) = scene.intro();
        assert!((angle - 36.6).abs() < 1e-4);
        assert!((distance - 36.6 / 68.0).abs() < 1e-4);

        for _ in 0..200 {
            scene.frame(&mut state, &mut log);
        }
        let (angle, _) = scene.intro();
        assert!(angle <= 0.0 && angle > -INTRO_STEP);
    }

    #[test]
    fn preview_skips_intro() {
        let mut scene = GalaxyScene::new(small(), 480, 800, 2).unwrap();
        let mut state = FrameState::new(480, 800);
        state.preview = true;
        scene.frame(&mut state, &mut CommandLog::new());
        assert_eq!(scene.intro(), (0.0, 0.0));
    }

    #[test]
    fn frame_uploads_all_stars() {
        let mut scene = GalaxyScene::new(small(), 480, 800, 2).unwrap();
        let mut log = CommandLog::new();
        let delay = scene.frame(&mut FrameState::new(480, 800), &mut log);
        assert_eq!(delay, FrameDelay::Asap);
        assert_eq!(log.last_upload(MeshId::Stars).unwrap().len(), 64 * 20);
        assert!(log.commands.contains(&Command::MeshRange(MeshId::Stars, 0, 64)));
    }

    #[test]
    fn light_quad_follows_offset() {
        let scene = GalaxyScene::new(small(), 512, 800, 2).unwrap();
        let mut log = CommandLog::new();
        scene.draw_light(1.0, &mut log);
        let quad = log.commands.iter().find_map(|c| match c {
            Command::Quad(q) => Some(*q),
            _ => None,
        });
        let corners = quad.unwrap().0;
        assert!((corners[0].x - (-1.0 + 1.0 - 0.05)).abs() < 1e-6);
        assert!((corners[1].x - corners[0].x - 2.2).abs() < 1e-6);
        assert_eq!(corners[0].y, -1.0);
    }
}
