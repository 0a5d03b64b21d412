// fall.rs - Water surface with falling leaves
//
// Frame order:
//   1. consume a tap (full-strength drop under the finger)
//   2. idle rain when the surface has gone quiet
//   3. heights from the wave field, normals, upload
//   4. riverbed, drifting sky, specular pass (same mesh three times)
//   5. leaves, then leaf motion (landings drop ripples for the next frame)
//
// Mesh cells are indexed with y growing up the screen; screen pixels grow
// down, hence the flips in `inject_cell`.

use glam::{Mat4, Vec3};

use super::{FrameDelay, FrameState, Scene, check_screen};
use crate::config::FallProfile;
use crate::error::ConfigError;
use crate::math::{Random, WHITE, alpha};
use crate::mesh::{MESH_RESOLUTION, WaterMesh};
use crate::render::{Material, MeshId, ProgramId, Quad, Renderer, Stage, TextureId};
use crate::sim::{
    HeightGrid, LEAF_SIZE, Leaf, LeafArea, Leaves, SurfaceNormalEstimator, WaveField,
};
use crate::vertex::as_bytes;

/// Strength of a tap or drop command.
const TAP_STRENGTH: f32 = 1.0;
/// Strength of an idle raindrop.
const RAIN_STRENGTH: f32 = 0.2;
/// Below this summed amplitude the surface counts as quiet.
const QUIET_AMPLITUDE: f32 = 0.2;
/// Longest simulated step, seconds.
const MAX_STEP: f64 = 0.1;
const FIRST_STEP: f64 = 1.0 / 60.0;

const SKY_ALPHA: f32 = 0.5;
const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.15];

const SPECULAR: Material = Material {
    ambient: [0.0, 0.0, 0.0, 1.0],
    diffuse: [0.0, 0.0, 0.0, 1.0],
    specular: [0.44, 0.44, 0.44, 1.0],
    shininess: 40.0,
};

pub struct FallScene {
    profile: FallProfile,
    width: u32,
    height: u32,
    // Landscape surfaces draw the portrait mesh rotated a quarter turn
    rotate: bool,

    mesh: WaterMesh,
    field: WaveField,
    grid: HeightGrid,
    normals: SurfaceNormalEstimator,
    leaves: Leaves,

    sky_offset: (f32, f32),
    sky_speed: (f32, f32),
    last_ms: Option<f64>,
    // Triangle list not yet sent to the host
    indices_dirty: bool,
    rng: Random,
}

impl FallScene {
    pub fn new(
        profile: FallProfile,
        width: u32,
        height: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        profile.validate()?;
        check_screen(width, height)?;

        let mut rng = Random::seeded(seed);
        let mesh = WaterMesh::new(width, height, MESH_RESOLUTION)?;
        let grid = HeightGrid::new(mesh.width, mesh.height)?;
        let field = WaveField::new(&profile.wave_config())?;
        let leaves = Leaves::new(
            profile.leaf_count,
            profile.texture_cells,
            profile.splash_spin_damping,
            profile.reorder_recycled,
            LeafArea { width: 2.0, height: mesh.gl_height },
            &mut rng,
        )?;
        let sky_speed = (rng.range(-0.001, 0.001), rng.range(0.000_08, 0.000_2));

        let mut scene = Self {
            normals: SurfaceNormalEstimator::new(profile.normalize_normals),
            profile,
            width,
            height,
            rotate: width > height,
            mesh,
            field,
            grid,
            leaves,
            sky_offset: (0.0, 0.0),
            sky_speed,
            last_ms: None,
            indices_dirty: true,
            rng,
        };

        // Opening drop somewhere around the middle
        let (w, h) = (width as f32, height as f32);
        let x = (w / 4.0).floor() + (scene.rng.next() * (w / 2.0).floor()).floor();
        let y = (h / 4.0).floor() + (scene.rng.next() * (h / 2.0).floor()).floor();
        scene.add_drop(x, y);

        log::debug!(
            "fall scene {width}x{height}, mesh {}x{}, {:?} eviction",
            scene.mesh.width,
            scene.mesh.height,
            scene.profile.eviction
        );
        Ok(scene)
    }

    pub fn profile(&self) -> &FallProfile {
        &self.profile
    }

    pub fn field(&self) -> &WaveField {
        &self.field
    }

    pub fn height_grid(&self) -> &HeightGrid {
        &self.grid
    }

    pub fn leaves(&self) -> &Leaves {
        &self.leaves
    }

    pub fn mesh(&self) -> &WaterMesh {
        &self.mesh
    }

    /// Start a full-strength ripple under screen pixel `(x, y)`. `x` is
    /// measured across the whole scrollable surface.
    pub fn add_drop(&mut self, x: f32, y: f32) {
        let (w, h) = (self.width as f32, self.height as f32);
        let (mw, mh) = (self.mesh.width as f32, self.mesh.height as f32);
        let (mx, my) = if self.rotate {
            (mw - ((y / h) * mw).trunc(), ((x / w) * mh).trunc())
        } else {
            (((x / w) * mw).trunc(), ((y / h) * mh).trunc())
        };
        inject_cell(&mut self.field, mh, mx, my, TAP_STRENGTH);
    }

    fn frame_step(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            None => FIRST_STEP,
            Some(last) => {
                let dt = (now_ms - last) / 1000.0;
                if dt < 0.0 {
                    log::warn!("clock went backwards by {:.1} ms", -dt * 1000.0);
                }
                dt.clamp(0.0, MAX_STEP)
            }
        };
        self.last_ms = Some(now_ms);
        dt as f32
    }

    fn rain(&mut self, preview: bool) {
        if !preview && self.field.total_amplitude() >= QUIET_AMPLITUDE {
            return;
        }
        let (mw, mh) = (self.mesh.width as f32, self.mesh.height as f32);
        let x = self.rng.below(mw).trunc();
        let y = self.rng.below(mh).trunc();
        let strength = if preview { TAP_STRENGTH } else { RAIN_STRENGTH };
        inject_cell(&mut self.field, mh, x, y, strength);
    }

    fn update_surface(&mut self, x_offset: f32, out: &mut dyn Renderer) {
        let ratio = self.mesh.width as f32 / 2.0;
        self.field.set_shift(x_offset * ratio * 2.0);
        self.grid.rebuild(&self.field);
        self.normals.compute(&self.grid, &mut self.mesh.vertices);
        if self.indices_dirty {
            out.upload_indices(MeshId::Water, as_bytes(&self.mesh.indices));
            self.indices_dirty = false;
        }
        out.upload(MeshId::Water, as_bytes(&self.mesh.vertices));
    }

    fn base_matrix(&self) -> Mat4 {
        if self.rotate {
            Mat4::from_rotation_z(90f32.to_radians())
        } else {
            Mat4::IDENTITY
        }
    }

    fn draw_water(&mut self, x_offset: f32, frames: f32, out: &mut dyn Renderer) {
        out.bind_program(Stage::Vertex, ProgramId::Ortho);
        out.bind_program(Stage::Fragment, ProgramId::Background);
        out.bind_program(Stage::Store, ProgramId::Additive);
        out.load_model_matrix(&self.base_matrix());

        // Riverbed
        out.set_color(WHITE);
        out.bind_texture(ProgramId::Background, TextureId::Riverbed);
        out.load_texture_matrix(&Mat4::from_translation(Vec3::new(x_offset, 0.0, 0.0)));
        out.draw_mesh(MeshId::Water);

        // Sky reflection, drifting and wrapping
        out.set_color(alpha(SKY_ALPHA));
        out.bind_program(Stage::Fragment, ProgramId::Modulate);
        out.bind_program(Stage::Store, ProgramId::Blend);
        out.bind_texture(ProgramId::Modulate, TextureId::Sky);
        let mut sx = self.sky_offset.0 + self.sky_speed.0 * frames;
        let mut sy = self.sky_offset.1 + self.sky_speed.1 * frames;
        if !(-1.0..=1.0).contains(&sx) {
            sx = 0.0;
        }
        if sy > 1.0 {
            sy = 0.0;
        }
        self.sky_offset = (sx, sy);
        out.load_texture_matrix(&Mat4::from_translation(Vec3::new(sx + x_offset, sy, 0.0)));
        out.draw_mesh(MeshId::Water);
        out.load_texture_matrix(&Mat4::IDENTITY);

        // Specular highlights
        out.set_material(&SPECULAR);
        out.bind_program(Stage::Store, ProgramId::Additive);
        out.bind_program(Stage::Fragment, ProgramId::Lighting);
        out.bind_program(Stage::Vertex, ProgramId::Lit);
        out.draw_mesh(MeshId::Water);
    }

    fn draw_leaves(&self, x_offset: f32, out: &mut dyn Renderer) {
        out.bind_program(Stage::Fragment, ProgramId::Modulate);
        out.bind_program(Stage::Store, ProgramId::Blend);
        out.bind_program(Stage::Vertex, ProgramId::Ortho);
        out.bind_texture(ProgramId::Modulate, TextureId::Leaves);

        let base = self.base_matrix();
        let fade_from = self.profile.shadow_fade_altitude;
        for (_, leaf) in self.leaves.pool().iter() {
            let quad = Quad::centred(LEAF_SIZE, leaf.u1, leaf.u2);
            let x = leaf.x - x_offset * 2.0;
            if leaf.altitude > 0.0 {
                out.set_color(SHADOW);
                out.load_model_matrix(&leaf_matrix(base, leaf, x, 0.0));
                out.draw_quad(&quad);
                out.set_color(alpha(leaf.fade_alpha(fade_from)));
                out.load_model_matrix(&leaf_matrix(base, leaf, x, -leaf.altitude));
            } else {
                out.set_color(WHITE);
                out.load_model_matrix(&leaf_matrix(base, leaf, x, 0.0));
            }
            out.draw_quad(&quad);
        }
        out.load_model_matrix(&base);
    }

    fn move_leaves(&mut self, frames: f32) {
        let field = &mut self.field;
        let (mw, mh) = (self.mesh.width as f32, self.mesh.height as f32);
        let (gl_w, gl_h) = (2.0, self.mesh.gl_height);
        self.leaves.step(frames, &mut self.rng, |x, y| {
            let mx = ((x + gl_w * 0.5) / gl_w) * mw;
            let my = mh - ((y + gl_h * 0.5) / gl_h) * mh;
            inject_cell(field, mh, mx.trunc(), my.trunc(), TAP_STRENGTH);
        });
    }
}

fn leaf_matrix(base: Mat4, leaf: &Leaf, x: f32, z: f32) -> Mat4 {
    base * Mat4::from_translation(Vec3::new(x, leaf.y, z))
        * Mat4::from_scale(Vec3::new(leaf.scale, leaf.scale, 1.0))
        * Mat4::from_rotation_z(leaf.angle.to_radians())
}

/// Inject at mesh column `mx`, row `my` counted from the top.
fn inject_cell(field: &mut WaveField, mesh_height: f32, mx: f32, my: f32, strength: f32) {
    field.inject(mx, mesh_height - my - 1.0, strength);
}

impl Scene for FallScene {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        check_screen(width, height)?;
        let mesh = WaterMesh::new(width, height, MESH_RESOLUTION)?;
        self.grid = HeightGrid::new(mesh.width, mesh.height)?;
        self.leaves.reset(LeafArea { width: 2.0, height: mesh.gl_height }, &mut self.rng);
        self.mesh = mesh;
        self.width = width;
        self.height = height;
        self.rotate = width > height;
        self.indices_dirty = true;
        log::debug!("fall scene resized to {width}x{height}");
        Ok(())
    }

    fn frame(&mut self, state: &mut FrameState, out: &mut dyn Renderer) -> FrameDelay {
        let dt = self.frame_step(state.now_ms);
        // Leaves and sky move by the same step the ripples take; a stalled
        // clock freezes all of them
        let frames = match (self.profile.decay.is_time_scaled(), dt > 0.0) {
            (_, false) => 0.0,
            (true, true) => dt * 60.0,
            (false, true) => 1.0,
        };

        if let Some(tap) = state.take_tap() {
            let (w, h) = (self.width as f32, self.height as f32);
            if tap.x < 0.0 || tap.y < 0.0 || tap.x > w || tap.y > h {
                log::warn!("tap at ({}, {}) is outside the screen", tap.x, tap.y);
            }
            log::trace!("{:?} at ({}, {})", tap.kind, tap.x, tap.y);
            self.add_drop(tap.x + self.width as f32 * state.x_offset, tap.y);
        }
        self.rain(state.preview);

        self.update_surface(state.x_offset, out);
        self.field.advance(dt);

        self.draw_water(state.x_offset, frames, out);
        self.draw_leaves(state.x_offset, out);
        self.move_leaves(frames);

        FrameDelay::from_millis(self.profile.frame_delay_ms)
    }
}
