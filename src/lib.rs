use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod sim;
pub mod vertex;

use config::{FallProfile, GalaxyProfile, GrassProfile, NexusProfile};
use error::ConfigError;
use render::Encoder;
use scene::{FallScene, FrameState, GalaxyScene, GrassScene, NexusScene, Scene, TapKind};

// ============================================================================
// HOST - Shared frame loop state behind every exported wallpaper
// ============================================================================

/// Thumbnails always render the same picture.
const PREVIEW_SEED: u64 = 0x5EED;

struct Host<S: Scene> {
    scene: S,
    state: FrameState,
    out: Encoder,
}

impl<S: Scene> Host<S> {
    fn new(scene: S, width: u32, height: u32, preview: bool) -> Self {
        let mut state = FrameState::new(width, height);
        state.preview = preview;
        Self { scene, state, out: Encoder::new() }
    }

    fn tick(&mut self, now_ms: f64) -> u32 {
        self.out.clear();
        self.state.now_ms = now_ms;
        self.scene.frame(&mut self.state, &mut self.out).as_millis()
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        self.scene.resize(width, height)?;
        self.state.width = width;
        self.state.height = height;
        Ok(())
    }

    fn set_offset(&mut self, x_offset: f32) {
        self.state.x_offset = x_offset.clamp(0.0, 1.0);
    }

    fn push(&mut self, kind: TapKind, x: f32, y: f32) {
        self.state.push_tap(kind, x, y);
    }
}

fn resolve_seed(preview: bool, seed: u32) -> u64 {
    match (preview, seed) {
        (true, _) => PREVIEW_SEED,
        (false, 0) => js_sys::Date::now() as u64,
        (false, s) => s as u64,
    }
}

fn js_error(err: ConfigError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Methods every wallpaper shares: frame pump, surface changes, output buffers.
macro_rules! wallpaper_surface {
    ($name:ident) => {
        #[wasm_bindgen]
        impl $name {
            /// Run one frame. Returns the delay in ms before the next call.
            pub fn tick(&mut self, now_ms: f64) -> u32 {
                self.host.tick(now_ms)
            }

            pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
                self.host.resize(width, height).map_err(js_error)
            }

            pub fn set_offset(&mut self, x_offset: f32) {
                self.host.set_offset(x_offset);
            }

            pub fn tap(&mut self, x: f32, y: f32) {
                self.host.push(TapKind::Tap, x, y);
            }

            pub fn commands_ptr(&self) -> *const f32 {
                self.host.out.ptr()
            }

            pub fn commands_len(&self) -> usize {
                self.host.out.len()
            }

            pub fn uploads_ptr(&self) -> *const u8 {
                self.host.out.uploads_ptr()
            }

            pub fn uploads_len(&self) -> usize {
                self.host.out.uploads_len()
            }
        }
    };
}

// ============================================================================
// FALL - Rippling water with drifting leaves
// ============================================================================

#[wasm_bindgen]
pub struct FallWallpaper {
    host: Host<FallScene>,
}

#[wasm_bindgen]
impl FallWallpaper {
    /// `profile` is `"classic"` or `"drift"`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        preview: bool,
        seed: u32,
        profile: &str,
    ) -> Result<FallWallpaper, JsValue> {
        let profile = FallProfile::by_name(profile)
            .ok_or_else(|| JsValue::from_str(&format!("unknown fall profile '{profile}'")))?;
        let scene = FallScene::new(profile, width, height, resolve_seed(preview, seed))
            .map_err(js_error)?;
        Ok(Self { host: Host::new(scene, width, height, preview) })
    }

    /// Icon dropped onto the home screen.
    pub fn drop_at(&mut self, x: f32, y: f32) {
        self.host.push(TapKind::Drop, x, y);
    }
}

wallpaper_surface!(FallWallpaper);

// ============================================================================
// NEXUS - Light pulses on a circuit grid
// ============================================================================

#[wasm_bindgen]
pub struct NexusWallpaper {
    host: Host<NexusScene>,
}

#[wasm_bindgen]
impl NexusWallpaper {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        preview: bool,
        seed: u32,
        preset: usize,
        dark: bool,
        now_ms: f64,
    ) -> Result<NexusWallpaper, JsValue> {
        let profile = NexusProfile { preset, dark_background: dark, ..Default::default() };
        let scene = NexusScene::new(profile, width, height, now_ms, resolve_seed(preview, seed))
            .map_err(js_error)?;
        Ok(Self { host: Host::new(scene, width, height, preview) })
    }

    pub fn drop_at(&mut self, x: f32, y: f32) {
        self.host.push(TapKind::Drop, x, y);
    }

    pub fn set_preset(&mut self, preset: usize) -> Result<(), JsValue> {
        self.host.scene.set_preset(preset).map_err(js_error)
    }

    pub fn set_dark_background(&mut self, dark: bool) {
        self.host.scene.set_dark_background(dark);
    }
}

wallpaper_surface!(NexusWallpaper);

// ============================================================================
// GRASS - Blades in the wind under a day-cycle sky
// ============================================================================

#[wasm_bindgen]
pub struct GrassWallpaper {
    host: Host<GrassScene>,
}

#[wasm_bindgen]
impl GrassWallpaper {
    /// With `real_time`, `tick` expects epoch milliseconds and the sky
    /// follows the UTC time of day.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        preview: bool,
        seed: u32,
        real_time: bool,
    ) -> Result<GrassWallpaper, JsValue> {
        let profile = GrassProfile { real_time, ..Default::default() };
        let scene = GrassScene::new(profile, width, height, resolve_seed(preview, seed))
            .map_err(js_error)?;
        Ok(Self { host: Host::new(scene, width, height, preview) })
    }
}

wallpaper_surface!(GrassWallpaper);

// ============================================================================
// GALAXY - Rotating spiral of point-sprite stars
// ============================================================================

#[wasm_bindgen]
pub struct GalaxyWallpaper {
    host: Host<GalaxyScene>,
}

#[wasm_bindgen]
impl GalaxyWallpaper {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        preview: bool,
        seed: u32,
    ) -> Result<GalaxyWallpaper, JsValue> {
        let seed = resolve_seed(preview, seed);
        let scene =
            GalaxyScene::new(GalaxyProfile::default(), width, height, seed).map_err(js_error)?;
        Ok(Self { host: Host::new(scene, width, height, preview) })
    }
}

wallpaper_surface!(GalaxyWallpaper);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::FrameDelay;

    #[test]
    fn host_clears_stream_between_frames() {
        let profile = GalaxyProfile { star_count: 8, ..Default::default() };
        let scene = GalaxyScene::new(profile, 320, 480, 1).unwrap();
        let mut host = Host::new(scene, 320, 480, true);
        assert_eq!(host.tick(0.0), FrameDelay::Asap.as_millis());
        let first = host.out.len();
        assert!(first > 0);
        host.tick(16.0);
        assert_eq!(host.out.len(), first);
    }

    #[test]
    fn offset_is_clamped_and_taps_queue() {
        let scene = NexusScene::new(NexusProfile::default(), 320, 480, 0.0, 1).unwrap();
        let mut host = Host::new(scene, 320, 480, false);
        host.set_offset(1.5);
        assert_eq!(host.state.x_offset, 1.0);
        host.push(TapKind::Drop, 4.0, 5.0);
        assert!(host.state.pending_tap().is_some());
        assert_eq!(host.tick(10.0), 45);
        assert!(host.state.pending_tap().is_none());
    }

    #[test]
    fn resize_updates_frame_state() {
        let scene = FallScene::new(FallProfile::classic(), 320, 480, 1).unwrap();
        let mut host = Host::new(scene, 320, 480, false);
        host.resize(480, 320).unwrap();
        assert_eq!((host.state.width, host.state.height), (480, 320));
        assert!(host.resize(0, 0).is_err());
        assert_eq!(host.state.width, 480);
    }

    #[test]
    fn preview_seed_is_fixed() {
        assert_eq!(resolve_seed(true, 9), PREVIEW_SEED);
        assert_eq!(resolve_seed(false, 9), 9);
    }
}
