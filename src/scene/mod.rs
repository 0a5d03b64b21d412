// scene/ - Per-scene frame drivers
//
// A scene owns all of its simulation state. The host fills a `FrameState`
// before each frame, calls `Scene::frame`, and waits the returned delay
// before the next one. The only field a scene writes back is the pending
// tap, which it consumes.

mod fall;
mod galaxy;
mod grass;
mod nexus;

pub use fall::FallScene;
pub use galaxy::GalaxyScene;
pub use grass::{DayPhase, GrassScene, TimeOfDay};
pub use nexus::NexusScene;

use crate::error::ConfigError;
use crate::render::Renderer;

/// Where a one-shot pointer event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapKind {
    /// Tap on the wallpaper.
    Tap,
    /// Icon dropped onto the home screen.
    Drop,
}

/// A pointer event in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub kind: TapKind,
    pub x: f32,
    pub y: f32,
}

/// Host-provided snapshot for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub width: u32,
    pub height: u32,
    /// Milliseconds on the host's clock.
    pub now_ms: f64,
    /// Wallpaper scroll position, 0 (leftmost page) to 1.
    pub x_offset: f32,
    /// Thumbnail rendering: deterministic, no intro animation.
    pub preview: bool,
    tap: Option<Tap>,
}

impl FrameState {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, now_ms: 0.0, x_offset: 0.0, preview: false, tap: None }
    }

    /// Queue a pointer event for the next frame. A newer event replaces an
    /// unread one.
    pub fn push_tap(&mut self, kind: TapKind, x: f32, y: f32) {
        self.tap = Some(Tap { kind, x, y });
    }

    /// Read and clear the pending pointer event.
    pub fn take_tap(&mut self) -> Option<Tap> {
        self.tap.take()
    }

    pub fn pending_tap(&self) -> Option<Tap> {
        self.tap
    }

    pub fn check_screen(&self) -> Result<(), ConfigError> {
        check_screen(self.width, self.height)
    }
}

pub(crate) fn check_screen(width: u32, height: u32) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::Screen { width, height });
    }
    Ok(())
}

/// How long the host should wait before the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDelay {
    /// Next frame as soon as possible.
    Asap,
    Millis(u32),
}

impl FrameDelay {
    pub fn from_millis(ms: u32) -> Self {
        if ms <= 1 { FrameDelay::Asap } else { FrameDelay::Millis(ms) }
    }

    /// Wire value handed to the host; 1 means as soon as possible.
    pub fn as_millis(self) -> u32 {
        match self {
            FrameDelay::Asap => 1,
            FrameDelay::Millis(ms) => ms,
        }
    }
}

pub trait Scene {
    /// Rebuild size-dependent state for a new surface.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError>;

    /// Advance one frame and draw it.
    fn frame(&mut self, state: &mut FrameState, out: &mut dyn Renderer) -> FrameDelay;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_is_consumed_once() {
        let mut state = FrameState::new(480, 800);
        state.push_tap(TapKind::Tap, 10.0, 20.0);
        state.push_tap(TapKind::Drop, 30.0, 40.0);
        assert_eq!(state.take_tap(), Some(Tap { kind: TapKind::Drop, x: 30.0, y: 40.0 }));
        assert_eq!(state.take_tap(), None);
    }

    #[test]
    fn delay_wire_values() {
        assert_eq!(FrameDelay::from_millis(1), FrameDelay::Asap);
        assert_eq!(FrameDelay::from_millis(45).as_millis(), 45);
        assert_eq!(FrameDelay::Asap.as_millis(), 1);
    }

    #[test]
    fn empty_screen_rejected() {
        assert_eq!(
            FrameState::new(0, 10).check_screen(),
            Err(ConfigError::Screen { width: 0, height: 10 })
        );
    }
}
