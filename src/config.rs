// config.rs - Scene profiles
//
// Every scene is built from a profile. Profiles are plain serde structs so
// the preview tool can load them from RON; the wasm side uses the named
// constructors. `validate` is the only gate, scenes assume a valid profile.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::{DecayModel, EvictionPolicy, MAX_EXTRAS, MAX_PULSES, RippleShape, WaveConfig};

/// Water and leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallProfile {
    pub eviction: EvictionPolicy,
    pub decay: DecayModel,
    pub shape: RippleShape,
    /// Normalize surface normals for the lighting pass.
    pub normalize_normals: bool,
    pub drop_count: usize,
    pub leaf_count: usize,
    /// Leaf sprites laid side by side in the leaf texture.
    pub texture_cells: usize,
    pub min_spread: f32,
    /// Spin multiplier applied when a leaf lands.
    pub splash_spin_damping: f32,
    /// Altitude below which a settling leaf is fully opaque.
    pub shadow_fade_altitude: f32,
    /// Draw respawned leaves after the others.
    pub reorder_recycled: bool,
    pub frame_delay_ms: u32,
}

impl Default for FallProfile {
    fn default() -> Self {
        Self::classic()
    }
}

impl FallProfile {
    /// Round-robin drops with a fixed per-frame decay; runs flat out.
    pub fn classic() -> Self {
        Self {
            eviction: EvictionPolicy::RoundRobin,
            decay: DecayModel::Linear { spread_step: 1.0, amplitude_step: 0.01 },
            shape: RippleShape::Rim,
            normalize_normals: true,
            drop_count: 10,
            leaf_count: 14,
            texture_cells: 4,
            min_spread: 0.5,
            splash_spin_damping: 0.25,
            shadow_fade_altitude: 0.4,
            reorder_recycled: false,
            frame_delay_ms: 1,
        }
    }

    /// Weakest-first drops whose strength thins with their radius; paced
    /// at 30 ms and scaled by real frame time.
    pub fn drift() -> Self {
        Self {
            eviction: EvictionPolicy::WeakestFirst,
            decay: DecayModel::InverseSpread { spread_rate: 30.0 },
            shape: RippleShape::Centre,
            normalize_normals: false,
            drop_count: 10,
            leaf_count: 14,
            texture_cells: 4,
            min_spread: 0.5,
            splash_spin_damping: 0.5,
            shadow_fade_altitude: 0.5,
            reorder_recycled: true,
            frame_delay_ms: 30,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "drift" => Some(Self::drift()),
            _ => None,
        }
    }

    pub fn wave_config(&self) -> WaveConfig {
        WaveConfig {
            capacity: self.drop_count,
            eviction: self.eviction,
            decay: self.decay,
            shape: self.shape,
            min_spread: self.min_spread,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wave_config().validate()?;
        if self.leaf_count == 0 {
            return Err(ConfigError::EmptyPool { pool: "leaf" });
        }
        if self.texture_cells == 0 {
            return Err(ConfigError::InvalidParameter { name: "texture_cells", value: 0.0 });
        }
        ConfigError::check_at_least("splash_spin_damping", self.splash_spin_damping, 0.0)?;
        ConfigError::check_at_least("shadow_fade_altitude", self.shadow_fade_altitude, 0.0)
    }
}

/// RGB triple.
pub type Rgb = [f32; 3];

/// Pulse palettes: normal, sexynexus, cyanogen.
pub const COLOR_PRESETS: [[Rgb; 4]; 3] = [
    [[1.0, 0.0, 0.0], [0.0, 0.6, 0.0], [0.0, 0.4, 0.8], [1.0, 0.8, 0.0]],
    [
        [0.333333333, 0.101960784, 0.545098039],
        [1.0, 0.0, 0.0],
        [1.0, 0.31764059, 0.8],
        [0.674509804, 0.819607843, 0.91372549],
    ],
    [[0.086274, 0.9398039, 0.945098]; 4],
];

/// Light pulses on a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NexusProfile {
    /// Index into `COLOR_PRESETS`.
    pub preset: usize,
    pub dark_background: bool,
    pub pulse_count: usize,
    pub extra_count: usize,
    pub frame_delay_ms: u32,
}

impl Default for NexusProfile {
    fn default() -> Self {
        Self {
            preset: 0,
            dark_background: false,
            pulse_count: MAX_PULSES,
            extra_count: MAX_EXTRAS,
            frame_delay_ms: 45,
        }
    }
}

impl NexusProfile {
    pub fn palette(&self) -> Result<&'static [Rgb; 4], ConfigError> {
        COLOR_PRESETS.get(self.preset).ok_or(ConfigError::UnknownPreset(self.preset))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.palette()?;
        if self.pulse_count == 0 {
            return Err(ConfigError::EmptyPool { pool: "pulse" });
        }
        if self.extra_count == 0 {
            return Err(ConfigError::EmptyPool { pool: "extra pulse" });
        }
        Ok(())
    }
}

/// Swaying grass under a sky that follows the time of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassProfile {
    pub blade_count: usize,
    /// Follow the wall clock instead of the fast demo cycle.
    pub real_time: bool,
    /// Length of one demo day.
    pub day_cycle_ms: f64,
    pub frame_delay_ms: u32,
}

impl Default for GrassProfile {
    fn default() -> Self {
        Self { blade_count: 200, real_time: false, day_cycle_ms: 20_000.0, frame_delay_ms: 1 }
    }
}

impl GrassProfile {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blade_count == 0 {
            return Err(ConfigError::EmptyPool { pool: "blade" });
        }
        ConfigError::check_positive("day_cycle_ms", self.day_cycle_ms as f32)
    }
}

/// Rotating spiral galaxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyProfile {
    pub star_count: usize,
    /// Opening zoom, degrees of tilt to unwind.
    pub intro_angle: f32,
    pub frame_delay_ms: u32,
}

impl Default for GalaxyProfile {
    fn default() -> Self {
        Self { star_count: 12_000, intro_angle: 37.0, frame_delay_ms: 1 }
    }
}

impl GalaxyProfile {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.star_count == 0 {
            return Err(ConfigError::EmptyPool { pool: "star" });
        }
        ConfigError::check_at_least("intro_angle", self.intro_angle, 0.0)
    }
}
