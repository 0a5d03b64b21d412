// wave.rs - Ripple sources and the field they drive
//
// A bounded pool of expanding circular wavefronts. Each source carries its
// own decay; the field itself keeps no height memory between frames.
// Exhausted sources stay in their slot and contribute nothing until evicted.

use serde::{Deserialize, Serialize};

use super::eviction::{EvictionPolicy, SourceEviction};
use crate::error::ConfigError;

/// Sources at or below this amplitude are skipped when sampling.
pub const NEGLIGIBLE_AMPLITUDE: f32 = 0.01;

/// Smallest spread a source can start with.
pub const MIN_SPREAD: f32 = 1e-3;

/// How a source's spread and amplitude evolve per `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DecayModel {
    /// Fixed increments per advanced frame, independent of its length.
    Linear { spread_step: f32, amplitude_step: f32 },
    /// Spread grows at `spread_rate` cells per second; amplitude is
    /// `start / spread`, so energy thins out over the widening ring.
    InverseSpread { spread_rate: f32 },
}

impl DecayModel {
    /// Whether kinematics driven alongside this model should scale with frame time.
    pub fn is_time_scaled(&self) -> bool {
        matches!(self, DecayModel::InverseSpread { .. })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            DecayModel::Linear { spread_step, amplitude_step } => {
                ConfigError::check_at_least("spread_step", spread_step, 0.0)?;
                ConfigError::check_at_least("amplitude_step", amplitude_step, 0.0)
            }
            DecayModel::InverseSpread { spread_rate } => {
                ConfigError::check_positive("spread_rate", spread_rate)
            }
        }
    }
}

/// Radial weighting applied to a source's wave inside its spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RippleShape {
    /// `distance / spread²`: zero at the drop point, strongest at the rim.
    Rim,
    /// `1 - distance / spread`: full strength at the drop point, fading outward.
    Centre,
}

impl RippleShape {
    #[inline]
    fn weight(self, dist: f32, source: &Source) -> f32 {
        match self {
            RippleShape::Rim => dist * source.inv_spread2,
            RippleShape::Centre => 1.0 - dist * source.inv_spread,
        }
    }
}

/// One drop. Position is in grid cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    amplitude: f32,
    start_amplitude: f32,
    target_amplitude: f32,
    spread: f32,
    // Cached for the sampling loop
    spread2: f32,
    inv_spread: f32,
    inv_spread2: f32,
    x: f32,
    y: f32,
}

impl Source {
    fn inert() -> Self {
        let mut s = Self {
            amplitude: 0.0,
            start_amplitude: 0.0,
            target_amplitude: 0.0,
            spread: 1.0,
            spread2: 0.0,
            inv_spread: 0.0,
            inv_spread2: 0.0,
            x: 0.0,
            y: 0.0,
        };
        s.set_spread(1.0);
        s
    }

    #[cfg(test)]
    pub(crate) fn with_amplitude(x: f32, y: f32, amplitude: f32) -> Self {
        let mut s = Self::inert();
        s.x = x;
        s.y = y;
        s.amplitude = amplitude;
        s.start_amplitude = amplitude;
        s.target_amplitude = amplitude;
        s
    }

    #[inline]
    fn set_spread(&mut self, spread: f32) {
        self.spread = spread;
        self.spread2 = spread * spread;
        self.inv_spread = 1.0 / spread;
        self.inv_spread2 = self.inv_spread * self.inv_spread;
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn start_amplitude(&self) -> f32 {
        self.start_amplitude
    }

    pub fn target_amplitude(&self) -> f32 {
        self.target_amplitude
    }

    pub fn spread(&self) -> f32 {
        self.spread
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Whether this source still contributes to the field.
    pub fn is_active(&self) -> bool {
        self.amplitude > NEGLIGIBLE_AMPLITUDE
    }
}

/// Construction parameters for a `WaveField`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub capacity: usize,
    pub eviction: EvictionPolicy,
    pub decay: DecayModel,
    pub shape: RippleShape,
    /// Spread a source restarts from on injection.
    pub min_spread: f32,
}

impl WaveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::EmptyPool { pool: "source" });
        }
        ConfigError::check_at_least("min_spread", self.min_spread, 0.0)?;
        self.decay.validate()
    }
}

pub struct WaveField {
    sources: Vec<Source>,
    eviction: SourceEviction,
    decay: DecayModel,
    shape: RippleShape,
    min_spread: f32,
    // Horizontal parallax shift applied to every source, in cells
    shift: f32,
}

impl WaveField {
    pub fn new(config: &WaveConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sources: vec![Source::inert(); config.capacity],
            eviction: SourceEviction::new(config.eviction),
            decay: config.decay,
            shape: config.shape,
            min_spread: config.min_spread.max(MIN_SPREAD),
            shift: 0.0,
        })
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn eviction(&self) -> &SourceEviction {
        &self.eviction
    }

    pub fn set_shift(&mut self, shift: f32) {
        self.shift = shift;
    }

    /// Sum of current amplitudes across the pool.
    pub fn total_amplitude(&self) -> f32 {
        self.sources.iter().map(|s| s.amplitude).sum()
    }

    /// Start a new ripple at cell `(x, y)`. Returns the slot it took.
    pub fn inject(&mut self, x: f32, y: f32, magnitude: f32) -> usize {
        let slot = self.eviction.select(&self.sources);
        let amplitude = magnitude.max(0.0);
        let s = &mut self.sources[slot];
        s.set_spread(self.min_spread);
        s.amplitude = amplitude;
        s.start_amplitude = amplitude;
        s.target_amplitude = amplitude;
        s.x = x;
        s.y = y;
        log::trace!("ripple source {slot} at ({x:.1}, {y:.1}) strength {amplitude:.2}");
        slot
    }

    /// Grow every ripple and decay its amplitude. `dt` is in seconds;
    /// a zero or negative step changes nothing.
    pub fn advance(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        match self.decay {
            DecayModel::Linear { spread_step, amplitude_step } => {
                for s in &mut self.sources {
                    s.set_spread(s.spread + spread_step);
                    s.amplitude = (s.amplitude - amplitude_step).max(0.0);
                    s.target_amplitude = s.amplitude;
                }
            }
            DecayModel::InverseSpread { spread_rate } => {
                for s in &mut self.sources {
                    s.set_spread(s.spread + spread_rate * dt);
                    s.target_amplitude = s.start_amplitude / s.spread.max(1.0);
                    s.amplitude = s.target_amplitude.min(s.amplitude).max(0.0);
                }
            }
        }
    }

    /// Height at cell `(x, y)`: every live source whose ring covers the
    /// cell adds `sin(spread - distance) * amplitude * weight`.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let mut z = 0.0;
        for s in &self.sources {
            if s.amplitude <= NEGLIGIBLE_AMPLITUDE {
                continue;
            }
            let dx = (s.x - self.shift) - x;
            let dy = s.y - y;
            let dist2 = dx * dx + dy * dy;
            if dist2 < s.spread2 {
                let dist = dist2.sqrt();
                z += (s.spread - dist).sin() * s.amplitude * self.shape.weight(dist, s);
            }
        }
        z
    }
}
