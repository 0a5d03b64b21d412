// sim/ - Scene simulation
//
// Bounded pools of transient things: ripple sources feeding a height field,
// and particle entities (leaves, pulses, blades, stars) the scenes animate.
// Each entity type in its own module. No rendering happens here.

mod blade;
mod eviction;
mod grid;
mod leaf;
mod normals;
mod pool;
mod pulse;
mod star;
mod wave;

pub use blade::{Blade, MAX_BEND, TESSELLATION};
pub use eviction::{EvictionPolicy, SourceEviction};
pub use grid::HeightGrid;
pub use leaf::{DROP_ALTITUDE, LEAF_SIZE, Leaf, LeafArea, LeafPhase, Leaves};
pub use normals::{SurfaceNormalEstimator, TEX_WOBBLE};
pub use pool::{Handle, ParticlePool};
pub use pulse::{
    COLOR_COUNT, EXTRA_SPEED, GLOW_SIZE, Heading, MAX_DELAY, MAX_EXTRAS, MAX_PULSES, PULSE_SIZE,
    Pulse, PulseKind, PulseSprite, Pulses, SPEED, TRAIL_SIZE,
};
pub use star::{ELLIPSE_RATIO, ELLIPSE_TWIST, GALAXY_RADIUS, Star};
pub use wave::{
    DecayModel, MIN_SPREAD, NEGLIGIBLE_AMPLITUDE, RippleShape, Source, WaveConfig, WaveField,
};
