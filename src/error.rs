// error.rs - Scene configuration errors
//
// Only construction can fail. Once a scene is running every frame completes.

/// Errors raised while building a scene or one of its pools.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A fixed-capacity pool was configured with no slots.
    #[error("{pool} pool needs at least one slot")]
    EmptyPool { pool: &'static str },

    /// The height grid cannot hold a single interior cell.
    #[error("height grid must be at least 2x2, got {width}x{height}")]
    GridTooSmall { width: usize, height: usize },

    /// A numeric knob is outside the range the simulation is defined for.
    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// The host surface has no area.
    #[error("screen must be non-empty, got {width}x{height}")]
    Screen { width: u32, height: u32 },

    /// Colour preset index with no matching scheme.
    #[error("unknown colour preset {0}")]
    UnknownPreset(usize),
}

impl ConfigError {
    /// Reject non-finite values and values below `min`.
    pub(crate) fn check_at_least(name: &'static str, value: f32, min: f32) -> Result<(), Self> {
        if value.is_finite() && value >= min {
            Ok(())
        } else {
            Err(Self::InvalidParameter { name, value })
        }
    }

    /// Reject non-finite values and values that are not strictly positive.
    pub(crate) fn check_positive(name: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidParameter { name, value })
        }
    }
}
