// grid.rs - Per-frame height field
//
// Heights are rebuilt from the wave sources every frame; nothing carries
// over. Indexed (row, column) like the mesh vertex rows.

use ndarray::Array2;

use super::WaveField;
use crate::error::ConfigError;

pub struct HeightGrid {
    heights: Array2<f32>,
}

impl HeightGrid {
    /// A flat `width` x `height` grid. Both sides need at least two cells.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        if width < 2 || height < 2 {
            return Err(ConfigError::GridTooSmall { width, height });
        }
        Ok(Self { heights: Array2::zeros((height, width)) })
    }

    pub fn width(&self) -> usize {
        self.heights.ncols()
    }

    pub fn height(&self) -> usize {
        self.heights.nrows()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.heights[[y, x]]
    }

    pub fn heights(&self) -> &Array2<f32> {
        &self.heights
    }

    /// Overwrite every cell with the field's current sample.
    pub fn rebuild(&mut self, field: &WaveField) {
        for ((y, x), h) in self.heights.indexed_iter_mut() {
            *h = field.sample(x as f32, y as f32);
        }
    }

    /// Lowest and highest height currently held.
    pub fn extent(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }
}
