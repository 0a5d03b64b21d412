// heightmap.rs - Height grid to grayscale PNG
//
// Heights are stretched to the grid's own extent so faint ripples stay
// visible. Grid rows grow up the screen, image rows grow down.

use std::path::Path;

use image::{GrayImage, Luma};
use ripple_engine::sim::HeightGrid;

pub fn to_image(grid: &HeightGrid) -> GrayImage {
    let (lo, hi) = grid.extent();
    let span = hi - lo;
    let heights = grid.heights();
    let rows = grid.height() as u32;

    GrayImage::from_fn(grid.width() as u32, rows, |x, y| {
        let h = heights[[(rows - 1 - y) as usize, x as usize]];
        let level = if span > f32::EPSILON { (h - lo) / span } else { 0.5 };
        Luma([(level * 255.0).round() as u8])
    })
}

pub fn write(grid: &HeightGrid, path: &Path) -> Result<(), image::ImageError> {
    to_image(grid).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_engine::config::FallProfile;
    use ripple_engine::sim::WaveField;

    #[test]
    fn flat_grid_is_mid_gray() {
        let grid = HeightGrid::new(4, 3).unwrap();
        let img = to_image(&grid);
        assert_eq!(img.dimensions(), (4, 3));
        assert!(img.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn ripple_spans_full_range() {
        let mut field = WaveField::new(&FallProfile::classic().wave_config()).unwrap();
        field.inject(8.0, 8.0, 1.0);
        for _ in 0..5 {
            field.advance(1.0 / 60.0);
        }
        let mut grid = HeightGrid::new(16, 16).unwrap();
        grid.rebuild(&field);
        let img = to_image(&grid);
        assert!(img.pixels().any(|p| p.0[0] == 0));
        assert!(img.pixels().any(|p| p.0[0] == 255));
    }
}
