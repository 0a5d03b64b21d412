// normals.rs - Finite-difference surface normals
//
// Edges run in (column, row, height) space. The normal at a cell is the sum
// of two cross products: right x below, then diagonal x below. Its x/y parts
// nudge the texture coordinates, which reads as refraction on the riverbed.

use glam::Vec3;

use super::HeightGrid;
use crate::mesh::REST_NORMAL;
use crate::vertex::WaterVertex;

/// Texture coordinate shift per unit of normal.
pub const TEX_WOBBLE: f32 = 0.005;

#[derive(Debug, Clone, Copy)]
pub struct SurfaceNormalEstimator {
    normalize: bool,
}

impl SurfaceNormalEstimator {
    pub fn new(normalize: bool) -> Self {
        Self { normalize }
    }

    pub fn normalizes(&self) -> bool {
        self.normalize
    }

    /// Normal at interior cell `(x, y)`. The last row and column have no
    /// forward neighbour and are not valid here.
    pub fn estimate(&self, grid: &HeightGrid, x: usize, y: usize) -> Vec3 {
        let at = |cx: usize, cy: usize| Vec3::new(cx as f32, cy as f32, grid.get(cx, cy));
        let v = at(x, y);
        let below = at(x, y + 1) - v;

        let mut n = (at(x + 1, y) - v).cross(below);
        if self.normalize {
            n = n.normalize_or_zero();
        }
        n += (at(x + 1, y + 1) - v).cross(below);
        if self.normalize {
            n = n.normalize_or_zero();
        }
        n
    }

    /// Write heights, base texture coordinates and normals into `vertices`
    /// (row-major, one per grid cell). Border cells keep the rest normal.
    pub fn compute(&self, grid: &HeightGrid, vertices: &mut [WaterVertex]) {
        let (w, h) = (grid.width(), grid.height());
        debug_assert_eq!(vertices.len(), w * h);

        let (fw, fh) = (1.0 / w as f32, 1.0 / h as f32);
        for (i, vtx) in vertices.iter_mut().enumerate().take(w * h) {
            let (x, y) = (i % w, i / w);
            vtx.z = grid.get(x, y);
            vtx.s = x as f32 * fw;
            vtx.t = y as f32 * fh;
            vtx.nx = REST_NORMAL[0];
            vtx.ny = REST_NORMAL[1];
            vtx.nz = REST_NORMAL[2];
        }

        for y in 0..h - 1 {
            for x in 0..w - 1 {
                let n = self.estimate(grid, x, y);
                let vtx = &mut vertices[y * w + x];
                vtx.nx = n.x;
                vtx.ny = n.y;
                vtx.nz = -n.z;
                vtx.s += n.x * TEX_WOBBLE;
                vtx.t += n.y * TEX_WOBBLE;
            }
        }
    }
}
