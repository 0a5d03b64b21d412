// mesh.rs - Water surface mesh
//
// A regular grid spanning the screen in normalized GL units: x in [-1, 1]
// across the short side, y scaled by aspect ratio. Two extra cells border
// every side so ripples can run off-screen. Rows alternate their diagonal to
// avoid a visible grain in the shading.

use crate::error::ConfigError;
use crate::vertex::WaterVertex;

/// Grid columns across the short side of the screen.
pub const MESH_RESOLUTION: usize = 48;

/// Normal written to cells the estimator never visits.
pub const REST_NORMAL: [f32; 3] = [0.0, 0.0, -1.0];

pub struct WaterMesh {
    /// Vertices per row.
    pub width: usize,
    /// Vertex rows.
    pub height: usize,
    /// Height of the surface in GL units (width is always 2).
    pub gl_height: f32,
    pub vertices: Vec<WaterVertex>,
    pub indices: Vec<[u32; 3]>,
}

impl WaterMesh {
    pub fn new(screen_w: u32, screen_h: u32, resolution: usize) -> Result<Self, ConfigError> {
        if screen_w == 0 || screen_h == 0 {
            return Err(ConfigError::Screen { width: screen_w, height: screen_h });
        }
        if resolution == 0 {
            return Err(ConfigError::GridTooSmall { width: 0, height: 0 });
        }

        let short = screen_w.min(screen_h) as f32;
        let long = screen_w.max(screen_h) as f32;
        let aspect = long / short;

        let w_res = resolution + 2;
        let h_res = (resolution as f32 * long / short) as usize + 2;

        let mut vertices = Vec::with_capacity((w_res + 1) * (h_res + 1));
        for y in 0..=h_res {
            let y_pos = ((y as f32 / h_res as f32) * 2.0 - 1.0) * aspect;
            for x in 0..=w_res {
                let x_pos = (x as f32 / w_res as f32) * 2.0 - 1.0;
                vertices.push(WaterVertex {
                    x: x_pos,
                    y: y_pos,
                    nx: REST_NORMAL[0],
                    ny: REST_NORMAL[1],
                    nz: REST_NORMAL[2],
                    ..Default::default()
                });
            }
        }

        let mut indices = Vec::with_capacity(w_res * h_res * 2);
        let stride = (w_res + 1) as u32;
        for y in 0..h_res as u32 {
            let shift = y & 1 == 0;
            for x in 0..w_res as u32 {
                let i = y * stride + x;
                let below = i + stride;
                if shift {
                    indices.push([i, i + 1, below]);
                    indices.push([i + 1, below + 1, below]);
                } else {
                    indices.push([i, below + 1, below]);
                    indices.push([i, i + 1, below + 1]);
                }
            }
        }

        Ok(Self {
            width: w_res + 1,
            height: h_res + 1,
            gl_height: 2.0 * aspect,
            vertices,
            indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_grid_dimensions() {
        let mesh = WaterMesh::new(480, 800, MESH_RESOLUTION).unwrap();
        assert_eq!(mesh.width, 51);
        assert_eq!(mesh.height, 83);
        assert_eq!(mesh.vertices.len(), mesh.width * mesh.height);
        assert_eq!(mesh.indices.len(), (mesh.width - 1) * (mesh.height - 1) * 2);
    }

    #[test]
    fn corners_span_gl_space() {
        let mesh = WaterMesh::new(400, 400, 4).unwrap();
        let first = mesh.vertices[0];
        let last = mesh.vertices[mesh.vertices.len() - 1];
        assert_eq!((first.x, first.y), (-1.0, -1.0));
        assert_eq!((last.x, last.y), (1.0, 1.0));
        assert_eq!(mesh.gl_height, 2.0);
    }

    #[test]
    fn indices_stay_in_range() {
        let mesh = WaterMesh::new(320, 240, 8).unwrap();
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().flatten().all(|&i| i < n));
    }

    #[test]
    fn rejects_empty_screen() {
        assert_eq!(
            WaterMesh::new(0, 100, 48).err(),
            Some(ConfigError::Screen { width: 0, height: 100 })
        );
    }
}
