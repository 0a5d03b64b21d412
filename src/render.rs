// render.rs - Host rendering interface and command encoding
//
// Scenes never touch a GPU. They issue calls against `Renderer`; the host
// supplies the real pipeline. Two implementations live here:
//   Encoder    - flat f32 word stream + upload arena, read by the JS host
//   CommandLog - typed command list for tests and the native preview tool
//
// Encoded stream layout (one command after another):
//   [opcode, args...]     all words are f32; ids and counts are exact integers
//   uploads:              [opcode, mesh, offset lo, offset hi, len lo, len hi]
// Byte offsets and lengths are split into 16-bit halves, since an f32 only
// holds integers exactly up to 2^24.

use glam::Mat4;

use crate::math::Rgba;

/// Textures the host loads before the first frame.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    Riverbed = 0,
    Leaves = 1,
    Sky = 2,
    Background = 3,
    BackgroundDark = 4,
    Pulse = 5,
    Glow = 6,
    Night = 7,
    Sunrise = 8,
    Noon = 9,
    Sunset = 10,
    BladeEdge = 11,
    Space = 12,
    Light = 13,
    Flares = 14,
}

/// Pipeline stage a program is bound to.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex = 0,
    Fragment = 1,
    Store = 2,
}

/// Shader and blend programs the host provides.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramId {
    /// Opaque textured draw.
    Background = 0,
    /// Additive store used under the water mesh.
    Additive = 1,
    /// Modulated textured draw (sky, leaves).
    Modulate = 2,
    /// Alpha-blended store.
    Blend = 3,
    /// Specular lighting pass.
    Lighting = 4,
    /// Vertex program with per-vertex normals.
    Lit = 5,
    /// Plain orthographic / projected vertex program.
    Ortho = 6,
    /// Point sprites for stars.
    Stars = 7,
    /// Additive store for star flares.
    Flare = 8,
    /// Opaque store.
    Solid = 9,
}

/// Meshes whose vertex storage lives on the host side.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    Water = 0,
    Blades = 1,
    Stars = 2,
}

/// Fixed-function material for the lighting pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Rgba,
    pub diffuse: Rgba,
    pub specular: Rgba,
    pub shininess: f32,
}

/// One textured corner of a quad.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Corner {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub u: f32,
    pub v: f32,
}

/// Four corners, wound counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad(pub [Corner; 4]);

impl Quad {
    /// Axis-aligned quad centred on the origin with a horizontal texture strip.
    pub fn centred(half: f32, u1: f32, u2: f32) -> Self {
        Quad([
            Corner { x: -half, y: -half, z: 0.0, u: u1, v: 1.0 },
            Corner { x: half, y: -half, z: 0.0, u: u2, v: 1.0 },
            Corner { x: half, y: half, z: 0.0, u: u2, v: 0.0 },
            Corner { x: -half, y: half, z: 0.0, u: u1, v: 0.0 },
        ])
    }

    /// Full-surface quad from `(x0, y0)` to `(x1, y1)` with explicit texture extents.
    pub fn textured(x0: f32, y0: f32, x1: f32, y1: f32, u_max: f32) -> Self {
        Quad([
            Corner { x: x0, y: y0, z: 0.0, u: 0.0, v: 1.0 },
            Corner { x: x1, y: y0, z: 0.0, u: u_max, v: 1.0 },
            Corner { x: x1, y: y1, z: 0.0, u: u_max, v: 0.0 },
            Corner { x: x0, y: y1, z: 0.0, u: 0.0, v: 0.0 },
        ])
    }
}

/// Screen-space rectangle, `(x0, y0)` to `(x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// Capabilities the host rendering pipeline offers a scene.
pub trait Renderer {
    fn bind_program(&mut self, stage: Stage, program: ProgramId);
    fn bind_texture(&mut self, program: ProgramId, texture: TextureId);
    fn set_color(&mut self, color: Rgba);
    fn load_model_matrix(&mut self, m: &Mat4);
    fn load_texture_matrix(&mut self, m: &Mat4);
    fn set_material(&mut self, material: &Material);
    fn draw_quad(&mut self, quad: &Quad);
    fn draw_rect(&mut self, rect: Rect, z: f32);
    fn draw_mesh(&mut self, mesh: MeshId);
    fn draw_mesh_range(&mut self, mesh: MeshId, start: u32, count: u32);
    /// Replace the host-side vertex storage of `mesh` with `bytes`.
    fn upload(&mut self, mesh: MeshId, bytes: &[u8]);
    /// Replace the triangle list of an indexed mesh.
    fn upload_indices(&mut self, mesh: MeshId, bytes: &[u8]);
}

/// A recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BindProgram(Stage, ProgramId),
    BindTexture(ProgramId, TextureId),
    Color(Rgba),
    ModelMatrix(Mat4),
    TextureMatrix(Mat4),
    Material(Material),
    Quad(Quad),
    Rect(Rect, f32),
    Mesh(MeshId),
    MeshRange(MeshId, u32, u32),
    Upload(MeshId, Vec<u8>),
    Indices(MeshId, Vec<u8>),
}

// Opcodes
const OP_PROGRAM: f32 = 1.0;
const OP_TEXTURE: f32 = 2.0;
const OP_COLOR: f32 = 3.0;
const OP_MODEL: f32 = 4.0;
const OP_TEXTURE_MATRIX: f32 = 5.0;
const OP_MATERIAL: f32 = 6.0;
const OP_QUAD: f32 = 7.0;
const OP_RECT: f32 = 8.0;
const OP_MESH: f32 = 9.0;
const OP_MESH_RANGE: f32 = 10.0;
const OP_UPLOAD: f32 = 11.0;
const OP_INDICES: f32 = 12.0;

/// Flat command stream handed to the JS host each frame.
pub struct Encoder {
    words: Vec<f32>,
    uploads: Vec<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            words: Vec::with_capacity(4096),
            uploads: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.uploads.clear();
    }

    pub fn words(&self) -> &[f32] {
        &self.words
    }

    pub fn uploads(&self) -> &[u8] {
        &self.uploads
    }

    pub fn ptr(&self) -> *const f32 {
        self.words.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn uploads_ptr(&self) -> *const u8 {
        self.uploads.as_ptr()
    }

    pub fn uploads_len(&self) -> usize {
        self.uploads.len()
    }

    #[inline]
    fn push(&mut self, op: f32, args: &[f32]) {
        self.words.push(op);
        self.words.extend_from_slice(args);
    }

    /// Append `bytes` to the arena and record where they landed.
    fn push_upload(&mut self, op: f32, mesh: MeshId, bytes: &[u8]) {
        let offset = self.uploads.len();
        self.uploads.extend_from_slice(bytes);
        let [off_lo, off_hi] = wide(offset);
        let [len_lo, len_hi] = wide(bytes.len());
        self.push(op, &[mesh as u8 as f32, off_lo, off_hi, len_lo, len_hi]);
    }
}

impl Renderer for Encoder {
    fn bind_program(&mut self, stage: Stage, program: ProgramId) {
        self.push(OP_PROGRAM, &[stage as u8 as f32, program as u8 as f32]);
    }

    fn bind_texture(&mut self, program: ProgramId, texture: TextureId) {
        self.push(OP_TEXTURE, &[program as u8 as f32, texture as u8 as f32]);
    }

    fn set_color(&mut self, color: Rgba) {
        self.push(OP_COLOR, &color);
    }

    fn load_model_matrix(&mut self, m: &Mat4) {
        self.push(OP_MODEL, &m.to_cols_array());
    }

    fn load_texture_matrix(&mut self, m: &Mat4) {
        self.push(OP_TEXTURE_MATRIX, &m.to_cols_array());
    }

    fn set_material(&mut self, material: &Material) {
        self.words.push(OP_MATERIAL);
        self.words.extend_from_slice(&material.ambient);
        self.words.extend_from_slice(&material.diffuse);
        self.words.extend_from_slice(&material.specular);
        self.words.push(material.shininess);
    }

    fn draw_quad(&mut self, quad: &Quad) {
        self.words.push(OP_QUAD);
        for c in &quad.0 {
            self.words.extend_from_slice(&[c.x, c.y, c.z, c.u, c.v]);
        }
    }

    fn draw_rect(&mut self, rect: Rect, z: f32) {
        self.push(OP_RECT, &[rect.x0, rect.y0, rect.x1, rect.y1, z]);
    }

    fn draw_mesh(&mut self, mesh: MeshId) {
        self.push(OP_MESH, &[mesh as u8 as f32]);
    }

    fn draw_mesh_range(&mut self, mesh: MeshId, start: u32, count: u32) {
        self.push(OP_MESH_RANGE, &[mesh as u8 as f32, start as f32, count as f32]);
    }

    fn upload(&mut self, mesh: MeshId, bytes: &[u8]) {
        self.push_upload(OP_UPLOAD, mesh, bytes);
    }

    fn upload_indices(&mut self, mesh: MeshId, bytes: &[u8]) {
        self.push_upload(OP_INDICES, mesh, bytes);
    }
}

/// A byte count as two exact f32 words, low 16 bits first.
#[inline]
fn wide(n: usize) -> [f32; 2] {
    let n = n as u32;
    [(n & 0xFFFF) as f32, (n >> 16) as f32]
}

/// Renderer that keeps every call as a typed `Command`.
#[derive(Debug, Default)]
pub struct CommandLog {
    pub commands: Vec<Command>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of draw submissions (quads, rects, meshes).
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Command::Quad(_) | Command::Rect(..) | Command::Mesh(_) | Command::MeshRange(..)
                )
            })
            .count()
    }

    /// Total bytes passed to `upload` and `upload_indices`.
    pub fn uploaded_bytes(&self) -> usize {
        self.commands
            .iter()
            .map(|c| match c {
                Command::Upload(_, bytes) | Command::Indices(_, bytes) => bytes.len(),
                _ => 0,
            })
            .sum()
    }

    /// Bytes of the most recent upload to `mesh`.
    pub fn last_upload(&self, mesh: MeshId) -> Option<&[u8]> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::Upload(m, bytes) if *m == mesh => Some(bytes.as_slice()),
            _ => None,
        })
    }
}

impl Renderer for CommandLog {
    fn bind_program(&mut self, stage: Stage, program: ProgramId) {
        self.commands.push(Command::BindProgram(stage, program));
    }

    fn bind_texture(&mut self, program: ProgramId, texture: TextureId) {
        self.commands.push(Command::BindTexture(program, texture));
    }

    fn set_color(&mut self, color: Rgba) {
        self.commands.push(Command::Color(color));
    }

    fn load_model_matrix(&mut self, m: &Mat4) {
        self.commands.push(Command::ModelMatrix(*m));
    }

    fn load_texture_matrix(&mut self, m: &Mat4) {
        self.commands.push(Command::TextureMatrix(*m));
    }

    fn set_material(&mut self, material: &Material) {
        self.commands.push(Command::Material(*material));
    }

    fn draw_quad(&mut self, quad: &Quad) {
        self.commands.push(Command::Quad(*quad));
    }

    fn draw_rect(&mut self, rect: Rect, z: f32) {
        self.commands.push(Command::Rect(rect, z));
    }

    fn draw_mesh(&mut self, mesh: MeshId) {
        self.commands.push(Command::Mesh(mesh));
    }

    fn draw_mesh_range(&mut self, mesh: MeshId, start: u32, count: u32) {
        self.commands.push(Command::MeshRange(mesh, start, count));
    }

    fn upload(&mut self, mesh: MeshId, bytes: &[u8]) {
        self.commands.push(Command::Upload(mesh, bytes.to_vec()));
    }

    fn upload_indices(&mut self, mesh: MeshId, bytes: &[u8]) {
        self.commands.push(Command::Indices(mesh, bytes.to_vec()));
    }
}
