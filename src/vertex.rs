// vertex.rs - Typed GPU vertex records
//
// Simulation code fills these structs field by field; `as_bytes` is the only
// place that knows the flat layout the host uploads. Every record is plain
// 4-byte fields, so `#[repr(C)]` has no padding.

use bytemuck::{Pod, Zeroable};

/// Water surface vertex: position, texture coordinate, normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct WaterVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub s: f32,
    pub t: f32,
    pub nx: f32,
    pub ny: f32,
    pub nz: f32,
}

/// Grass blade vertex: packed ABGR colour, position, texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct BladeVertex {
    pub color: u32,
    pub x: f32,
    pub y: f32,
    pub s: f32,
    pub t: f32,
}

/// Star point sprite: packed ABGR colour, position, point size.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct StarVertex {
    pub color: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,
}

/// Serialize a slice of vertex records into the host upload layout.
#[inline]
pub fn as_bytes<V: Pod>(vertices: &[V]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
