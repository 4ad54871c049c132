//! The per-vertex record written into the geometry buffer.

use bytemuck::{Pod, Zeroable};

/// One vertex of a batched quad.
///
/// 40 bytes, tightly packed. The texture slot index travels as an `f32` so
/// it rides the same float attribute pipeline as every other field.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    /// World/screen-space position.
    pub position: [f32; 2],
    /// Normalized texture coordinate.
    pub tex_coord: [f32; 2],
    /// RGBA color or tint. Conceptually 0.0..=1.0, never clamped.
    pub color: [f32; 4],
    /// Slot index into the bound texture units (0 = reserved white).
    pub texture_index: f32,
}

// SAFETY: Vertex is repr(C) with only f32 fields, no padding holes
unsafe impl Pod for Vertex {}
unsafe impl Zeroable for Vertex {}

impl Vertex {
    /// Size of one vertex in bytes.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Returns the wgpu vertex buffer layout for the batched quad pipeline.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
            // location 0: position (vec2)
            0 => Float32x2,
            // location 1: tex_coord (vec2)
            1 => Float32x2,
            // location 2: color (vec4)
            2 => Float32x4,
            // location 3: texture_index (f32)
            3 => Float32,
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
        assert_eq!(Vertex::SIZE, 40);
    }

    #[test]
    fn test_vertex_alignment() {
        assert_eq!(std::mem::align_of::<Vertex>(), 4);
    }

    #[test]
    fn test_layout_stride_matches_size() {
        assert_eq!(Vertex::layout().array_stride, Vertex::SIZE);
    }
}
