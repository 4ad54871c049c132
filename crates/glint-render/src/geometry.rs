//! Fixed-capacity CPU staging for batched quad geometry.

use bytemuck::Zeroable;

use crate::error::{RenderError, RenderResult};
use crate::vertex::Vertex;

/// Pre-allocated staging region for `max_quads * 4` vertices with a write
/// cursor.
///
/// The storage is sized once at construction and reused across every frame;
/// the cursor is reset, never the allocation. Deciding *when* a flush must
/// happen is the session's job, but [`append_quad`](Self::append_quad)
/// still asserts the capacity invariant so a misused buffer fails instead
/// of writing past the end.
pub struct GeometryBuffer {
    vertices: Vec<Vertex>,
    cursor: usize,
    max_quads: usize,
}

impl GeometryBuffer {
    /// Reserve backing storage for `max_quads` quads.
    ///
    /// The only failure mode is an out-of-memory condition; there is no
    /// partial-capacity fallback.
    pub fn allocate(max_quads: usize) -> RenderResult<Self> {
        let vertex_count = max_quads * 4;
        let mut vertices = Vec::new();
        vertices
            .try_reserve_exact(vertex_count)
            .map_err(|source| RenderError::AllocationFailed {
                vertices: vertex_count,
                source,
            })?;
        vertices.resize(vertex_count, Vertex::zeroed());

        Ok(Self {
            vertices,
            cursor: 0,
            max_quads,
        })
    }

    /// Reset the write cursor to the start of storage. Required before the
    /// first append of a sub-batch.
    pub fn begin_write(&mut self) {
        self.cursor = 0;
    }

    /// Write four vertices for one quad at the cursor and advance it.
    ///
    /// Panics if no quad's worth of capacity remains; the session must have
    /// flushed before this point.
    pub fn append_quad(&mut self, quad: [Vertex; 4]) {
        assert!(
            self.cursor + 4 <= self.vertices.len(),
            "geometry buffer overflow: all {} quads already written",
            self.max_quads
        );
        self.vertices[self.cursor..self.cursor + 4].copy_from_slice(&quad);
        self.cursor += 4;
    }

    /// The written prefix, in submission order. This is what gets uploaded;
    /// everything past the cursor is stale data from earlier sub-batches.
    pub fn written(&self) -> &[Vertex] {
        &self.vertices[..self.cursor]
    }

    /// Byte offset of the cursor from the start of storage.
    pub fn bytes_written(&self) -> usize {
        self.cursor * std::mem::size_of::<Vertex>()
    }

    /// Quads written since the last [`begin_write`](Self::begin_write).
    pub fn quads_written(&self) -> usize {
        self.cursor / 4
    }

    /// Total capacity in quads, fixed at allocation.
    pub fn quad_capacity(&self) -> usize {
        self.max_quads
    }

    /// Highest index count one sub-batch can cover (6 indices per quad).
    pub fn max_index_count(&self) -> u32 {
        (self.max_quads * 6) as u32
    }
}

/// Build the static index data for `quad_count` quads: the repeating
/// `0,1,2, 2,3,0` pattern offset by four per quad.
///
/// Computed once at backend construction, uploaded as static index data and
/// never touched again; the renderer only ever draws quads.
pub fn build_quad_indices(quad_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(quad_count * 6);
    let mut offset = 0u32;
    for _ in 0..quad_count {
        indices.extend_from_slice(&[
            offset,
            offset + 1,
            offset + 2,
            offset + 2,
            offset + 3,
            offset,
        ]);
        offset += 4;
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32) -> Vertex {
        Vertex {
            position: [x, 0.0],
            tex_coord: [0.0, 0.0],
            color: [1.0, 1.0, 1.0, 1.0],
            texture_index: 0.0,
        }
    }

    fn quad(x: f32) -> [Vertex; 4] {
        [vertex(x), vertex(x + 1.0), vertex(x + 2.0), vertex(x + 3.0)]
    }

    #[test]
    fn test_cursor_advances_per_quad() {
        let mut buffer = GeometryBuffer::allocate(4).unwrap();
        buffer.begin_write();
        assert_eq!(buffer.bytes_written(), 0);

        buffer.append_quad(quad(0.0));
        assert_eq!(buffer.quads_written(), 1);
        assert_eq!(buffer.written().len(), 4);
        assert_eq!(buffer.bytes_written(), 4 * std::mem::size_of::<Vertex>());

        buffer.append_quad(quad(10.0));
        assert_eq!(buffer.quads_written(), 2);
        assert_eq!(buffer.written()[4].position, [10.0, 0.0]);
    }

    #[test]
    fn test_begin_write_resets_cursor() {
        let mut buffer = GeometryBuffer::allocate(2).unwrap();
        buffer.begin_write();
        buffer.append_quad(quad(0.0));
        buffer.begin_write();
        assert_eq!(buffer.bytes_written(), 0);
        assert!(buffer.written().is_empty());
    }

    #[test]
    #[should_panic(expected = "geometry buffer overflow")]
    fn test_append_past_capacity_panics() {
        let mut buffer = GeometryBuffer::allocate(1).unwrap();
        buffer.begin_write();
        buffer.append_quad(quad(0.0));
        buffer.append_quad(quad(1.0));
    }

    #[test]
    fn test_capacity_and_index_count() {
        let buffer = GeometryBuffer::allocate(1000).unwrap();
        assert_eq!(buffer.quad_capacity(), 1000);
        assert_eq!(buffer.max_index_count(), 6000);
    }

    #[test]
    fn test_index_pattern() {
        let indices = build_quad_indices(2);
        assert_eq!(indices, vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
    }
}
