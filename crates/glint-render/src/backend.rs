//! The draw-backend contract the batch session drains into.

use glint_core::math::fast::Mat4;

use crate::slots::TextureHandle;
use crate::vertex::Vertex;

/// One indexed-triangles draw target plus the shader and texture binding
/// surface around it.
///
/// The session calls these in a fixed order per flush: `upload_vertices`
/// with the written prefix, `bind_texture_slots` with the occupied slot
/// list, `set_view_projection`, then exactly one `draw_indexed` covering
/// the pending index count. Implementations never see partially flushed
/// state.
pub trait QuadBackend {
    /// Handle of the backend's reserved 1x1 opaque-white texture, the
    /// permanent occupant of slot 0.
    fn white_texture(&self) -> TextureHandle;

    /// Number of texture units one draw call can bind on this backend.
    fn max_texture_slots(&self) -> usize;

    /// Copy the written vertex prefix into GPU-visible storage.
    fn upload_vertices(&mut self, vertices: &[Vertex]);

    /// Bind `slots[i]` to texture unit `i` for the next draw call.
    fn bind_texture_slots(&mut self, slots: &[TextureHandle]);

    /// Push the view-projection matrix the next draw call uses.
    fn set_view_projection(&mut self, view_projection: Mat4);

    /// Issue one indexed triangle draw covering `index_count` indices.
    fn draw_indexed(&mut self, index_count: u32);
}
