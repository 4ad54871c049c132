//! The batch session: quad accumulation, overflow handling and flush.

use glint_core::math::fast::{Mat4, Vec2};

use crate::backend::QuadBackend;
use crate::color::Color;
use crate::error::RenderResult;
use crate::geometry::GeometryBuffer;
use crate::slots::{SlotTableFull, TextureHandle, TextureSlotTable};
use crate::vertex::Vertex;

/// Capacity configuration for a [`QuadBatcher`].
#[derive(Debug, Clone)]
pub struct QuadBatcherDescriptor {
    /// Quads one sub-batch can hold before a flush is forced.
    pub max_quads: usize,
    /// Upper bound on texture slots per draw call, including the reserved
    /// white slot. Clamped to what the backend reports.
    pub max_texture_slots: usize,
}

impl Default for QuadBatcherDescriptor {
    fn default() -> Self {
        Self {
            max_quads: 1000,
            max_texture_slots: 32,
        }
    }
}

/// Per-frame counters, reset explicitly by the caller at frame start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Quads submitted since the last reset.
    pub quad_count: u32,
    /// Indexed draw calls issued since the last reset.
    pub draw_calls: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchState {
    Idle,
    Writing,
}

/// Batch session over a draw backend.
///
/// Accumulates quad submissions into a fixed-capacity geometry buffer and
/// drains it with the minimum number of indexed draw calls. Overflow of the
/// buffer or of the texture-slot table triggers an automatic flush that is
/// invisible to the caller; the public surface is `begin_batch`, the two
/// submit calls and `end_batch`.
///
/// Submitting outside a batch is a programmer error and panics rather than
/// corrupting the write cursor.
pub struct QuadBatcher<B: QuadBackend> {
    backend: B,
    buffer: GeometryBuffer,
    slots: TextureSlotTable,
    pending_indices: u32,
    view_projection: Mat4,
    stats: RenderStats,
    state: BatchState,
}

impl<B: QuadBackend> QuadBatcher<B> {
    /// Allocate the geometry buffer and seed the slot table with the
    /// backend's white texture.
    ///
    /// Fails only if the backing storage cannot be allocated; the engine
    /// cannot start without it.
    pub fn new(backend: B, descriptor: QuadBatcherDescriptor) -> RenderResult<Self> {
        let buffer = GeometryBuffer::allocate(descriptor.max_quads)?;
        let max_slots = descriptor
            .max_texture_slots
            .min(backend.max_texture_slots());
        let slots = TextureSlotTable::new(backend.white_texture(), max_slots);

        tracing::info!(
            "Created quad batcher: {} quads, {} texture slots",
            descriptor.max_quads,
            max_slots
        );

        Ok(Self {
            backend,
            buffer,
            slots,
            pending_indices: 0,
            view_projection: Mat4::IDENTITY,
            stats: RenderStats::default(),
            state: BatchState::Idle,
        })
    }

    /// The matrix pushed to the backend before each flush's draw call.
    pub fn set_view_projection(&mut self, view_projection: Mat4) {
        self.view_projection = view_projection;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Start a logical batch: write cursor to the start, slot table down to
    /// the reserved white slot, no pending indices.
    pub fn begin_batch(&mut self) {
        self.buffer.begin_write();
        self.slots.reset();
        self.pending_indices = 0;
        self.state = BatchState::Writing;
    }

    /// Submit a color-only quad. Always uses the reserved white slot.
    pub fn submit_quad(&mut self, position: Vec2, size: Vec2, color: Color) {
        self.ensure_writing("submit_quad");
        if self.pending_indices >= self.buffer.max_index_count() {
            self.flush();
        }
        self.append(position, size, color, 0.0);
    }

    /// Submit a textured quad with a full-opacity white tint.
    ///
    /// The handle is deduplicated against the slot table, so submitting the
    /// same texture any number of times within one sub-batch consumes one
    /// slot. A full buffer or a full table drains the pending sub-batch
    /// first; the slot is then re-resolved against the just-reset table.
    pub fn submit_textured(&mut self, position: Vec2, size: Vec2, texture: TextureHandle) {
        self.ensure_writing("submit_textured");
        if self.pending_indices >= self.buffer.max_index_count() {
            self.flush();
        }
        let slot = match self.slots.slot_for(texture) {
            Ok(slot) => slot,
            Err(SlotTableFull) => {
                self.flush();
                // the flush reset the table, so the retry always finds room
                self.slots
                    .slot_for(texture)
                    .expect("slot table still full after flush")
            }
        };
        self.append(position, size, Color::WHITE, slot as f32);
    }

    /// End the logical batch, draining anything still pending.
    ///
    /// Calling it again without intervening submissions is a no-op.
    pub fn end_batch(&mut self) {
        if self.state == BatchState::Idle {
            return;
        }
        if self.pending_indices > 0 {
            self.flush();
        }
        self.state = BatchState::Idle;
    }

    /// Counters since the last [`reset_stats`](Self::reset_stats).
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Zero the per-frame counters. Called by the frame loop once per
    /// frame.
    pub fn reset_stats(&mut self) {
        self.stats = RenderStats::default();
    }

    fn append(&mut self, position: Vec2, size: Vec2, color: Color, texture_index: f32) {
        let color = color.to_array();
        let (x, y) = (position.x, position.y);
        let (w, h) = (size.x, size.y);

        self.buffer.append_quad([
            Vertex {
                position: [x, y],
                tex_coord: [0.0, 0.0],
                color,
                texture_index,
            },
            Vertex {
                position: [x + w, y],
                tex_coord: [1.0, 0.0],
                color,
                texture_index,
            },
            Vertex {
                position: [x + w, y + h],
                tex_coord: [1.0, 1.0],
                color,
                texture_index,
            },
            Vertex {
                position: [x, y + h],
                tex_coord: [0.0, 1.0],
                color,
                texture_index,
            },
        ]);

        self.pending_indices += 6;
        self.stats.quad_count += 1;
    }

    /// Drain the pending sub-batch: upload the written prefix, bind the
    /// occupied slots, push the matrix, issue one draw call, then reset the
    /// accumulation state so submissions can continue without a
    /// `begin_batch`.
    fn flush(&mut self) {
        tracing::trace!(
            "Flushing {} quads ({} bytes, {} slots)",
            self.buffer.quads_written(),
            self.buffer.bytes_written(),
            self.slots.occupancy()
        );

        self.backend.upload_vertices(self.buffer.written());
        self.backend.bind_texture_slots(self.slots.occupied());
        self.backend.set_view_projection(self.view_projection);
        self.backend.draw_indexed(self.pending_indices);
        self.stats.draw_calls += 1;

        self.pending_indices = 0;
        self.slots.reset();
        self.buffer.begin_write();
    }

    fn ensure_writing(&self, op: &str) {
        assert!(
            self.state == BatchState::Writing,
            "{op} called outside begin_batch/end_batch"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingBackend;

    fn batcher(max_quads: usize) -> QuadBatcher<RecordingBackend> {
        QuadBatcher::new(
            RecordingBackend::new(),
            QuadBatcherDescriptor {
                max_quads,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    #[should_panic(expected = "submit_quad called outside begin_batch/end_batch")]
    fn test_submit_before_begin_panics() {
        let mut batcher = batcher(4);
        batcher.submit_quad(Vec2::ZERO, Vec2::ONE, Color::RED);
    }

    #[test]
    #[should_panic(expected = "submit_textured called outside begin_batch/end_batch")]
    fn test_submit_after_end_panics() {
        let mut batcher = batcher(4);
        batcher.begin_batch();
        batcher.end_batch();
        let texture = batcher.backend_mut().register_texture();
        batcher.submit_textured(Vec2::ZERO, Vec2::ONE, texture);
    }

    #[test]
    fn test_empty_batch_issues_no_draw() {
        let mut batcher = batcher(4);
        batcher.begin_batch();
        batcher.end_batch();
        assert_eq!(batcher.stats().draw_calls, 0);
    }

    #[test]
    fn test_reset_stats_zeroes_counters() {
        let mut batcher = batcher(4);
        batcher.begin_batch();
        batcher.submit_quad(Vec2::ZERO, Vec2::ONE, Color::RED);
        batcher.end_batch();
        assert_ne!(batcher.stats(), RenderStats::default());

        batcher.reset_stats();
        assert_eq!(batcher.stats(), RenderStats::default());
    }

    #[test]
    fn test_begin_after_end_starts_fresh() {
        let mut batcher = batcher(4);
        batcher.begin_batch();
        batcher.submit_quad(Vec2::ZERO, Vec2::ONE, Color::RED);
        batcher.end_batch();

        batcher.begin_batch();
        batcher.submit_quad(Vec2::ZERO, Vec2::ONE, Color::BLUE);
        batcher.end_batch();

        assert_eq!(batcher.stats().quad_count, 2);
        assert_eq!(batcher.stats().draw_calls, 2);
    }
}
