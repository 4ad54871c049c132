//! A recording backend for tests, benchmarks and headless runs.
//!
//! [`RecordingBackend`] honors the [`QuadBackend`] contract while capturing
//! every call, so batch behavior (flush counts, slot binding, upload sizes)
//! can be asserted without a GPU.

use glint_core::math::fast::Mat4;

use crate::backend::QuadBackend;
use crate::slots::TextureHandle;
use crate::vertex::Vertex;

/// A single recorded contract call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// `upload_vertices` with this many vertices.
    Upload { vertex_count: usize },
    /// `bind_texture_slots` with the occupied slot list.
    Bind { slots: Vec<TextureHandle> },
    /// `set_view_projection`.
    SetViewProjection,
    /// `draw_indexed` covering this many indices.
    Draw { index_count: u32 },
}

/// Backend that records contract calls instead of talking to a GPU.
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    max_slots: usize,
    next_handle: u64,
    last_upload: Vec<Vertex>,
}

impl RecordingBackend {
    /// Handle of the mock's reserved white texture.
    pub const WHITE: TextureHandle = TextureHandle::from_raw(1);

    pub fn new() -> Self {
        Self::with_max_slots(32)
    }

    /// A mock with fewer slots, for exercising slot exhaustion without 32
    /// distinct handles.
    pub fn with_max_slots(max_slots: usize) -> Self {
        Self {
            calls: Vec::new(),
            max_slots,
            next_handle: 2,
            last_upload: Vec::new(),
        }
    }

    /// Mint a fresh opaque handle, the way a texture loader would.
    pub fn register_texture(&mut self) -> TextureHandle {
        let handle = TextureHandle::from_raw(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Every contract call in order.
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Number of `draw_indexed` calls recorded.
    pub fn draw_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BackendCall::Draw { .. }))
            .count()
    }

    /// Index counts of every `draw_indexed` call, in order.
    pub fn draw_index_counts(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::Draw { index_count } => Some(*index_count),
                _ => None,
            })
            .collect()
    }

    /// The vertices of the most recent upload.
    pub fn last_upload(&self) -> &[Vertex] {
        &self.last_upload
    }

    /// The slot list of the most recent bind, if any.
    pub fn last_bound_slots(&self) -> Option<&[TextureHandle]> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::Bind { slots } => Some(slots.as_slice()),
            _ => None,
        })
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.calls.clear();
        self.last_upload.clear();
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadBackend for RecordingBackend {
    fn white_texture(&self) -> TextureHandle {
        Self::WHITE
    }

    fn max_texture_slots(&self) -> usize {
        self.max_slots
    }

    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        self.last_upload = vertices.to_vec();
        self.calls.push(BackendCall::Upload {
            vertex_count: vertices.len(),
        });
    }

    fn bind_texture_slots(&mut self, slots: &[TextureHandle]) {
        self.calls.push(BackendCall::Bind {
            slots: slots.to_vec(),
        });
    }

    fn set_view_projection(&mut self, _view_projection: Mat4) {
        self.calls.push(BackendCall::SetViewProjection);
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.calls.push(BackendCall::Draw { index_count });
    }
}
