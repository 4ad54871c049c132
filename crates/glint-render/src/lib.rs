//! Batched quad rendering with bounded texture-slot allocation.
//!
//! Many independent "draw this rectangle" requests are aggregated into the
//! minimum number of indexed draw calls against a fixed-capacity geometry
//! buffer. Within each draw call a bounded set of texture handles is mapped
//! onto hardware texture units, with repeated handles deduplicated so they
//! never consume additional units. Overflow of either the buffer or the slot
//! table triggers an automatic flush that is invisible to the caller.
//!
//! The frame loop drives a [`QuadBatcher`]:
//!
//! ```
//! use glint_core::math::fast::Vec2;
//! use glint_render::mock::RecordingBackend;
//! use glint_render::{Color, QuadBatcher, QuadBatcherDescriptor};
//!
//! let mut batcher = QuadBatcher::new(
//!     RecordingBackend::new(),
//!     QuadBatcherDescriptor::default(),
//! )?;
//!
//! batcher.reset_stats();
//! batcher.begin_batch();
//! batcher.submit_quad(Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0), Color::RED);
//! batcher.end_batch();
//!
//! assert_eq!(batcher.stats().draw_calls, 1);
//! # Ok::<(), glint_render::RenderError>(())
//! ```
//!
//! The GPU side lives behind the [`QuadBackend`] trait; [`WgpuBackend`] is
//! the real implementation and [`mock::RecordingBackend`] records the
//! contract calls for tests and benchmarks.

mod backend;
mod batch;
mod color;
mod context;
mod error;
mod geometry;
pub mod mock;
mod pipeline;
mod slots;
mod vertex;
mod wgpu_backend;

pub use backend::QuadBackend;
pub use batch::{QuadBatcher, QuadBatcherDescriptor, RenderStats};
pub use color::Color;
pub use context::GraphicsContext;
pub use error::{RenderError, RenderResult};
pub use geometry::{GeometryBuffer, build_quad_indices};
pub use slots::{SlotTableFull, TextureHandle, TextureSlotTable};
pub use vertex::Vertex;
pub use wgpu_backend::{WgpuBackend, WgpuBackendDescriptor};

pub use wgpu;
