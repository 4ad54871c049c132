/// SIMD-accelerated vector and matrix math via the [`glam`] crate.
///
/// This module re-exports all of [`glam`], which is the numeric library the
/// rest of the engine is written against.
///
/// # Common Types
///
/// - [`Vec2`](fast::Vec2): 2D vector (positions, sizes)
/// - [`Vec4`](fast::Vec4): 4D vector
/// - [`Mat4`](fast::Mat4): 4x4 matrix (view-projection)
///
/// # Examples
///
/// ```
/// use glint_core::math::fast::{Mat4, Vec2};
///
/// let position = Vec2::new(10.0, 20.0);
/// let size = Vec2::new(100.0, 50.0);
/// let corner = position + size;
///
/// let view_projection = Mat4::orthographic_rh(0.0, 1920.0, 0.0, 1080.0, -1.0, 1.0);
/// # let _ = (corner, view_projection);
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}
