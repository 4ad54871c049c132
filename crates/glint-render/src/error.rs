//! Error types for the batching engine.

use std::collections::TryReserveError;
use std::fmt;

/// Errors that can occur while setting up the batching engine.
///
/// Routine overflow of the geometry buffer or the texture-slot table is not
/// an error: it is recovered internally by an automatic flush and never
/// surfaces here. Protocol misuse (submitting outside a batch) is a
/// programmer error and panics instead of corrupting the write cursor.
#[derive(Debug)]
pub enum RenderError {
    /// The geometry buffer's backing storage could not be allocated. The
    /// engine cannot start without it; there is no partial-capacity
    /// fallback.
    AllocationFailed {
        /// Number of vertices that were requested.
        vertices: usize,
        /// The underlying allocator error.
        source: TryReserveError,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::AllocationFailed { vertices, source } => {
                write!(
                    f,
                    "failed to allocate geometry storage for {} vertices: {}",
                    vertices, source
                )
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::AllocationFailed { source, .. } => Some(source),
        }
    }
}

/// Result type alias for engine setup.
pub type RenderResult<T> = Result<T, RenderError>;
