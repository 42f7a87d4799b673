//! Error types surfaced by the rasterizer core.
//!
//! Almost nothing here is actually fallible at runtime: an unset shader, a
//! degenerate triangle, an exhausted arena, or a matrix-stack under/overflow
//! are all silent no-ops, because the only consumer is a real-time render
//! loop with no per-frame error channel. The sole case that *is* rejected
//! outright is constructing a context with a degenerate framebuffer.

use thiserror::Error;

/// Errors returned by fallible entry points of [`crate::Context`](crate::context::Context).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RasterError {
    /// `Context::new` was called with a zero width or height.
    #[error("framebuffer dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions {
        /// requested width
        width: u32,
        /// requested height
        height: u32,
    },
}

/// Convenience alias for results returned by the rasterizer core.
pub type RasterResult<T> = Result<T, RasterError>;
