//! A CPU-only software triangle rasterizer with a programmable shader ABI
//! and an order-independent-transparency A-buffer.
//!
//! The pipeline, leaves first: [`math`] primitives feed [`matrix_stack`]
//! transforms, which [`context`] applies to vertices produced by a
//! caller-supplied vertex shader. [`rasterize`] walks the resulting screen
//! triangle and, for every covered pixel, hands a perspective-correct
//! interpolated vertex to a fragment shader, whose output is inserted into
//! the per-pixel sorted list kept by [`abuffer`] (backed by the [`arena`]
//! allocator). [`Context::resolve`] composites those lists into the final
//! framebuffer.
//!
//! There is no GPU, no multithreading, and no implicit state beyond a
//! single [`Context`]: every operation is a plain synchronous method call.

mod abuffer;
mod arena;
mod context;
mod error;
mod framebuffer;
mod interpolate;
mod math;
mod matrix_stack;
mod rasterize;
mod shader;
mod vertex;

pub use arena::ArenaStats;
pub use context::Context;
pub use error::{RasterError, RasterResult};
pub use interpolate::Interpolate;
pub use math::{Mat4, Vec2, Vec3, Vec4};
pub use matrix_stack::{MatrixMode, MAX_MATRIX_STACK};
pub use shader::{FragmentShaderFn, RasterizerMode, VertexShaderFn};
pub use vertex::{FragmentOutput, VertexOut};
