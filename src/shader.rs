//! The shader ABI: function-pointer callbacks plus the opaque, borrowed
//! uniforms value they close over.

use crate::vertex::{FragmentOutput, VertexOut};

/// A vertex shader: given the uniforms and a raw per-vertex byte window
/// (advanced by the caller-supplied stride), fills in a [`VertexOut`].
///
/// The shader must fill `position` with a clip-space 4-vector; every other
/// field is optional and only observed if the fragment shader reads it.
pub type VertexShaderFn<U> = fn(uniforms: &U, raw_vertex: &[u8]) -> VertexOut;

/// A fragment shader: given the uniforms and a perspective-correct
/// interpolated [`VertexOut`], returns the shaded fragment.
pub type FragmentShaderFn<U> = fn(uniforms: &U, interpolated: &VertexOut) -> FragmentOutput;

/// Selects which rasterizer implementation `draw_triangles` dispatches to.
/// Both are required to produce bit-identical A-buffer contents for the
/// same input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterizerMode {
    #[default]
    Scalar,
    Simd,
}

/// The triple installed by `set_program`: vertex shader, fragment shader,
/// and the caller-owned uniforms value.
///
/// The uniforms type is whatever the caller chooses, owned directly rather
/// than boxed behind an opaque pointer; there's nothing here for the core
/// to promise not to touch.
pub(crate) struct ProgramBinding<U> {
    pub vertex_shader: VertexShaderFn<U>,
    pub fragment_shader: FragmentShaderFn<U>,
    pub uniforms: U,
}
