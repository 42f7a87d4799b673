//! Shader-visible vertex and fragment records.

use crate::math::{Vec2, Vec3, Vec4};

/// Produced by the vertex shader and consumed by the rasterizer.
///
/// `position` starts out as a clip-space 4-vector; the vertex stage
/// rewrites it in place to `(screen_x, screen_y, ndc_z, 1/w_clip)` before
/// handing it to the rasterizer. The rasterizer in turn produces a fresh
/// `VertexOut` per covered pixel with perspective-correct interpolated
/// attributes and `barycentric` filled in.
///
/// Attributes left unfilled by a vertex shader are zeroed (the crate makes
/// no promise about their value beyond that; they're only meaningful if
/// the fragment shader reads them).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexOut {
    pub position: Vec4,
    pub color: Vec4,
    pub uv: Vec2,
    pub normal: Vec3,
    /// Present only when the caller's vertex shader chooses to fill it;
    /// `None` reads as `Vec4::default()` to fragment shaders that expect a
    /// tangent unconditionally.
    pub tangent: Option<Vec4>,
    /// Written by the rasterizer as `(alpha, beta, gamma)` before the
    /// fragment shader runs. The core is agnostic to its meaning; library
    /// shaders commonly use it for wireframe overlay effects.
    pub barycentric: Vec3,
}

/// Returned by the fragment shader.
///
/// `color` is expected to already be premultiplied by `opacity` so the
/// resolve pass can use a plain "over" accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FragmentOutput {
    /// Premultiplied color (`base * opacity`).
    pub color: Vec3,
    /// Per-channel transmission in `[0, 1]`; `1` fully occludes.
    pub opacity: Vec3,
}
