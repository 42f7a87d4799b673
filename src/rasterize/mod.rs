//! Shared edge-function setup and perspective-correct shading, consumed by
//! both the [`scalar`] and [`simd`] rasterizer variants.

pub mod scalar;
pub mod simd;

use crate::abuffer::ABuffer;
use crate::interpolate::Interpolate;
use crate::math::{Vec2, Vec3, Vec4};
use crate::shader::FragmentShaderFn;
use crate::vertex::VertexOut;

/// Degenerate triangles below this absolute area are discarded outright.
const MIN_AREA: f32 = 1e-4;

#[inline]
fn edge_function(ax: f32, ay: f32, bx: f32, by: f32, px: f32, py: f32) -> f32 {
    (px - ax) * (by - ay) - (py - ay) * (bx - ax)
}

/// A triangle that has passed culling/degeneracy checks, with its winding
/// normalized to positive area and its edge functions set up to be stepped
/// incrementally across its screen-space bounding box.
pub(crate) struct PreparedTriangle {
    v: [VertexOut; 3],
    area: f32,
    /// Edge function values at the bounding box's first sample point
    /// `(min_x + 0.5, min_y + 0.5)`.
    start_w: [f32; 3],
    /// Per-pixel-column increment of each edge function.
    step_x: [f32; 3],
    /// Per-pixel-row increment of each edge function.
    step_y: [f32; 3],
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

/// Performs culling, degeneracy rejection, winding normalization, and
/// bounding-box/edge-function setup for one triangle. Returns `None` if the
/// triangle should not be rasterized at all.
pub(crate) fn prepare_triangle(v: [VertexOut; 3], width: u32, height: u32, cull_back_face: bool) -> Option<PreparedTriangle> {
    let (x0, y0) = (v[0].position.x, v[0].position.y);
    let (x1, y1) = (v[1].position.x, v[1].position.y);
    let (x2, y2) = (v[2].position.x, v[2].position.y);

    let raw_area = edge_function(x0, y0, x1, y1, x2, y2);

    if cull_back_face && raw_area < 0.0 {
        return None;
    }

    if raw_area.abs() < MIN_AREA {
        return None;
    }

    // Unconditionally convert to positive-area form: rather than branching
    // mid-computation on winding, fold the sign into area and every step so
    // the rest of the pipeline always tests `w_i >= 0` for coverage.
    let sign = if raw_area < 0.0 { -1.0 } else { 1.0 };
    let area = raw_area * sign;

    let min_x = x0.min(x1).min(x2).round().clamp(0.0, (width - 1) as f32) as i32;
    let max_x = x0.max(x1).max(x2).round().clamp(0.0, (width - 1) as f32) as i32;
    let min_y = y0.min(y1).min(y2).round().clamp(0.0, (height - 1) as f32) as i32;
    let max_y = y0.max(y1).max(y2).round().clamp(0.0, (height - 1) as f32) as i32;

    if min_x > max_x || min_y > max_y {
        return None;
    }

    let xs = [x0, x1, x2];
    let ys = [y0, y1, y2];

    // w_i = E(v_{i+1}, v_{i+2}, P), the edge function opposite vertex i.
    let mut start_w = [0.0f32; 3];
    let mut step_x = [0.0f32; 3];
    let mut step_y = [0.0f32; 3];

    let sample_x = min_x as f32 + 0.5;
    let sample_y = min_y as f32 + 0.5;

    for i in 0..3 {
        let i1 = (i + 1) % 3;
        let i2 = (i + 2) % 3;

        start_w[i] = edge_function(xs[i1], ys[i1], xs[i2], ys[i2], sample_x, sample_y) * sign;
        step_x[i] = (ys[i2] - ys[i1]) * sign;
        step_y[i] = (xs[i1] - xs[i2]) * sign;
    }

    Some(PreparedTriangle {
        v,
        area,
        start_w,
        step_x,
        step_y,
        min_x,
        max_x,
        min_y,
        max_y,
    })
}

/// Builds the perspective-correct interpolated vertex-out for a covered
/// pixel, runs the fragment shader, and inserts the result into the
/// A-buffer. Shared by the scalar and SIMD rasterizers so that a pixel
/// covered by both produces bit-identical shading.
#[allow(clippy::too_many_arguments)]
pub(crate) fn shade_and_insert<U>(
    tri: &PreparedTriangle,
    alpha: f32,
    beta: f32,
    gamma: f32,
    px: i32,
    py: i32,
    width: u32,
    fragment_shader: FragmentShaderFn<U>,
    uniforms: &U,
    abuffer: &mut ABuffer,
) {
    let inv_w0 = tri.v[0].position.w;
    let inv_w1 = tri.v[1].position.w;
    let inv_w2 = tri.v[2].position.w;

    let w_final = 1.0 / (alpha * inv_w0 + beta * inv_w1 + gamma * inv_w2);

    // Perspective-correct barycentric weights: already sum to 1.
    let pu = alpha * inv_w0 * w_final;
    let pv = beta * inv_w1 * w_final;
    let pw = gamma * inv_w2 * w_final;

    let z = f32::barycentric_interpolate(pu, &tri.v[0].position.z, pv, &tri.v[1].position.z, pw, &tri.v[2].position.z);

    if z < 0.0 || z > 1.0 {
        return;
    }

    let color = Vec4::barycentric_interpolate(pu, &tri.v[0].color, pv, &tri.v[1].color, pw, &tri.v[2].color);
    let uv = Vec2::barycentric_interpolate(pu, &tri.v[0].uv, pv, &tri.v[1].uv, pw, &tri.v[2].uv);
    let normal = Vec3::barycentric_interpolate(pu, &tri.v[0].normal, pv, &tri.v[1].normal, pw, &tri.v[2].normal);

    let tangent = match (tri.v[0].tangent, tri.v[1].tangent, tri.v[2].tangent) {
        (Some(t0), Some(t1), Some(t2)) => Some(Vec4::barycentric_interpolate(pu, &t0, pv, &t1, pw, &t2)),
        _ => None,
    };

    let vertex_out = VertexOut {
        position: Vec4::new(px as f32 + 0.5, py as f32 + 0.5, z, w_final),
        color,
        uv,
        normal,
        tangent,
        barycentric: Vec3::new(alpha, beta, gamma),
    };

    let output = fragment_shader(uniforms, &vertex_out);

    let pixel = py as usize * width as usize + px as usize;
    abuffer.insert(pixel, z, output.color, output.opacity);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_vertex(x: f32, y: f32, z: f32) -> VertexOut {
        VertexOut {
            position: Vec4::new(x, y, z, 1.0),
            ..Default::default()
        }
    }

    /// A point inside the triangle must pass the `w0,w1,w2 >= 0` coverage
    /// test; a point well outside it must fail on at least one edge. This
    /// is the mask `scalar.rs`/`simd.rs` rely on, checked independently of
    /// the full `Context` pipeline.
    #[test]
    fn coverage_mask_matches_known_interior_and_exterior_points() {
        let v = [screen_vertex(8.0, 8.0, 0.0), screen_vertex(24.0, 8.0, 0.0), screen_vertex(16.0, 24.0, 0.0)];
        let tri = prepare_triangle(v, 32, 32, false).expect("non-degenerate triangle");

        let w_at = |px: i32, py: i32| {
            let dx = (px - tri.min_x) as f32;
            let dy = (py - tri.min_y) as f32;
            [
                tri.start_w[0] + dx * tri.step_x[0] + dy * tri.step_y[0],
                tri.start_w[1] + dx * tri.step_x[1] + dy * tri.step_y[1],
                tri.start_w[2] + dx * tri.step_x[2] + dy * tri.step_y[2],
            ]
        };

        // The centroid, (16, 13.33), rounds to a pixel well inside the
        // triangle's interior.
        let inside = w_at(16, 13);
        assert!(inside[0] >= 0.0 && inside[1] >= 0.0 && inside[2] >= 0.0, "centroid pixel should be covered: {:?}", inside);

        // A pixel outside the bounding box entirely.
        let outside = w_at(0, 0);
        assert!(
            outside[0] < 0.0 || outside[1] < 0.0 || outside[2] < 0.0,
            "corner pixel should fail coverage: {:?}",
            outside
        );
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        let v = [screen_vertex(1.0, 1.0, 0.0), screen_vertex(1.0, 1.0, 0.0), screen_vertex(1.0, 1.0, 0.0)];
        assert!(prepare_triangle(v, 32, 32, false).is_none());
    }

    #[test]
    fn back_facing_triangle_is_discarded_when_culling_enabled() {
        // Same vertices as the coverage-mask test: `E(v0, v1, v2)` is
        // negative for this winding, so it's the one back-face culling
        // rejects when enabled.
        let v = [screen_vertex(8.0, 8.0, 0.0), screen_vertex(24.0, 8.0, 0.0), screen_vertex(16.0, 24.0, 0.0)];
        assert!(prepare_triangle(v, 32, 32, true).is_none());
        assert!(prepare_triangle(v, 32, 32, false).is_some());
    }
}
