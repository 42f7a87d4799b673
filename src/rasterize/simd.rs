//! The 4-wide rasterizer variant.
//!
//! Coverage is tested four pixels at a time with `wide::f32x4` compares.
//! The edge-function values themselves are produced by the exact same
//! scalar increment sequence the reference rasterizer uses, only the
//! *test* is vectorized, so a covered pixel shades through
//! [`shade_and_insert`] with bit-identical inputs on both paths. The tail
//! past the last full 4-pixel group in a row falls back to scalar stepping
//! starting exactly at `x_end_simd`, so there is no seam recomputation.

use wide::f32x4;

use super::{shade_and_insert, PreparedTriangle};
use crate::abuffer::ABuffer;
use crate::shader::FragmentShaderFn;

pub(crate) fn rasterize<U>(
    tri: &PreparedTriangle,
    width: u32,
    fragment_shader: FragmentShaderFn<U>,
    uniforms: &U,
    abuffer: &mut ABuffer,
) {
    let row_cols = tri.max_x - tri.min_x + 1;
    let simd_cols = (row_cols / 4) * 4;
    let x_end_simd = tri.min_x + simd_cols;

    let mut row_w = tri.start_w;

    for py in tri.min_y..=tri.max_y {
        let mut w = row_w;
        let mut px = tri.min_x;

        while px < x_end_simd {
            let mut w0 = [0.0f32; 4];
            let mut w1 = [0.0f32; 4];
            let mut w2 = [0.0f32; 4];

            for lane in w0.iter_mut().zip(w1.iter_mut()).zip(w2.iter_mut()) {
                let ((l0, l1), l2) = lane;
                *l0 = w[0];
                *l1 = w[1];
                *l2 = w[2];

                w[0] += tri.step_x[0];
                w[1] += tri.step_x[1];
                w[2] += tri.step_x[2];
            }

            let zero = f32x4::splat(0.0);
            let cov0 = f32x4::from(w0).cmp_ge(zero).to_array();
            let cov1 = f32x4::from(w1).cmp_ge(zero).to_array();
            let cov2 = f32x4::from(w2).cmp_ge(zero).to_array();

            for lane in 0..4 {
                if cov0[lane].to_bits() != 0 && cov1[lane].to_bits() != 0 && cov2[lane].to_bits() != 0 {
                    let lane_px = px + lane as i32;
                    let alpha = w0[lane] / tri.area;
                    let beta = w1[lane] / tri.area;
                    let gamma = w2[lane] / tri.area;

                    shade_and_insert(tri, alpha, beta, gamma, lane_px, py, width, fragment_shader, uniforms, abuffer);
                }
            }

            px += 4;
        }

        // Scalar tail, continuing the very same `w` accumulator so there is
        // no discontinuity at the seam.
        while px <= tri.max_x {
            if w[0] >= 0.0 && w[1] >= 0.0 && w[2] >= 0.0 {
                let alpha = w[0] / tri.area;
                let beta = w[1] / tri.area;
                let gamma = w[2] / tri.area;

                shade_and_insert(tri, alpha, beta, gamma, px, py, width, fragment_shader, uniforms, abuffer);
            }

            w[0] += tri.step_x[0];
            w[1] += tri.step_x[1];
            w[2] += tri.step_x[2];
            px += 1;
        }

        row_w[0] += tri.step_y[0];
        row_w[1] += tri.step_y[1];
        row_w[2] += tri.step_y[2];
    }
}
