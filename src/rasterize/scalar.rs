//! The reference scalar rasterizer: one pixel at a time, incremental edge
//! functions, no vectorization.

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
    let mut row_w = tri.start_w;

    for py in tri.min_y..=tri.max_y {
        let mut w = row_w;

        for px in tri.min_x..=tri.max_x {
            if w[0] >= 0.0 && w[1] >= 0.0 && w[2] >= 0.0 {
                let alpha = w[0] / tri.area;
                let beta = w[1] / tri.area;
                let gamma = w[2] / tri.area;

                shade_and_insert(tri, alpha, beta, gamma, px, py, width, fragment_shader, uniforms, abuffer);
            }

            w[0] += tri.step_x[0];
            w[1] += tri.step_x[1];
            w[2] += tri.step_x[2];
        }

        row_w[0] += tri.step_y[0];
        row_w[1] += tri.step_y[1];
        row_w[2] += tri.step_y[2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;
    use crate::rasterize::prepare_triangle;
    use crate::vertex::{FragmentOutput, VertexOut};

    fn screen_vertex(x: f32, y: f32, z: f32) -> VertexOut {
        VertexOut {
            position: Vec4::new(x, y, z, 1.0),
            ..Default::default()
        }
    }

    fn opaque_white_fs(_u: &(), _v: &VertexOut) -> FragmentOutput {
        FragmentOutput { color: crate::math::Vec3::new(1.0, 1.0, 1.0), opacity: crate::math::Vec3::new(1.0, 1.0, 1.0) }
    }

    /// The scalar rasterizer must insert a fragment at a pixel inside the
    /// triangle and leave a pixel outside its bounding box untouched.
    #[test]
    fn covers_interior_pixel_and_spares_exterior_pixel() {
        let width = 32;
        let height = 32;
        let v = [screen_vertex(8.0, 8.0, 0.5), screen_vertex(24.0, 8.0, 0.5), screen_vertex(16.0, 24.0, 0.5)];
        let tri = prepare_triangle(v, width, height, false).expect("non-degenerate triangle");

        let mut abuffer = ABuffer::new((width * height) as usize);
        rasterize(&tri, width, opaque_white_fs, &(), &mut abuffer);

        let centroid_pixel = 13 * width as usize + 16;
        assert!(abuffer.iter_pixel(centroid_pixel).next().is_some(), "centroid pixel should have a fragment");

        let corner_pixel = 0;
        assert!(abuffer.iter_pixel(corner_pixel).next().is_none(), "corner pixel should stay empty");
    }
}
