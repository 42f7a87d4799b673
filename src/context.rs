//! The top-level rendering context tying the framebuffer, matrix stacks,
//! shader binding, and A-buffer into the public API surface.

use log::{debug, warn};

use crate::abuffer::ABuffer;
use crate::arena::ArenaStats;
use crate::error::{RasterError, RasterResult};
use crate::framebuffer::{pack_color, unpack_color_rgb, Framebuffer};
use crate::math::{Mat4, Vec3};
use crate::matrix_stack::{MatrixMode, MatrixStackPair};
use crate::rasterize::{prepare_triangle, scalar, simd};
use crate::shader::{FragmentShaderFn, ProgramBinding, RasterizerMode, VertexShaderFn};

/// A self-contained rendering context, generic over the caller's uniforms
/// type `U`. One context owns one framebuffer, one A-buffer, and one pair
/// of matrix stacks; nothing here is shared across contexts, so distinct
/// contexts on distinct threads never contend with each other.
pub struct Context<U> {
    framebuffer: Framebuffer,
    abuffer: ABuffer,
    matrices: MatrixStackPair,
    program: Option<ProgramBinding<U>>,
    rasterizer_mode: RasterizerMode,
    cull_back_face: bool,
    /// The color passed to the last `clear`, kept separately from the
    /// framebuffer so `resolve` always composites against the background
    /// the frame started from, not against a previous resolve's output.
    background: u32,
}

impl<U> Context<U> {
    /// Allocates a context with a blank (all-zero) framebuffer and identity
    /// matrix stacks. `width` and `height` must both be non-zero.
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }

        let framebuffer = Framebuffer::new(width, height);
        let abuffer = ABuffer::new(framebuffer.pixel_count());

        Ok(Context {
            framebuffer,
            abuffer,
            matrices: MatrixStackPair::new(),
            program: None,
            rasterizer_mode: RasterizerMode::default(),
            cull_back_face: false,
            background: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    /// The resolved framebuffer, as packed little-endian RGBA words.
    pub fn color_buffer(&self) -> &[u32] {
        self.framebuffer.pixels()
    }

    pub fn stats(&self) -> ArenaStats {
        self.abuffer.stats()
    }

    /// Fills the framebuffer with `bg` and resets the A-buffer. There is no
    /// `depth` parameter: the reference API accepts and ignores one, but an
    /// unused parameter is a louder wart in Rust than a silently-ignored one
    /// in C, so it's dropped from the signature entirely.
    pub fn clear(&mut self, bg: u32) {
        self.background = bg;
        self.framebuffer.fill(bg);
        self.abuffer.clear();
    }

    pub fn matrix_mode(&mut self, mode: MatrixMode) {
        self.matrices.set_mode(mode);
    }

    pub fn push_matrix(&mut self) {
        self.matrices.push();
    }

    pub fn pop_matrix(&mut self) {
        self.matrices.pop();
    }

    pub fn load_identity(&mut self) {
        self.matrices.load_identity();
    }

    pub fn load_matrix(&mut self, m: Mat4) {
        self.matrices.load(m);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        let op = Mat4::identity().translate(x, y, z);
        self.matrices.multiply(&op);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        let op = Mat4::identity().scale(x, y, z);
        self.matrices.multiply(&op);
    }

    pub fn rotate(&mut self, angle_deg: f32, x: f32, y: f32, z: f32) {
        let op = Mat4::identity().rotate(angle_deg, x, y, z);
        self.matrices.multiply(&op);
    }

    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        let op = Mat4::identity().look_at(eye, center, up);
        self.matrices.multiply(&op);
    }

    pub fn perspective(&mut self, fov_deg: f32, aspect: f32, near: f32, far: f32) {
        let op = Mat4::identity().perspective(fov_deg, aspect, near, far);
        self.matrices.multiply(&op);
    }

    /// Reads back the current top of the projection stack, independent of
    /// which mode is active.
    pub fn projection_matrix(&self) -> Mat4 {
        *self.matrices.projection()
    }

    /// Reads back the current top of the model-view stack, independent of
    /// which mode is active.
    pub fn modelview_matrix(&self) -> Mat4 {
        *self.matrices.modelview()
    }

    /// Installs the vertex shader, fragment shader, and uniforms value used
    /// by subsequent `draw_triangles` calls.
    pub fn set_program(&mut self, vertex_shader: VertexShaderFn<U>, fragment_shader: FragmentShaderFn<U>, uniforms: U) {
        self.program = Some(ProgramBinding { vertex_shader, fragment_shader, uniforms });
    }

    pub fn set_rasterizer_mode(&mut self, mode: RasterizerMode) {
        self.rasterizer_mode = mode;
    }

    pub fn enable_cull_face(&mut self, enabled: bool) {
        self.cull_back_face = enabled;
    }

    /// Submits `vertices.len() / (3 * stride)` triangles. Each vertex is a
    /// `stride`-byte window into `vertices`, opaque to everything but the
    /// vertex shader. A no-op if no program has been installed.
    pub fn draw_triangles(&mut self, vertices: &[u8], stride: usize) {
        let Some(program) = &self.program else {
            warn!("draw_triangles called with no shader program installed");
            return;
        };

        if stride == 0 {
            warn!("draw_triangles called with zero stride");
            return;
        }

        let triangle_count = vertices.len() / (3 * stride);
        let width = self.framebuffer.width();
        let height = self.framebuffer.height();

        for tri_index in 0..triangle_count {
            let base = tri_index * 3 * stride;

            let mut verts = [Default::default(); 3];
            let mut rejected = false;

            for i in 0..3 {
                let raw = &vertices[base + i * stride..base + (i + 1) * stride];
                let out = (program.vertex_shader)(&program.uniforms, raw);

                if out.position.w <= 1e-3 {
                    rejected = true;
                }

                verts[i] = out;
            }

            if rejected {
                debug!("triangle {} rejected: vertex behind near plane", tri_index);
                continue;
            }

            for v in &mut verts {
                let inv_w = 1.0 / v.position.w;
                v.position.x *= inv_w;
                v.position.y *= inv_w;
                v.position.z *= inv_w;
                v.position.w = inv_w;

                v.position.x = (v.position.x + 1.0) * width as f32 / 2.0;
                v.position.y = (1.0 - v.position.y) * height as f32 / 2.0;
            }

            let Some(prepared) = prepare_triangle(verts, width, height, self.cull_back_face) else {
                continue;
            };

            match self.rasterizer_mode {
                RasterizerMode::Scalar => {
                    scalar::rasterize(&prepared, width, program.fragment_shader, &program.uniforms, &mut self.abuffer)
                }
                RasterizerMode::Simd => {
                    simd::rasterize(&prepared, width, program.fragment_shader, &program.uniforms, &mut self.abuffer)
                }
            }
        }
    }

    /// Walks every pixel's A-buffer list front-to-back, composites against
    /// the background color recorded by the last `clear`, and writes the
    /// resolved color back. Idempotent: calling this twice without an
    /// intervening draw or clear leaves the framebuffer unchanged, since the
    /// background each call composites against is the stored clear color,
    /// never the previous call's own output.
    pub fn resolve(&mut self) {
        let (bg_r, bg_g, bg_b) = unpack_color_rgb(self.background);

        for pixel in 0..self.framebuffer.pixel_count() {
            let Some((acc_color, acc_opacity)) = self.abuffer.accumulate_pixel(pixel) else {
                continue;
            };

            let final_r = acc_color.x + bg_r * (1.0 - acc_opacity.x);
            let final_g = acc_color.y + bg_g * (1.0 - acc_opacity.y);
            let final_b = acc_color.z + bg_b * (1.0 - acc_opacity.z);

            let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
            let packed = pack_color(to_u8(final_r), to_u8(final_g), to_u8(final_b), 255);

            self.framebuffer.set(pixel, packed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::{FragmentOutput, VertexOut};

    struct RgbUniforms {
        color: Vec3,
    }

    fn passthrough_vs(_u: &RgbUniforms, raw: &[u8]) -> VertexOut {
        let f = |i: usize| f32::from_le_bytes(raw[i * 4..i * 4 + 4].try_into().unwrap());
        VertexOut {
            position: crate::math::Vec4::new(f(0), f(1), f(2), f(3)),
            ..Default::default()
        }
    }

    fn solid_fs(u: &RgbUniforms, _v: &VertexOut) -> FragmentOutput {
        FragmentOutput { color: u.color, opacity: Vec3::new(1.0, 1.0, 1.0) }
    }

    fn translucent_green_fs(_u: &RgbUniforms, _v: &VertexOut) -> FragmentOutput {
        let opacity = Vec3::new(0.5, 0.5, 0.5);
        FragmentOutput { color: Vec3::new(0.0, 1.0, 0.0) * 0.5, opacity }
    }

    fn encode_triangle(positions: [(f32, f32, f32, f32); 3]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (x, y, z, w) in positions {
            bytes.extend_from_slice(&x.to_le_bytes());
            bytes.extend_from_slice(&y.to_le_bytes());
            bytes.extend_from_slice(&z.to_le_bytes());
            bytes.extend_from_slice(&w.to_le_bytes());
        }
        bytes
    }

    /// Scenario 1: a single opaque red triangle lands on the center pixel
    /// and leaves the corner untouched.
    #[test]
    fn single_opaque_triangle_covers_center_not_corner() {
        let mut ctx: Context<RgbUniforms> = Context::new(64, 64).unwrap();
        ctx.clear(0x00000000);
        ctx.set_program(passthrough_vs, solid_fs, RgbUniforms { color: Vec3::new(1.0, 0.0, 0.0) });

        let verts = encode_triangle([(-0.5, -0.5, 0.0, 1.0), (0.5, -0.5, 0.0, 1.0), (0.0, 0.5, 0.0, 1.0)]);
        ctx.draw_triangles(&verts, 16);
        ctx.resolve();

        let buf = ctx.color_buffer();
        assert_eq!(buf[32 * 64 + 32], 0xFF0000FF);
        assert_eq!(buf[0], 0x00000000);
    }

    /// Scenario 2: submission order of two opaque, overlapping triangles
    /// does not change which one wins the center pixel (P5).
    #[test]
    fn overlapping_opaque_triangles_are_order_independent() {
        let red_uniforms = RgbUniforms { color: Vec3::new(1.0, 0.0, 0.0) };
        let green_uniforms = RgbUniforms { color: Vec3::new(0.0, 1.0, 0.0) };
        let verts = encode_triangle([(-0.5, -0.5, 0.0, 1.0), (0.5, -0.5, 0.0, 1.0), (0.0, 0.5, 0.0, 1.0)]);

        let mut forward: Context<RgbUniforms> = Context::new(64, 64).unwrap();
        forward.clear(0x00000000);
        forward.set_program(passthrough_vs, solid_fs, red_uniforms);
        forward.draw_triangles(&verts_with_z(&verts, 0.5), 16);
        forward.set_program(passthrough_vs, solid_fs, green_uniforms);
        forward.draw_triangles(&verts_with_z(&verts, 0.2), 16);
        forward.resolve();

        let red_uniforms = RgbUniforms { color: Vec3::new(1.0, 0.0, 0.0) };
        let green_uniforms = RgbUniforms { color: Vec3::new(0.0, 1.0, 0.0) };

        let mut reverse: Context<RgbUniforms> = Context::new(64, 64).unwrap();
        reverse.clear(0x00000000);
        reverse.set_program(passthrough_vs, solid_fs, green_uniforms);
        reverse.draw_triangles(&verts_with_z(&verts, 0.2), 16);
        reverse.set_program(passthrough_vs, solid_fs, red_uniforms);
        reverse.draw_triangles(&verts_with_z(&verts, 0.5), 16);
        reverse.resolve();

        let center = 32 * 64 + 32;
        assert_eq!(forward.color_buffer()[center], 0x00FF00FF);
        assert_eq!(reverse.color_buffer()[center], 0x00FF00FF);
    }

    fn verts_with_z(base: &[u8], z: f32) -> Vec<u8> {
        let mut out = base.to_vec();
        for i in 0..3 {
            let offset = i * 16 + 8;
            out[offset..offset + 4].copy_from_slice(&z.to_le_bytes());
        }
        out
    }

    /// Scenario 5: a vertex at `w <= 1e-3` drops the whole triangle.
    #[test]
    fn near_plane_rejection_drops_triangle() {
        let mut ctx: Context<RgbUniforms> = Context::new(16, 16).unwrap();
        ctx.clear(0x00000000);
        ctx.set_program(passthrough_vs, solid_fs, RgbUniforms { color: Vec3::new(1.0, 0.0, 0.0) });

        let verts = encode_triangle([(-0.5, -0.5, 0.0, 0.0005), (0.5, -0.5, 0.0, 1.0), (0.0, 0.5, 0.0, 1.0)]);
        ctx.draw_triangles(&verts, 16);
        ctx.resolve();

        assert!(ctx.color_buffer().iter().all(|&p| p == 0x00000000));
    }

    /// Resolve is idempotent: calling it twice without a draw/clear between
    /// leaves the framebuffer unchanged (P4).
    #[test]
    fn resolve_is_idempotent() {
        let mut ctx: Context<RgbUniforms> = Context::new(16, 16).unwrap();
        ctx.clear(0x00000000);
        ctx.set_program(passthrough_vs, translucent_green_fs, RgbUniforms { color: Vec3::default() });

        let verts = encode_triangle([(-0.8, -0.8, 0.2, 1.0), (0.8, -0.8, 0.2, 1.0), (0.0, 0.8, 0.2, 1.0)]);
        ctx.draw_triangles(&verts, 16);
        ctx.resolve();
        let first = ctx.color_buffer().to_vec();
        ctx.resolve();
        assert_eq!(ctx.color_buffer(), &first[..]);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let result: RasterResult<Context<()>> = Context::new(0, 10);
        assert!(result.is_err());
    }
}
