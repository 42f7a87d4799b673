//! Draws an opaque triangle behind a translucent one at the same pixels
//! and prints the composited center color, demonstrating the A-buffer's
//! order-independent-transparency compositing.

use oit_rasterizer::{Context, FragmentOutput, RasterizerMode, Vec3, Vec4, VertexOut};

struct Uniforms {
    color: Vec3,
    opacity: Vec3,
}

fn vertex_shader(_uniforms: &Uniforms, raw: &[u8]) -> VertexOut {
    let read_f32 = |offset: usize| f32::from_le_bytes(raw[offset..offset + 4].try_into().unwrap());

    VertexOut {
        position: Vec4::new(read_f32(0), read_f32(4), read_f32(8), read_f32(12)),
        ..Default::default()
    }
}

fn fragment_shader(uniforms: &Uniforms, _interpolated: &VertexOut) -> FragmentOutput {
    FragmentOutput {
        color: uniforms.color * uniforms.opacity.x,
        opacity: uniforms.opacity,
    }
}

fn triangle_bytes(z: f32) -> Vec<u8> {
    let vertices: [f32; 12] = [-0.8, -0.8, z, 1.0, 0.8, -0.8, z, 1.0, 0.0, 0.8, z, 1.0];
    vertices.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn main() {
    env_logger::init();

    let width = 64;
    let height = 64;
    let mut ctx: Context<Uniforms> = Context::new(width, height).expect("non-zero framebuffer dimensions");
    ctx.set_rasterizer_mode(RasterizerMode::Scalar);
    ctx.clear(0x00000000);

    ctx.set_program(
        vertex_shader,
        fragment_shader,
        Uniforms { color: Vec3::new(1.0, 0.0, 0.0), opacity: Vec3::new(1.0, 1.0, 1.0) },
    );
    ctx.draw_triangles(&triangle_bytes(0.5), 16);

    ctx.set_program(
        vertex_shader,
        fragment_shader,
        Uniforms { color: Vec3::new(0.0, 1.0, 0.0), opacity: Vec3::new(0.5, 0.5, 0.5) },
    );
    ctx.draw_triangles(&triangle_bytes(0.2), 16);

    ctx.resolve();

    let center = ctx.color_buffer()[(height / 2 * width + width / 2) as usize];
    println!("center pixel (red occluded 50% behind translucent green): {:#010x}", center);
}
