//! Draws a single opaque triangle and prints the resolved center pixel.
//!
//! Run with `RUST_LOG=debug cargo run --example basic` to see allocator and
//! near-plane-rejection logging.

use oit_rasterizer::{Context, FragmentOutput, Vec3, Vec4, VertexOut};

struct Uniforms {
    color: Vec3,
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
        color: uniforms.color,
        opacity: Vec3::new(1.0, 1.0, 1.0),
    }
}

fn main() {
    env_logger::init();

    let width = 64;
    let height = 64;
    let mut ctx: Context<Uniforms> = Context::new(width, height).expect("non-zero framebuffer dimensions");

    ctx.clear(0x00000000);
    ctx.set_program(vertex_shader, fragment_shader, Uniforms { color: Vec3::new(1.0, 0.0, 0.0) });

    #[rustfmt::skip]
    let vertices: [f32; 12] = [
        -0.5, -0.5, 0.0, 1.0,
         0.5, -0.5, 0.0, 1.0,
         0.0,  0.5, 0.0, 1.0,
    ];
    let bytes: Vec<u8> = vertices.iter().flat_map(|f| f.to_le_bytes()).collect();

    ctx.draw_triangles(&bytes, 16);
    ctx.resolve();

    let center = ctx.color_buffer()[(height / 2 * width + width / 2) as usize];
    println!("center pixel: {:#010x}", center);
    println!("arena stats: {:?}", ctx.stats());
}
