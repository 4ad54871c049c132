//! Headless batching demo.
//!
//! Renders a full-screen color-gradient grid plus an alternating-texture
//! checker grid into an offscreen target, then logs the frame's quad and
//! draw-call counts. The gradient alone is ~20k quads, so the 1000-quad
//! buffer flushes twenty-odd times within one logical batch.

use std::sync::Arc;

use glint_core::logging;
use glint_core::math::fast::{Mat4, Vec2};
use glint_render::{
    Color, GraphicsContext, QuadBatcher, QuadBatcherDescriptor, WgpuBackend,
    WgpuBackendDescriptor, wgpu,
};

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;

fn checker_pixels(size: u32, even: [u8; 4], odd: [u8; 4]) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let cell = if (x / 8 + y / 8) % 2 == 0 { even } else { odd };
            pixels.extend_from_slice(&cell);
        }
    }
    pixels
}

fn main() {
    logging::init();

    let context = GraphicsContext::new_sync();

    let target = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("stress_target"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let target_view = Arc::new(target.create_view(&wgpu::TextureViewDescriptor::default()));

    let mut backend = WgpuBackend::new(
        context.clone(),
        WgpuBackendDescriptor {
            target_format: wgpu::TextureFormat::Rgba8UnormSrgb,
            max_quads: 1000,
        },
    );
    let checker_a = backend.create_texture_rgba8(
        64,
        64,
        &checker_pixels(64, [230, 120, 30, 255], [40, 40, 40, 255]),
    );
    let checker_b = backend.create_texture_rgba8(
        64,
        64,
        &checker_pixels(64, [60, 160, 230, 255], [250, 250, 250, 255]),
    );

    let mut batcher = QuadBatcher::new(backend, QuadBatcherDescriptor::default())
        .expect("failed to allocate the geometry buffer");
    batcher.set_view_projection(Mat4::orthographic_rh(
        0.0,
        WIDTH as f32,
        0.0,
        HEIGHT as f32,
        -1.0,
        1.0,
    ));

    batcher
        .backend_mut()
        .begin_frame(target_view, Some(Color::BLACK));

    batcher.reset_stats();
    batcher.begin_batch();

    // gradient background
    for y in (0..HEIGHT).step_by(10) {
        for x in (0..WIDTH).step_by(10) {
            let color = Color::rgba(
                x as f32 / WIDTH as f32,
                0.2,
                y as f32 / HEIGHT as f32,
                1.0,
            );
            batcher.submit_quad(Vec2::new(x as f32, y as f32), Vec2::new(9.0, 9.0), color);
        }
    }

    // checker grid with alternating textures
    for y in (0..500).step_by(101) {
        for x in (0..500).step_by(101) {
            let texture = if (x + y) % 2 == 0 { checker_a } else { checker_b };
            batcher.submit_textured(
                Vec2::new(x as f32, y as f32),
                Vec2::new(100.0, 100.0),
                texture,
            );
        }
    }

    batcher.submit_textured(Vec2::new(100.0, 100.0), Vec2::new(200.0, 200.0), checker_a);
    batcher.end_batch();

    let stats = batcher.stats();
    tracing::info!(
        "Frame complete: {} quads in {} draw calls",
        stats.quad_count,
        stats.draw_calls
    );

    let _ = context.device.poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: None,
    });
}
