//! Benchmarks for the quad submission path.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glint_core::math::fast::Vec2;
use glint_render::mock::RecordingBackend;
use glint_render::{Color, QuadBatcher, QuadBatcherDescriptor};

fn bench_submit_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_color");

    for count in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut batcher =
                QuadBatcher::new(RecordingBackend::new(), QuadBatcherDescriptor::default())
                    .unwrap();

            b.iter(|| {
                batcher.begin_batch();
                for i in 0..count {
                    let x = (i % 100) as f32 * 10.0;
                    let y = (i / 100) as f32 * 10.0;
                    batcher.submit_quad(
                        Vec2::new(x, y),
                        Vec2::new(9.0, 9.0),
                        black_box(Color::RED),
                    );
                }
                batcher.end_batch();
                batcher.backend_mut().clear();
            });
        });
    }

    group.finish();
}

fn bench_submit_textured_dedup(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_textured_dedup");

    for distinct in [1usize, 8, 31] {
        group.throughput(Throughput::Elements(1_000));

        group.bench_with_input(
            BenchmarkId::from_parameter(distinct),
            &distinct,
            |b, &distinct| {
                let mut batcher =
                    QuadBatcher::new(RecordingBackend::new(), QuadBatcherDescriptor::default())
                        .unwrap();
                let textures: Vec<_> = (0..distinct)
                    .map(|_| batcher.backend_mut().register_texture())
                    .collect();

                b.iter(|| {
                    batcher.begin_batch();
                    for i in 0..1_000usize {
                        let texture = textures[i % distinct];
                        batcher.submit_textured(
                            Vec2::new((i % 100) as f32, (i / 100) as f32),
                            Vec2::ONE,
                            black_box(texture),
                        );
                    }
                    batcher.end_batch();
                    batcher.backend_mut().clear();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_submit_color, bench_submit_textured_dedup);
criterion_main!(benches);
