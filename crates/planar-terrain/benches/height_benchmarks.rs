use criterion::{Criterion, black_box, criterion_group, criterion_main};
use planar_terrain::*;

fn bench_noise2d(c: &mut Criterion) {
    c.bench_function("noise2d", |bencher| {
        bencher.iter(|| black_box(noise2d(black_box(123.45), black_box(-678.9))))
    });
}

fn bench_fbm_6_octaves(c: &mut Criterion) {
    c.bench_function("fbm_6_octaves", |bencher| {
        bencher.iter(|| black_box(fbm(black_box(0.37), black_box(1.91), 6)))
    });
}

fn bench_composer_height(c: &mut Criterion) {
    let composer = HeightFieldComposer::new(TerrainParameters::with_seed(42));
    c.bench_function("composer_height", |bencher| {
        bencher.iter(|| black_box(composer.height(black_box(1_024.0), black_box(-5_000.0))))
    });
}

fn bench_window_128(c: &mut Criterion) {
    let composer = HeightFieldComposer::new(TerrainParameters::default());
    let spacing = 300.0 / 127.0;
    c.bench_function("cpu_window_128x128", |bencher| {
        bencher.iter(|| {
            let mut sum = 0.0f32;
            for j in 0..128 {
                for i in 0..128 {
                    sum += composer.height(i as f32 * spacing, j as f32 * spacing);
                }
            }
            black_box(sum)
        })
    });
}

fn bench_shader_mirror_height(c: &mut Criterion) {
    let uniform = TerrainUniform::from_params(&TerrainParameters::default());
    c.bench_function("shader_mirror_height", |bencher| {
        bencher.iter(|| {
            black_box(shader_mirror::terrain_height(
                &uniform,
                black_box(1_024.0),
                black_box(-5_000.0),
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_noise2d,
    bench_fbm_6_octaves,
    bench_composer_height,
    bench_window_128,
    bench_shader_mirror_height
);
criterion_main!(benches);
