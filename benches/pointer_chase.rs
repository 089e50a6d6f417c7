//! Benchmarks for permutation generation and chain analysis
//!
//! Run with: cargo bench --bench pointer_chase

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use permchase::{analyze, ChainGenerator, ScatterGenerator, ShuffleGenerator};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for &len in &[1024usize, 64 << 10, 1 << 20] {
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("shuffle", len), &len, |b, &len| {
            let mut generator = ShuffleGenerator::seeded(42);
            b.iter(|| generator.generate(black_box(len)));
        });

        group.bench_with_input(BenchmarkId::new("scatter", len), &len, |b, &len| {
            let mut generator = ScatterGenerator::seeded(42);
            b.iter(|| generator.generate(black_box(len)));
        });
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for &len in &[1024usize, 64 << 10, 1 << 20] {
        group.throughput(Throughput::Elements(len as u64));

        let mut generator = ShuffleGenerator::seeded(42);
        let chain = generator
            .generate(len)
            .expect("benchmark chain generation failed");

        group.bench_with_input(BenchmarkId::new("shuffle_chain", len), &chain, |b, chain| {
            b.iter(|| analyze(black_box(chain)));
        });
    }

    group.finish();
}

fn bench_render_histogram(c: &mut Criterion) {
    let mut generator = ShuffleGenerator::seeded(42);
    let chain = generator
        .generate(1 << 20)
        .expect("benchmark chain generation failed");
    let report = analyze(&chain).expect("benchmark analysis failed");

    c.bench_function("render_histogram_1Mi", |b| {
        b.iter(|| black_box(&report).render_histogram());
    });
}

criterion_group!(
    benches,
    bench_generate,
    bench_analyze,
    bench_render_histogram
);
criterion_main!(benches);
