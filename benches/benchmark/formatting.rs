use crate::common::{configure_criterion, deep_chain, realistic_chain};
use criterion::{criterion_group, BenchmarkId, Criterion};
use errx::Verbosity;
use std::hint::black_box;

pub fn bench_render(c: &mut Criterion) {
    let err = realistic_chain();
    let mut group = c.benchmark_group("formatting/render");
    for verbosity in [Verbosity::Plain, Verbosity::Verbose, Verbosity::Extended] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{verbosity:?}")), &verbosity, |b, v| {
            b.iter(|| black_box(err.render(*v).to_string()))
        });
    }
    group.finish();
}

pub fn bench_render_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting/render_depth");
    for depth in [1, 5, 10, 20] {
        let err = deep_chain(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &err, |b, err| {
            b.iter(|| black_box(err.render(Verbosity::Verbose).to_string()))
        });
    }
    group.finish();
}

criterion_group! {
    name = formatting_benches;
    config = configure_criterion();
    targets = bench_render, bench_render_depth,
}
