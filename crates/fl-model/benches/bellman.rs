use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use fl_math::quadrature::ShockQuadrature;
use fl_model::{bellman, ModelConfig};

fn bench_bellman(c: &mut Criterion) {
    let config = ModelConfig::default();
    let quadrature = ShockQuadrature::new(config.node_count, config.shock_std_dev).unwrap();

    c.bench_function("bellman_solve_baseline", |b| {
        b.iter(|| bellman::solve(black_box(&config), &quadrature, black_box(0.5)).unwrap())
    });
}

criterion_group!(benches, bench_bellman);
criterion_main!(benches);
