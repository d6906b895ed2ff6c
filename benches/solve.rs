use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use hand_exchange::{core::engine::ExchangeEngine, resource::ResourceAlloc};

fn bench_cold_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold_solve");
    for n in [2u8, 4, 6] {
        let hand = ResourceAlloc::new(n, n, n, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &hand, |b, &hand| {
            b.iter(|| {
                let mut engine = ExchangeEngine::default();
                let _ = engine.solve(hand);
            });
        });
    }
    group.finish();
}

fn bench_warm_solve(c: &mut Criterion) {
    let mut engine = ExchangeEngine::default();
    let hand = ResourceAlloc::new(6, 6, 6, 6);
    let _ = engine.solve(hand);

    c.bench_function("warm_solve_6666", |b| {
        b.iter(|| {
            let _ = engine.solve(hand);
        });
    });
}

fn bench_modifier_churn(c: &mut Criterion) {
    c.bench_function("modifier_toggle_resolve", |b| {
        let mut engine = ExchangeEngine::default();
        let mut enable = true;
        b.iter(|| {
            engine.set_tool_modifier(enable);
            enable = !enable;
            let _ = engine.solve(ResourceAlloc::new(4, 4, 0, 0));
        });
    });
}

criterion_group!(benches, bench_cold_solve, bench_warm_solve, bench_modifier_churn);
criterion_main!(benches);
