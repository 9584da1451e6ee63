use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use optionix::core::PricingEngine;
use optionix::engines::analytic::BlackScholesEngine;
use optionix::engines::monte_carlo::MonteCarloEngine;
use optionix::instruments::EuropeanOption;
use optionix::vol::implied::{DEFAULT_MAX_ITER, DEFAULT_TOL, implied_vol};
use std::hint::black_box;

fn atm_call() -> EuropeanOption {
    EuropeanOption::call(100.0, 100.0, 1.0, 0.05, 0.2).expect("benchmark contract should be valid")
}

fn bench_analytic_price(c: &mut Criterion) {
    let option = atm_call();

    c.bench_function("black_scholes_price", |b| {
        b.iter(|| {
            let mut engine = BlackScholesEngine::new(black_box(option));
            black_box(engine.price())
        })
    });
}

fn bench_analytic_greeks(c: &mut Criterion) {
    let option = atm_call();

    c.bench_function("black_scholes_greeks", |b| {
        b.iter(|| {
            let mut engine = BlackScholesEngine::new(black_box(option));
            black_box(engine.greeks())
        })
    });
}

fn bench_monte_carlo_price(c: &mut Criterion) {
    let option = atm_call();
    let mut group = c.benchmark_group("monte_carlo_price");

    for paths in [1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(paths), &paths, |b, &paths| {
            b.iter(|| {
                let mut engine = MonteCarloEngine::with_seed(black_box(option), paths, 42)
                    .expect("benchmark engine should build");
                black_box(engine.price())
            })
        });
    }
    group.finish();
}

fn bench_monte_carlo_greeks(c: &mut Criterion) {
    let option = atm_call();

    c.bench_function("monte_carlo_greeks_10k", |b| {
        b.iter(|| {
            let mut engine = MonteCarloEngine::with_seed(black_box(option), 10_000, 42)
                .expect("benchmark engine should build");
            black_box(engine.greeks())
        })
    });
}

fn bench_implied_vol(c: &mut Criterion) {
    let option = atm_call();
    let market = BlackScholesEngine::new(option).price();

    c.bench_function("implied_vol", |b| {
        b.iter(|| {
            implied_vol(
                black_box(&option),
                black_box(market),
                DEFAULT_TOL,
                DEFAULT_MAX_ITER,
            )
            .expect("benchmark inversion should succeed")
        })
    });
}

criterion_group!(
    benches,
    bench_analytic_price,
    bench_analytic_greeks,
    bench_monte_carlo_price,
    bench_monte_carlo_greeks,
    bench_implied_vol
);
criterion_main!(benches);
