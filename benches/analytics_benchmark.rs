//! Benchmarks for the stockseer analytics pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stockseer::core::{Bar, RiskConfig, SimulationLimits, NANOS_PER_DAY};
use stockseer::indicators::{compute_indicators, latest_pair};
use stockseer::metrics::risk_metrics;
use stockseer::portfolio::{simulate, SimulationParams};
use stockseer::signals::SignalScorer;

/// Generate daily bars with a trending, oscillating close.
fn generate_sample_bars(n: usize) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(n);
    let mut close = 100.0;

    for i in 0..n {
        let open = close;
        close = (close + (i as f64 * 0.1).sin() * 2.0).max(1.0);
        let high = close.max(open) + 1.0;
        let low = (close.min(open) - 1.0).max(0.5);
        let volume = 1000.0 + (i % 11) as f64 * 50.0;
        bars.push(Bar::new(i as i64 * NANOS_PER_DAY, open, high, low, close, volume));
    }

    bars
}

fn bench_compute_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_indicators");

    for size in [250, 1000, 5000].iter() {
        group.bench_with_input(BenchmarkId::new("bars", size), size, |b, &size| {
            let bars = generate_sample_bars(size);

            b.iter(|| {
                let snapshots = compute_indicators(black_box(&bars));
                black_box(snapshots)
            });
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let bars = generate_sample_bars(500);
    let snapshots = compute_indicators(&bars);
    let scorer = SignalScorer::new();

    c.bench_function("classify_enhanced", |b| {
        b.iter(|| {
            let signal = latest_pair(&snapshots)
                .map(|(latest, previous)| scorer.classify_enhanced(latest, previous, black_box(0.25)));
            black_box(signal)
        });
    });
}

fn bench_risk_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("risk_metrics");
    let config = RiskConfig::default();

    for size in [250, 1000, 5000].iter() {
        group.bench_with_input(BenchmarkId::new("bars", size), size, |b, &size| {
            let bars = generate_sample_bars(size);
            let benchmark = generate_sample_bars(size);

            b.iter(|| {
                let metrics = risk_metrics(black_box(&bars), Some(&benchmark), &config);
                black_box(metrics)
            });
        });
    }

    group.finish();
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(20);
    let limits = SimulationLimits::default();

    for paths in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("paths", paths), paths, |b, &paths| {
            let params = SimulationParams { path_count: paths, ..SimulationParams::default() }.with_seed(7);

            b.iter(|| {
                let output = simulate(black_box(&params), &limits);
                black_box(output)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_indicators,
    bench_classify,
    bench_risk_metrics,
    bench_simulate
);
criterion_main!(benches);
