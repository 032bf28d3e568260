//! Benchmarks for the metric functions and the evaluation routines.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hydro_forecast_eval::core::{FlowTable, MultistepArray};
use hydro_forecast_eval::evaluation::{
    compare_models, evaluate_multistep_metric, extract_peaks, InsufficientDataPolicy,
    ObservedTarget, PeakConfig, DEFAULT_HORIZON,
};
use hydro_forecast_eval::metrics::{self, Metric};

fn flow(n: usize, phase: f64) -> Vec<f64> {
    (0..n)
        .map(|i| 20.0 + 15.0 * ((i as f64 * 0.05) + phase).sin().max(0.0) + 0.01 * i as f64)
        .collect()
}

fn bench_scalar_metrics(c: &mut Criterion) {
    let sizes = [100, 1000, 10000, 100000];
    let mut group = c.benchmark_group("scalar_metrics");

    for size in sizes {
        let obs = flow(size, 0.0);
        let pred = flow(size, 0.1);

        group.bench_with_input(BenchmarkId::new("nse", size), &(&obs, &pred), |b, (o, p)| {
            b.iter(|| black_box(metrics::nse(o, p)))
        });

        group.bench_with_input(BenchmarkId::new("kge", size), &(&obs, &pred), |b, (o, p)| {
            b.iter(|| black_box(metrics::kge(o, p)))
        });

        group.bench_with_input(
            BenchmarkId::new("bias_fhv", size),
            &(&obs, &pred),
            |b, (o, p)| b.iter(|| black_box(metrics::percent_bias_high_flow(o, p, 0.02))),
        );

        group.bench_with_input(
            BenchmarkId::new("bias_flv", size),
            &(&obs, &pred),
            |b, (o, p)| b.iter(|| black_box(metrics::percent_bias_low_flow(o, p, 0.7))),
        );
    }
    group.finish();
}

fn bench_multistep(c: &mut Criterion) {
    let samples = [100, 1000, 5000];
    let mut group = c.benchmark_group("multistep");

    for n in samples {
        let obs = flow(n, 0.0);
        let steps: Vec<Vec<f64>> = (0..DEFAULT_HORIZON)
            .map(|x| flow(n, 0.01 * x as f64))
            .collect();
        let predicted = MultistepArray::from_steps(steps.clone()).unwrap();
        let observed = MultistepArray::from_steps(vec![obs.clone(); DEFAULT_HORIZON]).unwrap();
        let target = ObservedTarget::Single(obs);

        group.bench_with_input(BenchmarkId::new("evaluate_kge", n), &n, |b, _| {
            b.iter(|| black_box(evaluate_multistep_metric(&target, &predicted, Metric::Kge)))
        });

        group.bench_with_input(BenchmarkId::new("compare_models", n), &n, |b, _| {
            b.iter(|| black_box(compare_models(&predicted, &observed, &observed)))
        });
    }
    group.finish();
}

fn bench_peaks(c: &mut Criterion) {
    let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let n = 35_040; // one year at 15-minute resolution
    let table = FlowTable::builder()
        .timestamps((0..n).map(|i| base + Duration::minutes(15 * i as i64)).collect())
        .column("q", flow(n, 0.0))
        .build()
        .unwrap();

    c.bench_function("extract_peaks_10x96", |b| {
        let config = PeakConfig::new("q", 10, 96).with_policy(InsufficientDataPolicy::Truncate);
        b.iter(|| black_box(extract_peaks(table.clone(), &config)))
    });
}

criterion_group!(benches, bench_scalar_metrics, bench_multistep, bench_peaks);
criterion_main!(benches);
