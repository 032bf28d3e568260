//! Quickstart example demonstrating basic usage of hydro-forecast-eval.
//!
//! Run with: cargo run --example quickstart

use chrono::{Duration, TimeZone, Utc};
use hydro_forecast_eval::core::{FlowTable, MultistepArray};
use hydro_forecast_eval::evaluation::{
    compare_models, evaluate_multistep_metric, extract_peaks, rank_trials, FoldMetrics,
    FoldRecord, ObservedTarget, PeakConfig, RankingConfig, TrialMetrics,
};
use hydro_forecast_eval::metrics::{self, Metric};

fn main() {
    println!("=== hydro-forecast-eval Quickstart ===\n");

    // 1. Synthetic discharge with two flood events
    let n = 400;
    let observed: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            5.0 + 40.0 * (-((t - 120.0) / 12.0).powi(2)).exp()
                + 25.0 * (-((t - 300.0) / 20.0).powi(2)).exp()
        })
        .collect();
    let lstm: Vec<f64> = observed.iter().map(|q| q * 0.95 + 0.4).collect();
    let arima: Vec<f64> = observed
        .iter()
        .enumerate()
        .map(|(i, q)| if i > 0 { observed[i - 1] } else { *q })
        .collect();

    // 2. Scalar metrics
    println!("--- Scalar metrics (LSTM) ---");
    for metric in Metric::ALL {
        match metric.compute(&observed, &lstm) {
            Ok(v) => println!("  {:<10} {:>10.4}", metric.name(), v),
            Err(e) => println!("  {:<10} {}", metric.name(), e),
        }
    }

    // 3. Horizon-wise evaluation: each step shifts the forecast by one more sample
    println!("\n--- NSE per horizon step (persistence forecast) ---");
    let horizon = 4;
    let samples = n - horizon;
    let steps: Vec<Vec<f64>> = (1..=horizon)
        .map(|lead| (0..samples).map(|i| observed[i + horizon - lead]).collect())
        .collect();
    let per_step_obs: Vec<Vec<f64>> = (0..horizon)
        .map(|_| observed[horizon..].to_vec())
        .collect();
    let predicted = MultistepArray::from_steps(steps).unwrap();
    let target = ObservedTarget::PerStep(MultistepArray::from_steps(per_step_obs).unwrap());
    let nse_steps = evaluate_multistep_metric(&target, &predicted, Metric::Nse).unwrap();
    for (x, v) in nse_steps.iter().enumerate() {
        println!("  step {}: {:.4}", x + 1, v);
    }

    // 4. Peak events
    println!("\n--- Peak events ---");
    let base = Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap();
    let table = FlowTable::builder()
        .timestamps((0..n).map(|i| base + Duration::hours(i as i64)).collect())
        .column("qmeasval", observed.clone())
        .column("lstm", lstm.clone())
        .build()
        .unwrap();
    let peaks = extract_peaks(table, &PeakConfig::new("qmeasval", 2, 48)).unwrap();
    for w in &peaks.windows {
        let obs = w.rows.column("qmeasval").unwrap();
        let pred = w.rows.column("lstm").unwrap();
        println!(
            "  peak {} at {}: {:.2} m3/s, {} rows, NSE {:.4}",
            w.peak_index,
            w.peak_timestamp().unwrap(),
            w.peak_value("qmeasval").unwrap(),
            w.len(),
            metrics::nse(obs, pred).unwrap()
        );
    }

    // 5. LSTM vs ARIMA
    println!("\n--- LSTM vs ARIMA ---");
    let comparison = compare_models(
        &MultistepArray::single_step(lstm.clone()).unwrap(),
        &MultistepArray::single_step(arima.clone()).unwrap(),
        &MultistepArray::single_step(observed.clone()).unwrap(),
    )
    .unwrap();
    println!("  {}", comparison);

    // 6. Trial ranking over five folds
    println!("\n--- Trial ranking ---");
    let fold_len = n / 5;
    let folds_for = |pred: &[f64]| {
        let mut folds = FoldMetrics::new();
        for k in 0..5 {
            let range = k * fold_len..(k + 1) * fold_len;
            let record = FoldRecord::evaluate(&observed[range.clone()], &pred[range]).unwrap();
            folds.insert(k as u32 + 1, record).unwrap();
        }
        folds
    };
    let trials = vec![
        TrialMetrics::new(0, folds_for(&arima)).with_valid(folds_for(&arima)),
        TrialMetrics::new(1, folds_for(&lstm)).with_valid(folds_for(&lstm)),
    ];
    let ranking = rank_trials(&trials, &RankingConfig::default()).unwrap();
    print!("{}", ranking);
    if let Some(best) = ranking.best_by_validation() {
        println!("  best trial by validation: {}", best.trial);
    }
}
