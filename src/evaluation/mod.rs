//! Evaluation orchestration built on the metric functions.
//!
//! - [`multistep`]: one score per forecast-horizon step
//! - [`peaks`]: isolation of the largest flood events
//! - [`comparison`]: sample-wise win counts between two models
//! - [`folds`]: per-fold records and ranking of trial runs
//!
//! # Example
//!
//! ```
//! use hydro_forecast_eval::core::MultistepArray;
//! use hydro_forecast_eval::evaluation::{compare_models, evaluate_multistep_metric, ObservedTarget};
//! use hydro_forecast_eval::metrics::Metric;
//!
//! let observed = MultistepArray::from_steps(vec![vec![5.0, 5.0], vec![5.0, 6.0]]).unwrap();
//! let lstm = MultistepArray::from_steps(vec![vec![5.0, 5.0], vec![5.0, 6.5]]).unwrap();
//! let arima = MultistepArray::from_steps(vec![vec![4.0, 4.0], vec![5.5, 6.0]]).unwrap();
//!
//! let comparison = compare_models(&lstm, &arima, &observed).unwrap();
//! assert_eq!(comparison.wins(), vec![(2, 0), (1, 1)]);
//!
//! let target = ObservedTarget::PerStep(observed);
//! let rms = evaluate_multistep_metric(&target, &lstm, Metric::Rms).unwrap();
//! assert_eq!(rms.len(), 2);
//! ```

pub mod comparison;
pub mod folds;
pub mod multistep;
pub mod peaks;

pub use comparison::{compare_models, ModelComparison, StepComparison, DEFAULT_HORIZON};
pub use folds::{
    rank_trials, FoldMetrics, FoldRecord, RankingConfig, TrialMetrics, TrialRanking, TrialScore,
};
pub use multistep::{evaluate_multistep, evaluate_multistep_metric, ObservedTarget};
pub use peaks::{
    extract_peaks, InsufficientDataPolicy, PeakConfig, PeakExtraction, PeakRow, PeakWindow,
    PeakWindowShape,
};
