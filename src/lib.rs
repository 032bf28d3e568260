//! # hydro-forecast-eval
//!
//! Forecast-quality metrics for hydrological models.
//!
//! Provides Nash-Sutcliffe and Kling-Gupta efficiencies (with their
//! components), overall and flow-regime percent bias, per-horizon evaluation
//! of multistep forecasts, extraction of peak-flow events, and head-to-head
//! and cross-validation ranking of competing models.

pub mod core;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod utils;

pub use error::{EvalError, Result};

pub mod prelude {
    pub use crate::core::{FlowTable, MultistepArray};
    pub use crate::error::{EvalError, Result};
    pub use crate::evaluation::{
        compare_models, evaluate_multistep, extract_peaks, rank_trials, ObservedTarget,
        PeakConfig,
    };
    pub use crate::metrics::{
        kge, nse, percent_bias, percent_bias_high_flow, percent_bias_low_flow, rms, Metric,
    };
}
