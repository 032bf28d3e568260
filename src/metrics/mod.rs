//! Hydrological goodness-of-fit metrics.
//!
//! Every function takes an `(observations, predictions)` pair of equal
//! length and returns a scalar. Misaligned input is rejected with
//! `ShapeMismatch` before any arithmetic; zero denominators are reported
//! as `DegenerateInput`.

pub mod bias;
pub mod efficiency;
pub mod kge;
pub mod metric;

pub use bias::{
    high_flow_range, low_flow_range, percent_bias, percent_bias_high_flow,
    percent_bias_low_flow, ExceedanceConfig, DEFAULT_HIGH_FLOW_EXCEEDANCE,
    DEFAULT_LOW_FLOW_EXCEEDANCE,
};
pub use efficiency::{nse, rms};
pub use kge::{
    kge, kge_5alpha, kge_bias, kge_components, kge_linear_correlation, kge_variability,
    KgeComponents,
};
pub use metric::{Metric, Orientation};
