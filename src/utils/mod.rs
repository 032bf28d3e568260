//! Numeric helpers shared by the metrics and evaluation modules.

pub mod stats;

pub use stats::{check_pair, floored_mean, nanmean, population_std, MEAN_FLOOR};
