//! Statistical utility functions.

use crate::error::{EvalError, Result};

/// Lower bound applied to series means before they are used as divisors.
pub const MEAN_FLOOR: f64 = 1e-6;

/// Validate that an observed/predicted pair is non-empty and aligned.
///
/// Every metric calls this before touching the data.
pub fn check_pair(observations: &[f64], predictions: &[f64]) -> Result<()> {
    if observations.is_empty() || predictions.is_empty() {
        return Err(EvalError::EmptyData);
    }
    if observations.len() != predictions.len() {
        return Err(EvalError::ShapeMismatch {
            expected: observations.len(),
            got: predictions.len(),
        });
    }
    Ok(())
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean ignoring NaN entries. NaN when nothing finite-or-infinite remains.
pub fn nanmean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// `max(nanmean(values), 1e-6)`.
///
/// An all-NaN series floors to `MEAN_FLOOR` as well, since `f64::max`
/// ignores a NaN operand.
pub fn floored_mean(values: &[f64]) -> f64 {
    nanmean(values).max(MEAN_FLOOR)
}

/// Population standard deviation (denominator `n`).
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Sum of squared deviations from an arbitrary centre.
pub fn sum_sq_dev(values: &[f64], centre: f64) -> f64 {
    values.iter().map(|x| (x - centre).powi(2)).sum()
}

/// Ascending copy of a slice. NaN sorts to the end.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}
