//! Error- and variance-based skill scores.

use crate::error::{EvalError, Result};
use crate::utils::stats::{check_pair, mean, sum_sq_dev};

/// Root mean squared error: `sqrt(mean((obs - pred)^2))`.
///
/// # Example
/// ```
/// use hydro_forecast_eval::metrics::rms;
///
/// let err = rms(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).unwrap();
/// assert!((err - 1.0).abs() < 1e-12);
/// ```
pub fn rms(observations: &[f64], predictions: &[f64]) -> Result<f64> {
    check_pair(observations, predictions)?;
    let mse = observations
        .iter()
        .zip(predictions.iter())
        .map(|(o, p)| (o - p).powi(2))
        .sum::<f64>()
        / observations.len() as f64;
    Ok(mse.sqrt())
}

/// Nash-Sutcliffe Efficiency.
///
/// `NSE = 1 - Σ(pred - obs)² / Σ(obs - mean(obs))²`
///
/// A perfect forecast scores 1, predicting the observed mean scores 0 and
/// anything worse than the mean is negative.
///
/// # Errors
/// `DegenerateInput` when the observations are constant, because the
/// variance term in the denominator is zero. NaN observations are not
/// rejected; they make the result NaN.
pub fn nse(observations: &[f64], predictions: &[f64]) -> Result<f64> {
    check_pair(observations, predictions)?;

    let residual: f64 = predictions
        .iter()
        .zip(observations.iter())
        .map(|(p, o)| (p - o).powi(2))
        .sum();
    let variance = sum_sq_dev(observations, mean(observations));

    if variance == 0.0 {
        return Err(EvalError::DegenerateInput(
            "NSE is undefined for constant observations".to_string(),
        ));
    }
    Ok(1.0 - residual / variance)
}
