//! Kling-Gupta Efficiency and its components.
//!
//! All variants share the same floored means `m1 = max(nanmean(obs), 1e-6)`
//! and `m2 = max(nanmean(pred), 1e-6)`:
//!
//! - `r = Σ(obs - m1)(pred - m2) / (sqrt(Σ(obs - m1)²) · sqrt(Σ(pred - m2)²))`
//! - `beta = m2 / m1`
//! - `gamma = (std(pred) / m2) / (std(obs) / m1)`
//! - `alpha = std(pred) / std(obs)`
//!
//! Standard deviations are population deviations (denominator `n`).

use crate::error::{EvalError, Result};
use crate::utils::stats::{check_pair, floored_mean, population_std, sum_sq_dev};

/// Every KGE building block computed in one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KgeComponents {
    /// Linear correlation about the floored means.
    pub r: f64,
    /// Bias ratio `m2 / m1`.
    pub beta: f64,
    /// Variability ratio of the coefficients of variation.
    pub gamma: f64,
    /// Ratio of standard deviations.
    pub alpha: f64,
}

impl KgeComponents {
    /// `1 - sqrt((r-1)² + (beta-1)² + (gamma-1)²)`.
    pub fn kge(&self) -> f64 {
        1.0 - ((self.r - 1.0).powi(2) + (self.beta - 1.0).powi(2) + (self.gamma - 1.0).powi(2))
            .sqrt()
    }

    /// `1 - sqrt((r-1)² + (2(alpha-1))² + (beta-1)²)`.
    pub fn kge_5alpha(&self) -> f64 {
        1.0 - ((self.r - 1.0).powi(2)
            + (2.0 * (self.alpha - 1.0)).powi(2)
            + (self.beta - 1.0).powi(2))
        .sqrt()
    }
}

/// Compute `r`, `beta`, `gamma` and `alpha` together.
///
/// # Errors
/// `DegenerateInput` when the correlation denominator is zero or the
/// observations have zero spread.
pub fn kge_components(observations: &[f64], predictions: &[f64]) -> Result<KgeComponents> {
    check_pair(observations, predictions)?;
    let m1 = floored_mean(observations);
    let m2 = floored_mean(predictions);

    let r = correlation(observations, predictions, m1, m2)?;
    let std_obs = observed_spread(observations)?;
    let std_pred = population_std(predictions);

    Ok(KgeComponents {
        r,
        beta: m2 / m1,
        gamma: (std_pred / m2) / (std_obs / m1),
        alpha: std_pred / std_obs,
    })
}

/// Kling-Gupta Efficiency (2012 variant with the variability ratio `gamma`).
///
/// # Example
/// ```
/// use hydro_forecast_eval::metrics::kge;
///
/// let obs = [1.0, 2.0, 3.0, 4.0];
/// assert!((kge(&obs, &obs).unwrap() - 1.0).abs() < 1e-12);
/// ```
pub fn kge(observations: &[f64], predictions: &[f64]) -> Result<f64> {
    kge_components(observations, predictions).map(|c| c.kge())
}

/// KGE variant using `alpha = std(pred) / std(obs)` with the alpha term
/// weighted twice.
pub fn kge_5alpha(observations: &[f64], predictions: &[f64]) -> Result<f64> {
    kge_components(observations, predictions).map(|c| c.kge_5alpha())
}

/// The variability ratio `gamma` alone.
pub fn kge_variability(observations: &[f64], predictions: &[f64]) -> Result<f64> {
    check_pair(observations, predictions)?;
    let m1 = floored_mean(observations);
    let m2 = floored_mean(predictions);
    let std_obs = observed_spread(observations)?;
    Ok((population_std(predictions) / m2) / (std_obs / m1))
}

/// The bias ratio `beta` alone. Defined for every non-empty aligned pair.
pub fn kge_bias(observations: &[f64], predictions: &[f64]) -> Result<f64> {
    check_pair(observations, predictions)?;
    Ok(floored_mean(predictions) / floored_mean(observations))
}

/// The linear correlation `r` alone.
pub fn kge_linear_correlation(observations: &[f64], predictions: &[f64]) -> Result<f64> {
    check_pair(observations, predictions)?;
    correlation(
        observations,
        predictions,
        floored_mean(observations),
        floored_mean(predictions),
    )
}

fn correlation(observations: &[f64], predictions: &[f64], m1: f64, m2: f64) -> Result<f64> {
    let covariance: f64 = observations
        .iter()
        .zip(predictions.iter())
        .map(|(o, p)| (o - m1) * (p - m2))
        .sum();
    let denom = sum_sq_dev(observations, m1).sqrt() * sum_sq_dev(predictions, m2).sqrt();
    if denom == 0.0 {
        return Err(EvalError::DegenerateInput(
            "correlation is undefined: a series has no spread about its mean".to_string(),
        ));
    }
    Ok(covariance / denom)
}

fn observed_spread(observations: &[f64]) -> Result<f64> {
    let std_obs = population_std(observations);
    if std_obs == 0.0 {
        return Err(EvalError::DegenerateInput(
            "variability ratio is undefined for constant observations".to_string(),
        ));
    }
    Ok(std_obs)
}
