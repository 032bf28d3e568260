//! Volume bias metrics, overall and per flow regime.
//!
//! The flow-regime variants rank each series on its own: the high-flow
//! subset of the observations and the high-flow subset of the predictions
//! are generally taken at different time steps.

use std::ops::Range;

use crate::error::{EvalError, Result};
use crate::utils::stats::{check_pair, sorted};

/// Default exceedance probability for the high-flow segment (top 2 %).
pub const DEFAULT_HIGH_FLOW_EXCEEDANCE: f64 = 0.02;
/// Default exceedance probability for the low-flow segment (bottom 30 %).
pub const DEFAULT_LOW_FLOW_EXCEEDANCE: f64 = 0.7;

/// Floor applied to low-flow values before baseline removal.
const LOW_FLOW_FLOOR: f64 = 1e-6;

/// Exceedance probabilities for the flow-regime bias metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExceedanceConfig {
    /// Fraction of the distribution treated as high flow.
    pub high_flow: f64,
    /// Exceedance probability above which flows count as low flow.
    pub low_flow: f64,
}

impl Default for ExceedanceConfig {
    fn default() -> Self {
        Self {
            high_flow: DEFAULT_HIGH_FLOW_EXCEEDANCE,
            low_flow: DEFAULT_LOW_FLOW_EXCEEDANCE,
        }
    }
}

impl ExceedanceConfig {
    pub fn with_high_flow(mut self, exceedance_prob: f64) -> Self {
        self.high_flow = exceedance_prob;
        self
    }

    pub fn with_low_flow(mut self, exceedance_prob: f64) -> Self {
        self.low_flow = exceedance_prob;
        self
    }

    /// Positions in an ascending sort of `n` values that form the low-flow
    /// and high-flow segments, as `(low, high)`.
    ///
    /// The ranges do not overlap whenever `high_flow + (1 - low_flow) < 1`.
    pub fn regime_ranges(&self, n: usize) -> Result<(Range<usize>, Range<usize>)> {
        Ok((
            low_flow_range(n, self.low_flow)?,
            high_flow_range(n, self.high_flow)?,
        ))
    }
}

/// Ascending-sort positions of the top `floor(n · exceedance_prob)` values.
///
/// # Errors
/// `InvalidParameter` unless `0 < exceedance_prob < 1`.
pub fn high_flow_range(n: usize, exceedance_prob: f64) -> Result<Range<usize>> {
    let count = segment_len(n, checked_prob(exceedance_prob)?);
    Ok(n - count..n)
}

/// Ascending-sort positions of the bottom `floor(n · (1 - exceedance_prob))` values.
///
/// # Errors
/// `InvalidParameter` unless `0 < exceedance_prob < 1`.
pub fn low_flow_range(n: usize, exceedance_prob: f64) -> Result<Range<usize>> {
    Ok(0..segment_len(n, 1.0 - checked_prob(exceedance_prob)?))
}

/// Percent bias: `100 · Σ(pred - obs) / Σ(obs)`.
///
/// Positive values mean the forecast overestimates total volume.
///
/// # Errors
/// `DegenerateInput` when the observations sum to zero.
///
/// # Example
/// ```
/// use hydro_forecast_eval::metrics::percent_bias;
///
/// let pbias = percent_bias(&[2.0, 2.0, 2.0, 2.0], &[1.0, 1.0, 1.0, 1.0]).unwrap();
/// assert!((pbias + 50.0).abs() < 1e-12);
/// ```
pub fn percent_bias(observations: &[f64], predictions: &[f64]) -> Result<f64> {
    check_pair(observations, predictions)?;
    volume_bias(observations, predictions)
}

/// Percent bias of the high-flow segment (FHV).
///
/// The top `floor(n · exceedance_prob)` values of each series are selected
/// independently and passed to [`percent_bias`].
///
/// # Errors
/// `InvalidParameter` unless `0 < exceedance_prob < 1`,
/// `InsufficientData` when the segment would be empty,
/// `DegenerateInput` when the observed segment sums to zero.
pub fn percent_bias_high_flow(
    observations: &[f64],
    predictions: &[f64],
    exceedance_prob: f64,
) -> Result<f64> {
    check_pair(observations, predictions)?;
    let n = observations.len();
    let range = high_flow_range(n, exceedance_prob)?;
    if range.is_empty() {
        return Err(EvalError::InsufficientData {
            needed: min_len_for(exceedance_prob),
            got: n,
        });
    }

    let obs_hv = &sorted(observations)[range.clone()];
    let pred_hv = &sorted(predictions)[range];
    volume_bias(obs_hv, pred_hv)
}

/// Percent bias of the low-flow segment (FLV).
///
/// The bottom `floor(n · (1 - exceedance_prob))` values of each series are
/// selected independently, floored at `1e-6`, and reduced by their own
/// minimum before summing:
///
/// `FLV = -100 · (Σ(pred_lv - min pred_lv) - Σ(obs_lv - min obs_lv)) / (Σ(obs_lv - min obs_lv) + 1e-6)`
///
/// # Errors
/// `InvalidParameter` unless `0 < exceedance_prob < 1`,
/// `InsufficientData` when the segment would be empty.
pub fn percent_bias_low_flow(
    observations: &[f64],
    predictions: &[f64],
    exceedance_prob: f64,
) -> Result<f64> {
    check_pair(observations, predictions)?;
    let n = observations.len();
    let range = low_flow_range(n, exceedance_prob)?;
    if range.is_empty() {
        return Err(EvalError::InsufficientData {
            needed: min_len_for(1.0 - exceedance_prob),
            got: n,
        });
    }

    let obs = baseline_volume(&sorted(observations)[range.clone()]);
    let pred = baseline_volume(&sorted(predictions)[range]);
    Ok(-100.0 * (pred - obs) / (obs + LOW_FLOW_FLOOR))
}

fn volume_bias(observations: &[f64], predictions: &[f64]) -> Result<f64> {
    let numerator: f64 = predictions
        .iter()
        .zip(observations.iter())
        .map(|(p, o)| p - o)
        .sum();
    let denominator: f64 = observations.iter().sum();
    if denominator == 0.0 {
        return Err(EvalError::DegenerateInput(
            "percent bias is undefined when observations sum to zero".to_string(),
        ));
    }
    Ok(100.0 * numerator / denominator)
}

/// Sum of floored values above the segment's own minimum.
fn baseline_volume(segment: &[f64]) -> f64 {
    let floored: Vec<f64> = segment
        .iter()
        .map(|&v| if v <= LOW_FLOW_FLOOR { LOW_FLOW_FLOOR } else { v })
        .collect();
    let min = floored.iter().copied().fold(f64::INFINITY, f64::min);
    floored.iter().map(|v| v - min).sum()
}

fn checked_prob(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(EvalError::InvalidParameter(format!(
            "exceedance probability must be in (0, 1), got {p}"
        )));
    }
    Ok(p)
}

fn segment_len(n: usize, fraction: f64) -> usize {
    (n as f64 * fraction).floor() as usize
}

fn min_len_for(fraction: f64) -> usize {
    (1.0 / fraction).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn percent_bias_known_values() {
        assert_relative_eq!(
            percent_bias(&[2.0, 2.0, 2.0, 2.0], &[1.0, 1.0, 1.0, 1.0]).unwrap(),
            -50.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            percent_bias(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            percent_bias(&[1.0, 1.0], &[1.5, 1.5]).unwrap(),
            50.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn percent_bias_zero_volume_is_degenerate() {
        assert!(matches!(
            percent_bias(&[-1.0, 1.0], &[0.0, 0.0]),
            Err(EvalError::DegenerateInput(_))
        ));
    }

    #[test]
    fn high_flow_selects_top_values_independently() {
        // n = 10, p = 0.2 -> top 2 of each series
        let obs = ramp(10);
        // predictions shuffled so the top-2 are at different indices than obs
        let pred = vec![12.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0];
        // obs top: [9, 10] sum 19; pred top: [10, 12] sum 22
        let fhv = percent_bias_high_flow(&obs, &pred, 0.2).unwrap();
        assert_relative_eq!(fhv, 100.0 * 3.0 / 19.0, epsilon = 1e-12);
    }

    #[test]
    fn high_flow_default_probability_needs_fifty_values() {
        let obs = ramp(49);
        assert!(matches!(
            percent_bias_high_flow(&obs, &obs, DEFAULT_HIGH_FLOW_EXCEEDANCE),
            Err(EvalError::InsufficientData { got: 49, .. })
        ));
        let obs = ramp(100);
        let pred: Vec<f64> = obs.iter().map(|v| v * 1.1).collect();
        // top 2: obs [99, 100], pred [108.9, 110]
        assert_relative_eq!(
            percent_bias_high_flow(&obs, &pred, DEFAULT_HIGH_FLOW_EXCEEDANCE).unwrap(),
            10.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn low_flow_removes_segment_baseline() {
        // n = 10, p = 0.7 -> bottom 3: obs [1, 2, 3] -> 3, pred [2, 4, 6] -> 6
        let obs = ramp(10);
        let pred: Vec<f64> = obs.iter().map(|v| v * 2.0).collect();
        let flv = percent_bias_low_flow(&obs, &pred, DEFAULT_LOW_FLOW_EXCEEDANCE).unwrap();
        assert_relative_eq!(flv, -100.0 * 3.0 / (3.0 + 1e-6), epsilon = 1e-9);
    }

    #[test]
    fn low_flow_ignores_constant_offset() {
        // A constant shift cancels after baseline removal.
        let obs = ramp(10);
        let pred: Vec<f64> = obs.iter().map(|v| v + 5.0).collect();
        assert_relative_eq!(
            percent_bias_low_flow(&obs, &pred, 0.7).unwrap(),
            0.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn low_flow_floors_small_values() {
        // bottom 3 of obs: [-2, 0, 0.5] -> [1e-6, 1e-6, 0.5]
        let obs = vec![-2.0, 0.0, 0.5, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let pred = vec![1e-6, 1e-6, 0.5, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_relative_eq!(
            percent_bias_low_flow(&obs, &pred, 0.7).unwrap(),
            0.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn exceedance_probability_must_be_open_unit_interval() {
        let obs = ramp(10);
        for p in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                percent_bias_high_flow(&obs, &obs, p),
                Err(EvalError::InvalidParameter(_))
            ));
            assert!(matches!(
                percent_bias_low_flow(&obs, &obs, p),
                Err(EvalError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn regime_ranges_do_not_overlap() {
        let config = ExceedanceConfig::default();
        let (low, high) = config.regime_ranges(100).unwrap();
        assert_eq!(low, 0..30);
        assert_eq!(high, 98..100);
        assert!(low.end <= high.start);
    }

    #[test]
    fn regime_metrics_read_only_their_own_segment() {
        // n = 10, high 0.2 -> sorted positions 8..10, low 0.7 -> 0..3
        let config = ExceedanceConfig::default().with_high_flow(0.2);
        let (low, high) = config.regime_ranges(10).unwrap();
        assert_eq!(low, low_flow_range(10, 0.7).unwrap());
        assert_eq!(high, high_flow_range(10, 0.2).unwrap());

        let obs = ramp(10);
        // change only the middle of the distribution, keeping sort order
        let mut pred = obs.clone();
        for v in &mut pred[3..8] {
            *v += 0.5;
        }
        assert_relative_eq!(
            percent_bias_high_flow(&obs, &pred, 0.2).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            percent_bias_low_flow(&obs, &pred, 0.7).unwrap(),
            0.0,
            epsilon = 1e-12
        );

        // change the top segment: FHV moves, FLV does not
        let mut pred = obs.clone();
        pred[8] += 1.0;
        pred[9] += 1.0;
        assert_relative_eq!(
            percent_bias_high_flow(&obs, &pred, 0.2).unwrap(),
            100.0 * 2.0 / 19.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            percent_bias_low_flow(&obs, &pred, 0.7).unwrap(),
            0.0,
            epsilon = 1e-12
        );

        // change the position just above the low segment: FLV is unaffected
        let mut pred = obs.clone();
        pred[3] += 0.5;
        assert_relative_eq!(
            percent_bias_low_flow(&obs, &pred, 0.7).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }
}
