//! Per-horizon-step evaluation of multistep forecasts.

use crate::core::MultistepArray;
use crate::error::{EvalError, Result};
use crate::metrics::Metric;

/// Ground truth for a multistep forecast.
///
/// The caller states which kind of target it holds; nothing is inferred
/// from array shapes unless [`ObservedTarget::from_array`] is used.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedTarget {
    /// One observed series, compared against every horizon step.
    Single(Vec<f64>),
    /// Observations aligned with each horizon step.
    PerStep(MultistepArray),
}

impl ObservedTarget {
    /// Treat a one-step array as a single target, anything wider as per-step.
    pub fn from_array(observed: MultistepArray) -> Result<Self> {
        if observed.n_steps() == 1 {
            Ok(Self::Single(observed.step(0)?))
        } else {
            Ok(Self::PerStep(observed))
        }
    }

    pub fn n_samples(&self) -> usize {
        match self {
            Self::Single(values) => values.len(),
            Self::PerStep(array) => array.n_samples(),
        }
    }
}

/// Apply `loss_fn` independently at every horizon step of `predicted`.
///
/// Returns one loss per step, ordered by step index. With
/// [`ObservedTarget::Single`] the same observed series is used for every
/// step. No aggregation is done here.
///
/// # Errors
/// `ShapeMismatch` when sample counts differ or a per-step target has a
/// different number of steps; any error returned by `loss_fn`.
///
/// # Example
/// ```
/// use hydro_forecast_eval::core::MultistepArray;
/// use hydro_forecast_eval::evaluation::{evaluate_multistep, ObservedTarget};
/// use hydro_forecast_eval::metrics::rms;
///
/// let observed = ObservedTarget::Single(vec![1.0, 2.0, 3.0]);
/// let predicted = MultistepArray::from_steps(vec![
///     vec![1.0, 2.0, 3.0],
///     vec![2.0, 3.0, 4.0],
/// ]).unwrap();
///
/// let losses = evaluate_multistep(&observed, &predicted, rms).unwrap();
/// assert_eq!(losses.len(), 2);
/// assert!((losses[1] - 1.0).abs() < 1e-12);
/// ```
pub fn evaluate_multistep<F>(
    observed: &ObservedTarget,
    predicted: &MultistepArray,
    loss_fn: F,
) -> Result<Vec<f64>>
where
    F: Fn(&[f64], &[f64]) -> Result<f64>,
{
    if observed.n_samples() != predicted.n_samples() {
        return Err(EvalError::ShapeMismatch {
            expected: predicted.n_samples(),
            got: observed.n_samples(),
        });
    }

    match observed {
        ObservedTarget::Single(obs) => predicted
            .steps()
            .map(|pred| loss_fn(obs.as_slice(), pred.as_slice()))
            .collect(),
        ObservedTarget::PerStep(obs) => {
            if obs.n_steps() != predicted.n_steps() {
                return Err(EvalError::ShapeMismatch {
                    expected: predicted.n_steps(),
                    got: obs.n_steps(),
                });
            }
            obs.steps()
                .zip(predicted.steps())
                .map(|(o, p)| loss_fn(o.as_slice(), p.as_slice()))
                .collect()
        }
    }
}

/// [`evaluate_multistep`] with a named metric.
pub fn evaluate_multistep_metric(
    observed: &ObservedTarget,
    predicted: &MultistepArray,
    metric: Metric,
) -> Result<Vec<f64>> {
    evaluate_multistep(observed, predicted, |o, p| metric.compute(o, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{nse, rms};
    use approx::assert_relative_eq;

    fn predicted() -> MultistepArray {
        MultistepArray::from_steps(vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![1.0, 2.0, 3.0, 6.0],
            vec![2.0, 3.0, 4.0, 5.0],
        ])
        .unwrap()
    }

    #[test]
    fn single_target_is_broadcast_to_every_step() {
        let observed = ObservedTarget::Single(vec![1.0, 2.0, 3.0, 4.0]);
        let losses = evaluate_multistep(&observed, &predicted(), rms).unwrap();
        assert_eq!(losses.len(), 3);
        assert_relative_eq!(losses[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(losses[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(losses[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn per_step_target_pairs_matching_steps() {
        let observed = ObservedTarget::PerStep(
            MultistepArray::from_steps(vec![
                vec![1.0, 2.0, 3.0, 4.0],
                vec![1.0, 2.0, 3.0, 4.0],
                vec![2.0, 3.0, 4.0, 5.0],
            ])
            .unwrap(),
        );
        let losses = evaluate_multistep(&observed, &predicted(), nse).unwrap();
        assert_relative_eq!(losses[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(losses[1], 0.2, epsilon = 1e-12);
        assert_relative_eq!(losses[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn step_count_mismatch_is_rejected() {
        let observed = ObservedTarget::PerStep(
            MultistepArray::from_steps(vec![vec![1.0, 2.0, 3.0, 4.0]; 2]).unwrap(),
        );
        assert!(matches!(
            evaluate_multistep(&observed, &predicted(), rms),
            Err(EvalError::ShapeMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn sample_count_mismatch_is_rejected() {
        let observed = ObservedTarget::Single(vec![1.0, 2.0]);
        assert!(matches!(
            evaluate_multistep(&observed, &predicted(), rms),
            Err(EvalError::ShapeMismatch { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn from_array_picks_variant_by_width() {
        let single = MultistepArray::single_step(vec![1.0, 2.0]).unwrap();
        assert_eq!(
            ObservedTarget::from_array(single).unwrap(),
            ObservedTarget::Single(vec![1.0, 2.0])
        );
        let wide = MultistepArray::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(matches!(
            ObservedTarget::from_array(wide).unwrap(),
            ObservedTarget::PerStep(_)
        ));
    }

    #[test]
    fn loss_errors_propagate() {
        let observed = ObservedTarget::Single(vec![2.0, 2.0, 2.0, 2.0]);
        let result = evaluate_multistep_metric(&observed, &predicted(), Metric::Nse);
        assert!(matches!(result, Err(EvalError::DegenerateInput(_))));
    }
}
