//! Head-to-head comparison of two forecast models per horizon step.

use std::fmt;

use crate::core::MultistepArray;
use crate::error::{EvalError, Result};

/// Number of horizon steps in the operational forecasts (15-minute steps
/// over one day).
pub const DEFAULT_HORIZON: usize = 96;

/// Win counts and absolute errors of two models at one horizon step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepComparison {
    /// Samples where model A was strictly closer to the observation.
    pub wins_a: usize,
    /// Samples where model B was strictly closer to the observation.
    pub wins_b: usize,
    /// `|observed - a|` for every sample.
    pub abs_errors_a: Vec<f64>,
    /// `|observed - b|` for every sample.
    pub abs_errors_b: Vec<f64>,
}

impl StepComparison {
    fn decisive(&self) -> usize {
        self.wins_a + self.wins_b
    }

    /// `wins_a / (wins_a + wins_b)`; `None` when every sample tied.
    pub fn win_rate_a(&self) -> Option<f64> {
        match self.decisive() {
            0 => None,
            n => Some(self.wins_a as f64 / n as f64),
        }
    }

    /// `wins_b / (wins_a + wins_b)`; `None` when every sample tied.
    pub fn win_rate_b(&self) -> Option<f64> {
        match self.decisive() {
            0 => None,
            n => Some(self.wins_b as f64 / n as f64),
        }
    }

    /// Samples where neither model won.
    pub fn ties(&self) -> usize {
        self.abs_errors_a.len() - self.decisive()
    }
}

/// Per-step comparison of two models against the same observations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelComparison {
    /// One entry per horizon step, in step order.
    pub steps: Vec<StepComparison>,
}

impl ModelComparison {
    pub fn horizon(&self) -> usize {
        self.steps.len()
    }

    /// `(wins_a, wins_b)` per step.
    pub fn wins(&self) -> Vec<(usize, usize)> {
        self.steps.iter().map(|s| (s.wins_a, s.wins_b)).collect()
    }

    pub fn win_rates_a(&self) -> Vec<Option<f64>> {
        self.steps.iter().map(StepComparison::win_rate_a).collect()
    }

    pub fn win_rates_b(&self) -> Vec<Option<f64>> {
        self.steps.iter().map(StepComparison::win_rate_b).collect()
    }

    /// Wins summed over the whole horizon.
    pub fn total_wins(&self) -> (usize, usize) {
        self.steps
            .iter()
            .fold((0, 0), |(a, b), s| (a + s.wins_a, b + s.wins_b))
    }

    /// Absolute errors of model A, one vector per step.
    pub fn abs_errors_a(&self) -> Vec<&[f64]> {
        self.steps.iter().map(|s| s.abs_errors_a.as_slice()).collect()
    }

    /// Absolute errors of model B, one vector per step.
    pub fn abs_errors_b(&self) -> Vec<&[f64]> {
        self.steps.iter().map(|s| s.abs_errors_b.as_slice()).collect()
    }
}

impl fmt::Display for ModelComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.total_wins();
        write!(
            f,
            "{} steps: model A won {} samples, model B won {}",
            self.horizon(),
            a,
            b
        )
    }
}

/// Compare models A and B sample by sample at every horizon step.
///
/// At each step a sample counts as a win for the model with the strictly
/// smaller absolute error; ties and NaN errors count for neither.
///
/// # Errors
/// `ShapeMismatch` unless all three arrays have the same shape.
pub fn compare_models(
    series_a: &MultistepArray,
    series_b: &MultistepArray,
    observed: &MultistepArray,
) -> Result<ModelComparison> {
    for candidate in [series_a, series_b] {
        if candidate.n_samples() != observed.n_samples() {
            return Err(EvalError::ShapeMismatch {
                expected: observed.n_samples(),
                got: candidate.n_samples(),
            });
        }
        if candidate.n_steps() != observed.n_steps() {
            return Err(EvalError::ShapeMismatch {
                expected: observed.n_steps(),
                got: candidate.n_steps(),
            });
        }
    }

    let steps = observed
        .steps()
        .zip(series_a.steps().zip(series_b.steps()))
        .map(|(obs, (a, b))| compare_step(&obs, &a, &b))
        .collect();

    Ok(ModelComparison { steps })
}

fn compare_step(observed: &[f64], a: &[f64], b: &[f64]) -> StepComparison {
    let mut wins_a = 0;
    let mut wins_b = 0;
    let mut abs_errors_a = Vec::with_capacity(observed.len());
    let mut abs_errors_b = Vec::with_capacity(observed.len());

    for ((o, pa), pb) in observed.iter().zip(a).zip(b) {
        let err_a = (o - pa).abs();
        let err_b = (o - pb).abs();
        if err_a < err_b {
            wins_a += 1;
        }
        if err_b < err_a {
            wins_b += 1;
        }
        abs_errors_a.push(err_a);
        abs_errors_b.push(err_b);
    }

    StepComparison {
        wins_a,
        wins_b,
        abs_errors_a,
        abs_errors_b,
    }
}
