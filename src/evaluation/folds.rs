//! Cross-validation fold records and ranking of trial runs.
//!
//! A trial is one training run (one hyperparameter draw, one seed) scored on
//! every fold. Validation scores are averaged after skipping the first
//! `warmup_folds` folds, whose training windows are too short to be
//! representative; test scores are averaged over all folds.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{EvalError, Result};
use crate::metrics::{kge, nse, percent_bias, Metric};

/// Scores of one model on one fold.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoldRecord {
    #[cfg_attr(feature = "serde", serde(rename = "NSE"))]
    pub nse: f64,
    #[cfg_attr(feature = "serde", serde(rename = "KGE"))]
    pub kge: f64,
    pub bias: f64,
}

impl FoldRecord {
    /// Score a fold's predictions.
    pub fn evaluate(observations: &[f64], predictions: &[f64]) -> Result<Self> {
        Ok(Self {
            nse: nse(observations, predictions)?,
            kge: kge(observations, predictions)?,
            bias: percent_bias(observations, predictions)?,
        })
    }

    /// Value of a recorded metric; `None` for metrics not kept per fold.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Nse => Some(self.nse),
            Metric::Kge => Some(self.kge),
            Metric::PercentBias => Some(self.bias),
            _ => None,
        }
    }
}

/// Fold records keyed by 1-based fold id.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "BTreeMap<u32, FoldRecord>",
        into = "BTreeMap<u32, FoldRecord>"
    )
)]
pub struct FoldMetrics {
    folds: BTreeMap<u32, FoldRecord>,
}

impl TryFrom<BTreeMap<u32, FoldRecord>> for FoldMetrics {
    type Error = EvalError;

    /// Fails on fold id 0, as [`FoldMetrics::insert`] does.
    fn try_from(folds: BTreeMap<u32, FoldRecord>) -> Result<Self> {
        if folds.contains_key(&0) {
            return Err(fold_zero());
        }
        Ok(Self { folds })
    }
}

impl From<FoldMetrics> for BTreeMap<u32, FoldRecord> {
    fn from(metrics: FoldMetrics) -> Self {
        metrics.folds
    }
}

impl FoldMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regroup per-metric columns (index 0 = fold 1) into fold records.
    pub fn from_columns(nse: &[f64], kge: &[f64], bias: &[f64]) -> Result<Self> {
        for column in [kge, bias] {
            if column.len() != nse.len() {
                return Err(EvalError::ShapeMismatch {
                    expected: nse.len(),
                    got: column.len(),
                });
            }
        }
        let folds = (1u32..)
            .zip(nse.iter().zip(kge).zip(bias))
            .map(|(id, ((&nse, &kge), &bias))| (id, FoldRecord { nse, kge, bias }))
            .collect();
        Ok(Self { folds })
    }

    /// Add or replace the record of a fold.
    pub fn insert(&mut self, fold: u32, record: FoldRecord) -> Result<Option<FoldRecord>> {
        if fold == 0 {
            return Err(fold_zero());
        }
        Ok(self.folds.insert(fold, record))
    }

    pub fn get(&self, fold: u32) -> Option<&FoldRecord> {
        self.folds.get(&fold)
    }

    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }

    /// Fold ids in ascending order.
    pub fn fold_ids(&self) -> Vec<u32> {
        self.folds.keys().copied().collect()
    }

    /// Check that folds `1..=k` are all present.
    pub fn ensure_folds(&self, k: u32) -> Result<()> {
        match (1..=k).find(|id| !self.folds.contains_key(id)) {
            Some(missing) => Err(EvalError::MissingFold(missing)),
            None => Ok(()),
        }
    }

    /// One metric across folds, ordered by fold id.
    pub fn values(&self, metric: Metric) -> Result<Vec<f64>> {
        self.folds
            .values()
            .map(|r| r.get(metric).ok_or_else(|| not_recorded(metric)))
            .collect()
    }

    /// Mean of a metric over all folds after the first `skip_folds`.
    pub fn mean(&self, metric: Metric, skip_folds: usize) -> Result<f64> {
        let values = self.values(metric)?;
        if values.len() <= skip_folds {
            return Err(EvalError::InsufficientData {
                needed: skip_folds + 1,
                got: values.len(),
            });
        }
        let kept = &values[skip_folds..];
        Ok(kept.iter().sum::<f64>() / kept.len() as f64)
    }
}

/// Fold scores of one trial run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialMetrics {
    pub trial: u32,
    /// Validation scores, absent for externally trained baselines.
    pub valid: Option<FoldMetrics>,
    pub test: FoldMetrics,
}

impl TrialMetrics {
    pub fn new(trial: u32, test: FoldMetrics) -> Self {
        Self {
            trial,
            valid: None,
            test,
        }
    }

    pub fn with_valid(mut self, valid: FoldMetrics) -> Self {
        self.valid = Some(valid);
        self
    }
}

/// Configuration for [`rank_trials`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    /// Metric to rank on; must be one recorded per fold.
    pub metric: Metric,
    /// Leading validation folds excluded from the validation mean.
    pub warmup_folds: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Kge,
            warmup_folds: 2,
        }
    }
}

impl RankingConfig {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            ..Self::default()
        }
    }

    pub fn with_warmup_folds(mut self, warmup_folds: usize) -> Self {
        self.warmup_folds = warmup_folds;
        self
    }
}

/// Aggregated score of one trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialScore {
    pub trial: u32,
    /// Validation mean, `None` when the trial has no validation record.
    pub valid: Option<f64>,
    pub test: f64,
}

/// Scores of all trials on one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRanking {
    pub metric: Metric,
    /// In input order.
    pub scores: Vec<TrialScore>,
}

impl TrialRanking {
    /// Trial with the best validation mean (the model-selection criterion).
    pub fn best_by_validation(&self) -> Option<&TrialScore> {
        self.best_by(|s| s.valid)
    }

    /// Trial with the best test mean.
    pub fn best_by_test(&self) -> Option<&TrialScore> {
        self.best_by(|s| Some(s.test))
    }

    fn best_by<F>(&self, key: F) -> Option<&TrialScore>
    where
        F: Fn(&TrialScore) -> Option<f64>,
    {
        let orientation = self.metric.orientation();
        let mut best: Option<(&TrialScore, f64)> = None;
        for score in &self.scores {
            let Some(v) = key(score).filter(|v| !v.is_nan()) else {
                continue;
            };
            match best {
                Some((_, b)) if !orientation.is_better(v, b) => {}
                _ => best = Some((score, v)),
            }
        }
        best.map(|(s, _)| s)
    }
}

impl fmt::Display for TrialRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "trial  valid_{0}  test_{0}", self.metric)?;
        for s in &self.scores {
            match s.valid {
                Some(v) => writeln!(f, "{:5}  {:.4}  {:.4}", s.trial, v, s.test)?,
                None => writeln!(f, "{:5}  -  {:.4}", s.trial, s.test)?,
            }
        }
        Ok(())
    }
}

/// Average each trial's fold scores and collect them for selection.
///
/// # Errors
/// `EmptyData` for no trials, `InvalidParameter` when the metric is not
/// kept per fold, `InsufficientData` when a validation record has no folds
/// beyond the warm-up.
pub fn rank_trials(trials: &[TrialMetrics], config: &RankingConfig) -> Result<TrialRanking> {
    if trials.is_empty() {
        return Err(EvalError::EmptyData);
    }

    let scores = trials
        .iter()
        .map(|t| -> Result<TrialScore> {
            let valid = t
                .valid
                .as_ref()
                .map(|v| v.mean(config.metric, config.warmup_folds))
                .transpose()?;
            Ok(TrialScore {
                trial: t.trial,
                valid,
                test: t.test.mean(config.metric, 0)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TrialRanking {
        metric: config.metric,
        scores,
    })
}

fn not_recorded(metric: Metric) -> EvalError {
    EvalError::InvalidParameter(format!("metric '{metric}' is not recorded per fold"))
}

fn fold_zero() -> EvalError {
    EvalError::InvalidParameter("fold ids start at 1".to_string())
}
