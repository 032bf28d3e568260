//! Named metric selector used by multistep evaluation and model ranking.

use std::fmt;
use std::str::FromStr;

use crate::error::{EvalError, Result};
use crate::metrics::bias::{
    percent_bias, percent_bias_high_flow, percent_bias_low_flow, ExceedanceConfig,
};
use crate::metrics::efficiency::{nse, rms};
use crate::metrics::kge::{
    kge, kge_5alpha, kge_bias, kge_linear_correlation, kge_variability,
};

/// Which direction of a metric counts as an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    HigherIsBetter,
    LowerIsBetter,
    /// Signed bias scores, optimum at 0.
    CloserToZero,
    /// Ratio and correlation components, optimum at 1.
    CloserToOne,
}

impl Orientation {
    /// Whether score `a` is strictly better than score `b`.
    ///
    /// NaN is never better than anything.
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        if a.is_nan() {
            return false;
        }
        if b.is_nan() {
            return true;
        }
        match self {
            Self::HigherIsBetter => a > b,
            Self::LowerIsBetter => a < b,
            Self::CloserToZero => a.abs() < b.abs(),
            Self::CloserToOne => (a - 1.0).abs() < (b - 1.0).abs(),
        }
    }
}

/// Hydrological forecast-quality metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    Rms,
    Nse,
    Kge,
    KgeVariability,
    KgeBias,
    KgeLinearCorrelation,
    Kge5Alpha,
    PercentBias,
    PercentBiasHighFlow,
    PercentBiasLowFlow,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Rms,
        Metric::Nse,
        Metric::Kge,
        Metric::KgeVariability,
        Metric::KgeBias,
        Metric::KgeLinearCorrelation,
        Metric::Kge5Alpha,
        Metric::PercentBias,
        Metric::PercentBiasHighFlow,
        Metric::PercentBiasLowFlow,
    ];

    /// Evaluate with the default exceedance probabilities.
    pub fn compute(&self, observations: &[f64], predictions: &[f64]) -> Result<f64> {
        self.compute_with(observations, predictions, &ExceedanceConfig::default())
    }

    /// Evaluate with explicit exceedance probabilities for the flow-regime biases.
    pub fn compute_with(
        &self,
        observations: &[f64],
        predictions: &[f64],
        exceedance: &ExceedanceConfig,
    ) -> Result<f64> {
        match self {
            Self::Rms => rms(observations, predictions),
            Self::Nse => nse(observations, predictions),
            Self::Kge => kge(observations, predictions),
            Self::KgeVariability => kge_variability(observations, predictions),
            Self::KgeBias => kge_bias(observations, predictions),
            Self::KgeLinearCorrelation => kge_linear_correlation(observations, predictions),
            Self::Kge5Alpha => kge_5alpha(observations, predictions),
            Self::PercentBias => percent_bias(observations, predictions),
            Self::PercentBiasHighFlow => {
                percent_bias_high_flow(observations, predictions, exceedance.high_flow)
            }
            Self::PercentBiasLowFlow => {
                percent_bias_low_flow(observations, predictions, exceedance.low_flow)
            }
        }
    }

    /// Short lowercase key, as used in fold records.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rms => "rms",
            Self::Nse => "nse",
            Self::Kge => "kge",
            Self::KgeVariability => "kge_var",
            Self::KgeBias => "kge_bias",
            Self::KgeLinearCorrelation => "kge_linear",
            Self::Kge5Alpha => "kge_5alpha",
            Self::PercentBias => "bias",
            Self::PercentBiasHighFlow => "bias_fhv",
            Self::PercentBiasLowFlow => "bias_flv",
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            Self::Rms => Orientation::LowerIsBetter,
            Self::Nse | Self::Kge | Self::Kge5Alpha => Orientation::HigherIsBetter,
            Self::KgeVariability | Self::KgeBias | Self::KgeLinearCorrelation => {
                Orientation::CloserToOne
            }
            Self::PercentBias | Self::PercentBiasHighFlow | Self::PercentBiasLowFlow => {
                Orientation::CloserToZero
            }
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        let metric = match s.trim().to_ascii_lowercase().as_str() {
            "rms" | "rmse" => Self::Rms,
            "nse" => Self::Nse,
            "kge" => Self::Kge,
            "kge_var" | "kge_variability" | "gamma" => Self::KgeVariability,
            "kge_bias" | "beta" => Self::KgeBias,
            "kge_linear" | "kge_linear_correlation" | "r" => Self::KgeLinearCorrelation,
            "kge_5alpha" | "kge5alpha" => Self::Kge5Alpha,
            "bias" | "pbias" | "percent_bias" => Self::PercentBias,
            "bias_fhv" | "fhv" => Self::PercentBiasHighFlow,
            "bias_flv" | "flv" => Self::PercentBiasLowFlow,
            other => {
                return Err(EvalError::InvalidParameter(format!(
                    "unknown metric '{other}'"
                )))
            }
        };
        Ok(metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dispatch_matches_direct_calls() {
        let obs = [1.0, 2.0, 3.0, 4.0];
        let pred = [1.5, 1.8, 3.3, 4.4];
        assert_relative_eq!(
            Metric::Nse.compute(&obs, &pred).unwrap(),
            nse(&obs, &pred).unwrap(),
            epsilon = 1e-15
        );
        assert_relative_eq!(
            Metric::Kge.compute(&obs, &pred).unwrap(),
            kge(&obs, &pred).unwrap(),
            epsilon = 1e-15
        );
        assert_relative_eq!(
            Metric::PercentBias.compute(&obs, &pred).unwrap(),
            percent_bias(&obs, &pred).unwrap(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn compute_with_uses_given_exceedance() {
        let obs: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let pred: Vec<f64> = obs.iter().map(|v| v * 2.0).collect();
        let config = ExceedanceConfig::default().with_high_flow(0.2);
        assert_relative_eq!(
            Metric::PercentBiasHighFlow
                .compute_with(&obs, &pred, &config)
                .unwrap(),
            100.0,
            epsilon = 1e-12
        );
        // default 2 % of 10 values is an empty segment
        assert!(Metric::PercentBiasHighFlow.compute(&obs, &pred).is_err());
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
        }
        assert_eq!("NSE".parse::<Metric>().unwrap(), Metric::Nse);
        assert_eq!("KGE".parse::<Metric>().unwrap(), Metric::Kge);
        assert!("mape".parse::<Metric>().is_err());
    }

    #[test]
    fn orientation_ranks_scores() {
        assert!(Metric::Kge.orientation().is_better(0.8, 0.5));
        assert!(Metric::Rms.orientation().is_better(0.5, 0.8));
        assert!(Metric::PercentBias.orientation().is_better(-3.0, 5.0));
        assert!(Metric::KgeBias.orientation().is_better(1.1, 0.8));
        assert!(!Metric::Nse.orientation().is_better(f64::NAN, -10.0));
        assert!(Metric::Nse.orientation().is_better(-10.0, f64::NAN));
    }
}
