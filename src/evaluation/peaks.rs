//! Extraction of the most prominent high-flow events from a table.
//!
//! Peaks are found greedily: the global maximum of the evaluation column is
//! cut out together with a window around it, the rows are removed, and the
//! search repeats on what is left. Windows therefore never share rows.

use chrono::{DateTime, Utc};

use crate::core::FlowTable;
use crate::error::{EvalError, Result};

/// How far a window reaches around its peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeakWindowShape {
    /// `window / 4` rows before the peak, `window` rows from the peak on.
    /// Recession limbs are longer than rising limbs.
    #[default]
    Asymmetric,
    /// `window / 2` rows on either side.
    Symmetric,
}

impl PeakWindowShape {
    /// Rows before the peak and rows from the peak onward.
    fn reach(&self, window: usize) -> (usize, usize) {
        match self {
            Self::Asymmetric => (window / 4, window),
            Self::Symmetric => (window / 2, window / 2),
        }
    }
}

/// What to do when the table cannot hold `n_peaks` full windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsufficientDataPolicy {
    /// Fail with `InsufficientData` instead of returning a short window.
    #[default]
    Error,
    /// Clamp windows to the remaining rows and return the windows found so far.
    Truncate,
}

/// Configuration for [`extract_peaks`].
#[derive(Debug, Clone, PartialEq)]
pub struct PeakConfig {
    /// Column searched for maxima.
    pub eval_column: String,
    /// Number of peaks to extract.
    pub n_peaks: usize,
    /// Window size in rows.
    pub window: usize,
    pub shape: PeakWindowShape,
    pub policy: InsufficientDataPolicy,
}

impl PeakConfig {
    pub fn new(eval_column: impl Into<String>, n_peaks: usize, window: usize) -> Self {
        Self {
            eval_column: eval_column.into(),
            n_peaks,
            window,
            shape: PeakWindowShape::default(),
            policy: InsufficientDataPolicy::default(),
        }
    }

    pub fn with_shape(mut self, shape: PeakWindowShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_policy(mut self, policy: InsufficientDataPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.n_peaks == 0 {
            return Err(EvalError::InvalidParameter(
                "n_peaks must be positive".to_string(),
            ));
        }
        if self.window == 0 {
            return Err(EvalError::InvalidParameter(
                "window must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One extracted event.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakWindow {
    /// Sequence number of the peak, 0 for the largest.
    pub peak_index: usize,
    /// Position of the peak row inside `rows`.
    pub peak_row: usize,
    /// The contiguous rows of the event, in original order.
    pub rows: FlowTable,
}

impl PeakWindow {
    /// Value of `column` at the peak.
    pub fn peak_value(&self, column: &str) -> Result<f64> {
        self.rows
            .column(column)?
            .get(self.peak_row)
            .copied()
            .ok_or(EvalError::IndexOutOfBounds {
                index: self.peak_row,
                size: self.rows.len(),
            })
    }

    pub fn peak_timestamp(&self) -> Result<DateTime<Utc>> {
        self.rows
            .timestamps()
            .get(self.peak_row)
            .copied()
            .ok_or(EvalError::IndexOutOfBounds {
                index: self.peak_row,
                size: self.rows.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row of the concatenated peak windows, tagged with its peak index.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakRow {
    pub n_peak: usize,
    pub timestamp: DateTime<Utc>,
    /// Column values in the table's label order.
    pub values: Vec<f64>,
}

/// Result of [`extract_peaks`].
#[derive(Debug, Clone, PartialEq)]
pub struct PeakExtraction {
    /// Windows in extraction order.
    pub windows: Vec<PeakWindow>,
    /// Rows not claimed by any window.
    pub remainder: FlowTable,
}

impl PeakExtraction {
    /// All window rows stacked in extraction order, each tagged with its peak.
    pub fn concatenated(&self) -> Vec<PeakRow> {
        self.windows
            .iter()
            .flat_map(|w| {
                (0..w.rows.len()).filter_map(move |i| {
                    w.rows.row(i).ok().map(|values| PeakRow {
                        n_peak: w.peak_index,
                        timestamp: w.rows.timestamps()[i],
                        values,
                    })
                })
            })
            .collect()
    }

    /// Total number of extracted rows.
    pub fn n_rows(&self) -> usize {
        self.windows.iter().map(|w| w.rows.len()).sum()
    }
}

/// Extract the `n_peaks` most prominent events of `config.eval_column`.
///
/// Takes ownership of the table; pass a clone to keep the original. For
/// each peak the window is `[max(0, i - back), min(len, i + forward))` in
/// the current remaining table, always containing the peak row.
///
/// Under [`InsufficientDataPolicy::Error`] only the look-back may be cut
/// short, at the first row. The table must hold at least
/// `n_peaks * window` rows, and every window must reach its full `forward`
/// extent inside the remaining rows. [`InsufficientDataPolicy::Truncate`]
/// clamps the window end instead and stops once no peak is left.
///
/// # Errors
/// `InvalidParameter` for a zero window or zero peak count,
/// `UnknownColumn` when the evaluation column is absent, and under the
/// `Error` policy `InsufficientData`:
/// - `{ needed: n_peaks * window, got: rows }` when the table is too short,
/// - `{ needed: peak + forward, got: remaining rows }` when a window would
///   run past the end of the remaining table,
/// - `{ needed: n_peaks, got: peaks found }` when only NaN values remain.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use hydro_forecast_eval::core::FlowTable;
/// use hydro_forecast_eval::evaluation::{extract_peaks, PeakConfig};
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let table = FlowTable::builder()
///     .timestamps((0..8).map(|i| base + Duration::hours(i)).collect())
///     .column("q", vec![1.0, 2.0, 9.0, 3.0, 1.0, 1.0, 5.0, 2.0])
///     .build()
///     .unwrap();
///
/// let peaks = extract_peaks(table, &PeakConfig::new("q", 2, 2)).unwrap();
/// assert_eq!(peaks.windows[0].peak_value("q").unwrap(), 9.0);
/// assert_eq!(peaks.windows[1].peak_value("q").unwrap(), 5.0);
/// ```
pub fn extract_peaks(table: FlowTable, config: &PeakConfig) -> Result<PeakExtraction> {
    config.validate()?;
    table.column_index(&config.eval_column)?;

    let strict = config.policy == InsufficientDataPolicy::Error;
    let needed = config.n_peaks.saturating_mul(config.window);
    if strict && needed > table.len() {
        return Err(EvalError::InsufficientData {
            needed,
            got: table.len(),
        });
    }

    let (back, forward) = config.shape.reach(config.window);
    let forward = forward.max(1);

    let mut remaining = table;
    let mut windows = Vec::with_capacity(config.n_peaks);

    for peak_index in 0..config.n_peaks {
        let Some(i_max) = remaining.argmax(&config.eval_column)? else {
            match config.policy {
                InsufficientDataPolicy::Error => {
                    return Err(EvalError::InsufficientData {
                        needed: config.n_peaks,
                        got: peak_index,
                    })
                }
                InsufficientDataPolicy::Truncate => break,
            }
        };

        let start = i_max.saturating_sub(back);
        let reach = i_max + forward;
        if strict && reach > remaining.len() {
            return Err(EvalError::InsufficientData {
                needed: reach,
                got: remaining.len(),
            });
        }
        let end = reach.min(remaining.len());

        windows.push(PeakWindow {
            peak_index,
            peak_row: i_max - start,
            rows: remaining.slice(start, end)?,
        });
        remaining = remaining.without_rows(start..end)?;
    }

    Ok(PeakExtraction {
        windows,
        remainder: remaining,
    })
}
