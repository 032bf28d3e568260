//! Time-indexed table of named flow columns.

use std::ops::Range;

use crate::error::{EvalError, Result};
use chrono::{DateTime, Utc};

/// A table of observations indexed by strictly increasing timestamps.
///
/// Columns are stored column-major: `columns[c][row]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowTable {
    timestamps: Vec<DateTime<Utc>>,
    labels: Vec<String>,
    columns: Vec<Vec<f64>>,
}

/// Builder for constructing a [`FlowTable`].
#[derive(Debug, Clone, Default)]
pub struct FlowTableBuilder {
    timestamps: Vec<DateTime<Utc>>,
    labels: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl FlowTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Append a named column.
    pub fn column(mut self, label: impl Into<String>, values: Vec<f64>) -> Self {
        self.labels.push(label.into());
        self.columns.push(values);
        self
    }

    pub fn build(self) -> Result<FlowTable> {
        FlowTable::new(self.timestamps, self.labels, self.columns)
    }
}

impl FlowTable {
    /// Create a table, validating the index and column shapes.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        labels: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(EvalError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        if labels.len() != columns.len() {
            return Err(EvalError::ShapeMismatch {
                expected: columns.len(),
                got: labels.len(),
            });
        }
        for column in &columns {
            if column.len() != timestamps.len() {
                return Err(EvalError::ShapeMismatch {
                    expected: timestamps.len(),
                    got: column.len(),
                });
            }
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(EvalError::InvalidParameter(format!(
                    "duplicate column label '{label}'"
                )));
            }
        }

        Ok(Self {
            timestamps,
            labels,
            columns,
        })
    }

    pub fn builder() -> FlowTableBuilder {
        FlowTableBuilder::new()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn column_index(&self, label: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| EvalError::UnknownColumn(label.to_string()))
    }

    /// Values of a named column.
    pub fn column(&self, label: &str) -> Result<&[f64]> {
        let idx = self.column_index(label)?;
        Ok(&self.columns[idx])
    }

    /// All column values at one row, in label order.
    pub fn row(&self, index: usize) -> Result<Vec<f64>> {
        if index >= self.len() {
            return Err(EvalError::IndexOutOfBounds {
                index,
                size: self.len(),
            });
        }
        Ok(self.columns.iter().map(|c| c[index]).collect())
    }

    /// Position of the first maximum of a column, skipping NaN.
    ///
    /// `None` when the table is empty or the column holds only NaN.
    pub fn argmax(&self, label: &str) -> Result<Option<usize>> {
        let values = self.column(label)?;
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in values.iter().enumerate() {
            if v.is_nan() {
                continue;
            }
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((i, v)),
            }
        }
        Ok(best.map(|(i, _)| i))
    }

    /// Copy of rows `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<FlowTable> {
        if start > end {
            return Err(EvalError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(EvalError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }

        Ok(FlowTable {
            timestamps: self.timestamps[start..end].to_vec(),
            labels: self.labels.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| c[start..end].to_vec())
                .collect(),
        })
    }

    /// Consume the table and return it with `rows` removed.
    ///
    /// Remaining rows keep their relative order.
    pub fn without_rows(mut self, rows: Range<usize>) -> Result<FlowTable> {
        if rows.start > rows.end || rows.end > self.len() {
            return Err(EvalError::IndexOutOfBounds {
                index: rows.end,
                size: self.len(),
            });
        }
        self.timestamps.drain(rows.clone());
        for column in &mut self.columns {
            column.drain(rows.clone());
        }
        Ok(self)
    }
}
