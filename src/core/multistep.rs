//! Dense samples × horizon-steps array.

use crate::error::{EvalError, Result};

/// Layout of nested input vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueLayout {
    /// Each inner vector is one sample across all horizon steps.
    #[default]
    Row,
    /// Each inner vector is one horizon step across all samples.
    Column,
}

/// Forecasts (or observations) at several lead times.
///
/// Element `(i, x)` is the value for sample `i` at horizon step `x`.
/// Storage is row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct MultistepArray {
    data: Vec<f64>,
    n_samples: usize,
    n_steps: usize,
}

impl MultistepArray {
    /// Build from nested vectors in the given layout.
    ///
    /// # Errors
    /// `EmptyData` for zero samples or zero steps, `ShapeMismatch` when the
    /// inner vectors are ragged.
    pub fn new(values: Vec<Vec<f64>>, layout: ValueLayout) -> Result<Self> {
        let outer = values.len();
        let inner = values.first().map(|v| v.len()).unwrap_or(0);
        if outer == 0 || inner == 0 {
            return Err(EvalError::EmptyData);
        }
        for v in &values {
            if v.len() != inner {
                return Err(EvalError::ShapeMismatch {
                    expected: inner,
                    got: v.len(),
                });
            }
        }

        match layout {
            ValueLayout::Row => Ok(Self {
                data: values.into_iter().flatten().collect(),
                n_samples: outer,
                n_steps: inner,
            }),
            ValueLayout::Column => {
                // Transpose to row-major
                let data = (0..inner)
                    .flat_map(|i| values.iter().map(move |step| step[i]))
                    .collect();
                Ok(Self {
                    data,
                    n_samples: inner,
                    n_steps: outer,
                })
            }
        }
    }

    /// One inner vector per sample.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(rows, ValueLayout::Row)
    }

    /// One inner vector per horizon step.
    pub fn from_steps(steps: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(steps, ValueLayout::Column)
    }

    /// A single-step array from one series.
    pub fn single_step(values: Vec<f64>) -> Result<Self> {
        Self::from_steps(vec![values])
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// `(n_samples, n_steps)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_samples, self.n_steps)
    }

    /// Value of sample `i` at step `x`.
    pub fn get(&self, i: usize, x: usize) -> Option<f64> {
        if i < self.n_samples && x < self.n_steps {
            Some(self.data[i * self.n_steps + x])
        } else {
            None
        }
    }

    /// All horizon steps of one sample.
    pub fn row(&self, i: usize) -> Result<&[f64]> {
        if i >= self.n_samples {
            return Err(EvalError::IndexOutOfBounds {
                index: i,
                size: self.n_samples,
            });
        }
        Ok(&self.data[i * self.n_steps..(i + 1) * self.n_steps])
    }

    /// All samples at one horizon step.
    pub fn step(&self, x: usize) -> Result<Vec<f64>> {
        if x >= self.n_steps {
            return Err(EvalError::IndexOutOfBounds {
                index: x,
                size: self.n_steps,
            });
        }
        Ok(self
            .data
            .iter()
            .skip(x)
            .step_by(self.n_steps)
            .copied()
            .collect())
    }

    /// Iterate over horizon steps in order.
    pub fn steps(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        (0..self.n_steps).map(move |x| {
            self.data
                .iter()
                .skip(x)
                .step_by(self.n_steps)
                .copied()
                .collect()
        })
    }
}
