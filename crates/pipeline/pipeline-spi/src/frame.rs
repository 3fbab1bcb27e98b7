//! Tabular input for regression models
//!
//! [`FeatureFrame`] stores a dense row-major `f64` table together with the
//! ordered column names it was built from.

use std::fmt;

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// Dense numeric table with named columns
///
/// Invariant: `values.len() == n_rows * columns.len()` and there is at
/// least one column.
///
/// # Example
///
/// ```rust
/// use pipeline_spi::FeatureFrame;
///
/// let frame = FeatureFrame::from_columns(vec![
///     ("RM".to_string(), vec![6.5, 5.9]),
///     ("TAX".to_string(), vec![296.0, 242.0]),
/// ])
/// .unwrap();
///
/// assert_eq!(frame.n_rows(), 2);
/// assert_eq!(frame.row(1), &[5.9, 242.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FrameParts")]
pub struct FeatureFrame {
    columns: Vec<String>,
    values: Vec<f64>,
    n_rows: usize,
}

/// Serialized form; `n_rows` is recomputed by [`FeatureFrame::new`]
#[derive(Deserialize)]
struct FrameParts {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl TryFrom<FrameParts> for FeatureFrame {
    type Error = ModelError;

    fn try_from(parts: FrameParts) -> Result<Self> {
        Self::new(parts.columns, parts.values)
    }
}

impl FeatureFrame {
    /// Build a frame from row-major values
    pub fn new(columns: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ModelError::InvalidData(
                "frame requires at least one column".to_string(),
            ));
        }
        if values.len() % columns.len() != 0 {
            return Err(ModelError::ShapeMismatch {
                expected: format!("a multiple of {} values", columns.len()),
                actual: format!("{} values", values.len()),
            });
        }

        let n_rows = values.len() / columns.len();
        Ok(Self {
            columns,
            values,
            n_rows,
        })
    }

    /// Build a frame from named columns of equal length
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let n_rows = columns.first().map(|(_, col)| col.len()).unwrap_or(0);
        if let Some((name, col)) = columns.iter().find(|(_, col)| col.len() != n_rows) {
            return Err(ModelError::ShapeMismatch {
                expected: format!("{} rows in every column", n_rows),
                actual: format!("{} rows in column '{}'", col.len(), name),
            });
        }

        let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
        let mut values = Vec::with_capacity(n_rows * columns.len());
        for i in 0..n_rows {
            values.extend(columns.iter().map(|(_, col)| col[i]));
        }

        Self::new(names, values)
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Raw row-major values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Values of row `i`
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows()`.
    pub fn row(&self, i: usize) -> &[f64] {
        let width = self.columns.len();
        &self.values[i * width..(i + 1) * width]
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.columns.len())
    }

    /// Iterate over the values of column `j`
    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .skip(j)
            .step_by(self.columns.len())
            .copied()
    }

    /// Apply `f(column_index, value)` to every cell, keeping the column names
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(usize, f64) -> f64,
    {
        let width = self.columns.len();
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(idx, &v)| f(idx % width, v))
            .collect();

        Self {
            columns: self.columns.clone(),
            values,
            n_rows: self.n_rows,
        }
    }
}

impl fmt::Display for FeatureFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();

        let index_width = self.n_rows.saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, name)| {
                cells
                    .iter()
                    .map(|row| row[j].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", name)?;
        }

        for (i, row) in cells.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{:<index_width$}", i)?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {:>width$}", cell)?;
            }
        }

        Ok(())
    }
}
