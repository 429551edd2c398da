//! Draws×periods matrix.
//!
//! One raw ensemble series for a single variable: rows are independent
//! draws, columns are time periods (or a single column for scalar trend
//! values). Immutable once built.
//!
//! # Memory Layout
//!
//! Values are stored in row-major order:
//! `data[draw_idx * n_periods + period_idx]`, matching the cache-friendly
//! traversal of the transform loops.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when constructing a [`DrawMatrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// No draws supplied.
    #[error("Empty draw matrix: at least one draw is required")]
    Empty,

    /// A draw row had zero periods.
    #[error("Empty draw row: at least one period is required")]
    EmptyRow,

    /// Rows of differing length.
    #[error("Ragged draw matrix: row {row} has {got} periods, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Observed row length.
        got: usize,
        /// Length of the first row.
        expected: usize,
    },

    /// Broadcast requested on a matrix that is not a single column.
    #[error("Cannot broadcast a matrix with {periods} periods: one column required")]
    NotColumn {
        /// Observed column count.
        periods: usize,
    },
}

/// A draws×periods matrix of raw or transformed model output.
///
/// # Examples
///
/// ```
/// use fanchart_core::matrix::DrawMatrix;
///
/// let m = DrawMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(m.n_draws(), 2);
/// assert_eq!(m.n_periods(), 2);
/// assert_eq!(m.column(1), vec![2.0, 4.0]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawMatrix {
    data: Vec<f64>,
    n_draws: usize,
    n_periods: usize,
}

impl DrawMatrix {
    /// Builds a matrix from per-draw rows, validating rectangularity.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let n_draws = rows.len();
        if n_draws == 0 {
            return Err(MatrixError::Empty);
        }
        let n_periods = rows[0].len();
        if n_periods == 0 {
            return Err(MatrixError::EmptyRow);
        }
        let mut data = Vec::with_capacity(n_draws * n_periods);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != n_periods {
                return Err(MatrixError::Ragged {
                    row: row_idx,
                    got: row.len(),
                    expected: n_periods,
                });
            }
            data.extend(row);
        }
        Ok(Self {
            data,
            n_draws,
            n_periods,
        })
    }

    /// Returns the number of draws (rows).
    #[inline]
    pub fn n_draws(&self) -> usize {
        self.n_draws
    }

    /// Returns the number of periods (columns).
    #[inline]
    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    /// Returns one draw's series.
    #[inline]
    pub fn row(&self, draw: usize) -> &[f64] {
        let start = draw * self.n_periods;
        &self.data[start..start + self.n_periods]
    }

    /// Iterates over draw rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.n_periods)
    }

    /// Collects one period's values across all draws.
    pub fn column(&self, period: usize) -> Vec<f64> {
        (0..self.n_draws)
            .map(|d| self.data[d * self.n_periods + period])
            .collect()
    }

    /// Per-period mean across the draws axis.
    pub fn period_means(&self) -> Vec<f64> {
        let mut means = vec![0.0; self.n_periods];
        for row in self.rows() {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        let n = self.n_draws as f64;
        for m in &mut means {
            *m /= n;
        }
        means
    }

    /// Broadcasts a draws×1 matrix across `n_periods` columns.
    ///
    /// Trend products store one value per draw; banding and per-capita
    /// transforms need it repeated over the full date axis. Fails with
    /// [`MatrixError::NotColumn`] if the matrix already has more than one
    /// column.
    pub fn broadcast_periods(&self, n_periods: usize) -> Result<Self, MatrixError> {
        if self.n_periods != 1 {
            return Err(MatrixError::NotColumn {
                periods: self.n_periods,
            });
        }
        let mut data = Vec::with_capacity(self.n_draws * n_periods);
        for d in 0..self.n_draws {
            let v = self.data[d];
            data.extend(std::iter::repeat(v).take(n_periods));
        }
        Ok(Self {
            data,
            n_draws: self.n_draws,
            n_periods,
        })
    }

    /// Applies an elementwise function, returning a new matrix.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            n_draws: self.n_draws,
            n_periods: self.n_periods,
        }
    }

    /// Builds a matrix of the same shape from a per-row computation.
    pub fn map_rows(&self, f: impl Fn(&[f64]) -> Vec<f64>) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        let mut n_periods = self.n_periods;
        for row in self.rows() {
            let out = f(row);
            n_periods = out.len();
            data.extend(out);
        }
        Self {
            data,
            n_draws: self.n_draws,
            n_periods,
        }
    }
}
