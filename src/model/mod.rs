//! Minimal deterministic forecasting model: a linear trend over time plus
//! one coefficient per regressor, fitted by least squares.
//!
//! The rest of the crate treats this as an opaque capability — `fit` a
//! history, `predict` a point estimate for a date and a feature vector.
//! A small ridge term keeps the normal equations solvable when a regressor
//! is constant over the history (installed capacity usually is).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const RIDGE: f64 = 1e-8;
const PIVOT_EPS: f64 = 1e-12;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{rows} row(s) is fewer than the minimum {min}")]
    TooFewRows { rows: usize, min: usize },

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("normal equations are singular")]
    Singular,

    #[error("missing feature '{0}'")]
    MissingFeature(String),

    #[error("prediction for target '{0}' is not finite")]
    NonFinite(String),
}

/// A trained forecasting model for one target variable.
///
/// Immutable after `fit`. Coefficients are ordered
/// `[intercept, trend, regressors...]` with regressors in schema order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendModel {
    target: String,
    regressors: Vec<String>,
    origin: NaiveDate,
    coefficients: Vec<f64>,
}

impl TrendModel {
    /// Fit the model on one district's history.
    ///
    /// `dates` and `targets` must have equal length, as must every
    /// regressor column. `min_rows` is the training floor below which the
    /// history is rejected.
    pub fn fit(
        target: &str,
        dates: &[NaiveDate],
        targets: &[f64],
        regressors: &[(String, Vec<f64>)],
        min_rows: usize,
    ) -> Result<Self, ModelError> {
        let rows = dates.len();
        if rows < min_rows.max(2) {
            return Err(ModelError::TooFewRows {
                rows,
                min: min_rows.max(2),
            });
        }
        if targets.len() != rows {
            return Err(ModelError::Shape(format!(
                "{rows} dates but {} targets",
                targets.len()
            )));
        }
        for (name, column) in regressors {
            if column.len() != rows {
                return Err(ModelError::Shape(format!(
                    "regressor '{name}' has {} values for {rows} rows",
                    column.len()
                )));
            }
        }

        let origin = dates[0];
        let k = 2 + regressors.len();

        // Normal equations (X'X + ridge) b = X'y for the design matrix
        // rows [1, t, r1, r2, ...].
        let mut xtx = vec![vec![0.0; k]; k];
        let mut xty = vec![0.0; k];
        let mut row = vec![0.0; k];
        for i in 0..rows {
            row[0] = 1.0;
            row[1] = (dates[i] - origin).num_days() as f64;
            for (j, (_, column)) in regressors.iter().enumerate() {
                row[2 + j] = column[i];
            }
            for a in 0..k {
                for b in 0..k {
                    xtx[a][b] += row[a] * row[b];
                }
                xty[a] += row[a] * targets[i];
            }
        }
        for (j, diag_row) in xtx.iter_mut().enumerate() {
            diag_row[j] += RIDGE * diag_row[j].max(1.0);
        }

        let coefficients = solve(xtx, xty)?;

        Ok(Self {
            target: target.to_string(),
            regressors: regressors.iter().map(|(name, _)| name.clone()).collect(),
            origin,
            coefficients,
        })
    }

    /// Point estimate for `date` given one value per schema regressor.
    ///
    /// Every regressor named in the schema must appear in `features`;
    /// extra entries are ignored.
    pub fn predict(&self, date: NaiveDate, features: &[(&str, f64)]) -> Result<f64, ModelError> {
        let t = (date - self.origin).num_days() as f64;
        let mut estimate = self.coefficients[0] + self.coefficients[1] * t;
        for (j, name) in self.regressors.iter().enumerate() {
            let value = features
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| *v)
                .ok_or_else(|| ModelError::MissingFeature(name.clone()))?;
            estimate += self.coefficients[2 + j] * value;
        }
        if !estimate.is_finite() {
            return Err(ModelError::NonFinite(self.target.clone()));
        }
        Ok(estimate)
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Ordered regressor names the model was trained with.
    pub fn regressors(&self) -> &[String] {
        &self.regressors
    }
}

/// Gaussian elimination with partial pivoting; systems here are at most 4x4.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, ModelError> {
    let n = b.len();
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&x, &y| a[x][col].abs().partial_cmp(&a[y][col].abs()).unwrap())
            .unwrap();
        if a[pivot_row][col].abs() < PIVOT_EPS {
            return Err(ModelError::Singular);
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);
        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in row + 1..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}
