//! Linear regression of monthly consumption on temperature and cyclical
//! month features.
//!
//! The fit uses exact ordinary least squares over a seeded random 80/20
//! train/held-out split. Held-out RMSE is reported for diagnostics only;
//! no accuracy threshold is enforced.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::HistoricalTrainingRow;
use crate::pipeline::PipelineError;

/// Intercept plus (temperature, month_sin, month_cos).
const PARAMETER_COUNT: usize = 4;

/// Train/held-out split parameters. Identical rows and identical seed always
/// produce the identical split, and therefore identical coefficients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    pub train_ratio: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_ratio: 0.8,
            seed: 42,
        }
    }
}

/// Fitted regression; immutable after `fit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedLoadRegression {
    /// Weights for (temperature, month_sin, month_cos)
    coefficients: Vec<f64>,
    intercept: f64,
    /// RMSE over the held-out subset; `None` when the split left no held-out rows
    holdout_rmse: Option<f64>,
    training_rows: usize,
}

impl FittedLoadRegression {
    /// Fit ordinary least squares of mean consumption on the three input
    /// features plus an intercept.
    pub fn fit(
        rows: &[HistoricalTrainingRow],
        split: &SplitConfig,
    ) -> Result<Self, PipelineError> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        let mut rng = StdRng::seed_from_u64(split.seed);
        indices.shuffle(&mut rng);

        let train_len =
            ((rows.len() as f64 * split.train_ratio).floor() as usize).min(rows.len());
        if train_len < PARAMETER_COUNT {
            return Err(PipelineError::DegenerateTraining {
                rows: train_len,
                parameters: PARAMETER_COUNT,
            });
        }
        let (train_idx, holdout_idx) = indices.split_at(train_len);

        // Normal equations over the training subset
        let mut xtx = vec![vec![0.0; PARAMETER_COUNT]; PARAMETER_COUNT];
        let mut xty = vec![0.0; PARAMETER_COUNT];
        for &i in train_idx {
            let x = design_vector(&rows[i]);
            for a in 0..PARAMETER_COUNT {
                for b in 0..PARAMETER_COUNT {
                    xtx[a][b] += x[a] * x[b];
                }
                xty[a] += x[a] * rows[i].mean_consumption_mwh;
            }
        }

        let beta = solve_normal_equations(xtx, xty);
        let mut model = Self {
            coefficients: beta[1..].to_vec(),
            intercept: beta[0],
            holdout_rmse: None,
            training_rows: train_len,
        };

        let holdout: Vec<HistoricalTrainingRow> =
            holdout_idx.iter().map(|&i| rows[i].clone()).collect();
        model.holdout_rmse = model.rmse(&holdout);

        Ok(model)
    }

    /// Predict consumption from a (temperature, month_sin, month_cos) vector.
    pub fn predict(&self, features: &[f64]) -> Result<f64, PipelineError> {
        if features.len() != self.coefficients.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.coefficients.iter())
            .map(|(f, c)| f * c)
            .sum::<f64>()
            + self.intercept)
    }

    /// Root mean squared error over a set of rows; `None` for an empty set.
    pub fn rmse(&self, rows: &[HistoricalTrainingRow]) -> Option<f64> {
        if rows.is_empty() {
            return None;
        }
        let mse = rows
            .iter()
            .map(|row| {
                let x = design_vector(row);
                let predicted = self.intercept
                    + x[1..]
                        .iter()
                        .zip(self.coefficients.iter())
                        .map(|(f, c)| f * c)
                        .sum::<f64>();
                (predicted - row.mean_consumption_mwh).powi(2)
            })
            .sum::<f64>()
            / rows.len() as f64;
        Some(mse.sqrt())
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn holdout_rmse(&self) -> Option<f64> {
        self.holdout_rmse
    }

    pub fn training_rows(&self) -> usize {
        self.training_rows
    }
}

fn design_vector(row: &HistoricalTrainingRow) -> [f64; PARAMETER_COUNT] {
    [1.0, row.avg_temperature_f, row.month_sin, row.month_cos]
}

/// Solve `XtX b = Xty` by Gaussian elimination with partial pivoting.
///
/// The system is rank deficient by construction: the two cyclical features
/// are identical (see `features::encode_month`), so one column of the design
/// matrix is redundant. A vanishing pivot leaves that coefficient at zero,
/// which does not change the fitted values.
fn solve_normal_equations(mut xtx: Vec<Vec<f64>>, mut xty: Vec<f64>) -> Vec<f64> {
    let n = xty.len();
    let scale = xtx
        .iter()
        .flatten()
        .fold(0.0f64, |acc, v| acc.max(v.abs()))
        .max(1.0);
    let eps = scale * 1e-12;

    let mut solution = vec![0.0; n];
    let mut pivots: Vec<(usize, usize)> = Vec::new();
    let mut row = 0;

    for col in 0..n {
        if row == n {
            break;
        }
        let best = (row..n)
            .max_by(|&a, &b| {
                xtx[a][col]
                    .abs()
                    .partial_cmp(&xtx[b][col].abs())
                    .unwrap_or(Ordering::Equal)
            })
            .unwrap_or(row);
        if xtx[best][col].abs() <= eps {
            continue;
        }
        xtx.swap(row, best);
        xty.swap(row, best);

        let pivot_row = xtx[row].clone();
        let pivot_rhs = xty[row];
        for r in row + 1..n {
            let factor = xtx[r][col] / pivot_row[col];
            if factor != 0.0 {
                for c in col..n {
                    xtx[r][c] -= factor * pivot_row[c];
                }
                xty[r] -= factor * pivot_rhs;
            }
        }
        pivots.push((row, col));
        row += 1;
    }

    for &(r, c) in pivots.iter().rev() {
        let mut value = xty[r];
        for cc in c + 1..n {
            value -= xtx[r][cc] * solution[cc];
        }
        solution[c] = value / xtx[r][c];
    }

    solution
}
