//! Ordinary least squares of daily deaths on daily cases.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::domain::RegionDailySeries;
use crate::math::solve_least_squares;

/// Minimum rows before a regression line is reported.
pub const MIN_REGRESSION_ROWS: usize = 3;

/// `deaths ≈ intercept + slope * cases`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit daily deaths against daily cases.
///
/// Returns `None` with fewer than `MIN_REGRESSION_ROWS` rows or when daily
/// cases are constant (the slope is unidentified).
pub fn fit_deaths_on_cases(series: &RegionDailySeries) -> Option<LinearFit> {
    let xs: Vec<f64> = series.rows.iter().map(|r| r.daily_cases as f64).collect();
    let ys: Vec<f64> = series.rows.iter().map(|r| r.daily_deaths as f64).collect();
    fit_line(&xs, &ys)
}

pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len();
    if n < MIN_REGRESSION_ROWS || ys.len() != n {
        return None;
    }

    let x_mean = xs.iter().sum::<f64>() / n as f64;
    let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
    if sxx <= f64::EPSILON * n as f64 * x_mean.abs().max(1.0) {
        return None;
    }

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { xs[i] });
    let y = DVector::from_column_slice(ys);
    let beta = solve_least_squares(&design, &y)?;

    let fit = LinearFit {
        intercept: beta[0],
        slope: beta[1],
        r_squared: 0.0,
        n,
    };

    let y_mean = ys.iter().sum::<f64>() / n as f64;
    let sst: f64 = ys.iter().map(|y| (y - y_mean).powi(2)).sum();
    let sse: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - fit.predict(*x)).powi(2))
        .sum();
    // A flat response is fit perfectly by a flat line.
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };

    Some(LinearFit { r_squared, ..fit })
}
