//! Local polynomial regression (LOESS) with tricube weights.
//!
//! For each evaluation point `x0`:
//!
//! 1. take the `q = floor(n * span)` nearest observations,
//! 2. weight them with `(1 - (d / h)^3)^3`, where `h` is the distance to the
//!    furthest of the `q`,
//! 3. fit a weighted polynomial in `(x - x0)` and read off the intercept.
//!
//! No robustness iterations are performed.

use nalgebra::{DMatrix, DVector};

use crate::math::ols::solve_weighted_least_squares;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoessOptions {
    /// Fraction of points in each local window, in `(0, 1]`.
    pub span: f64,
    /// Local polynomial degree (1 or 2).
    pub degree: usize,
}

impl Default for LoessOptions {
    fn default() -> Self {
        Self { span: 0.75, degree: 2 }
    }
}

/// Evaluate the LOESS curve of `(xs, ys)` at each point of `at`.
///
/// Returns `None` for points where no local fit could be solved, and all
/// `None` when there are fewer than two observations.
pub fn loess(xs: &[f64], ys: &[f64], at: &[f64], opts: LoessOptions) -> Vec<Option<f64>> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return vec![None; at.len()];
    }
    let span = if opts.span.is_finite() && opts.span > 0.0 { opts.span.min(1.0) } else { 1.0 };
    let q = ((n as f64 * span).floor() as usize).clamp((opts.degree + 1).min(n), n);

    at.iter()
        .map(|&x0| local_fit(&xs[..n], &ys[..n], x0, q, opts.degree))
        .collect()
}

fn local_fit(xs: &[f64], ys: &[f64], x0: f64, q: usize, degree: usize) -> Option<f64> {
    let dist: Vec<f64> = xs.iter().map(|x| (x - x0).abs()).collect();
    let h = {
        let mut sorted = dist.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted[q - 1]
    };

    let weights: Vec<f64> = dist
        .iter()
        .map(|&d| {
            if h <= 0.0 {
                if d <= 0.0 { 1.0 } else { 0.0 }
            } else {
                tricube(d / h)
            }
        })
        .collect();

    // Drop to a lower degree when the window has too few distinct support points.
    let support = distinct_support(xs, &weights);
    let degree = degree.min(support.saturating_sub(1));

    let x = DMatrix::from_fn(xs.len(), degree + 1, |i, j| (xs[i] - x0).powi(j as i32));
    let y = DVector::from_column_slice(ys);
    let beta = solve_weighted_least_squares(&x, &y, &weights)?;
    Some(beta[0])
}

fn tricube(u: f64) -> f64 {
    if u >= 1.0 {
        0.0
    } else {
        let t = 1.0 - u * u * u;
        t * t * t
    }
}

fn distinct_support(xs: &[f64], weights: &[f64]) -> usize {
    let mut support: Vec<f64> = xs
        .iter()
        .zip(weights)
        .filter(|(_, w)| **w > 0.0)
        .map(|(x, _)| *x)
        .collect();
    support.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    support.dedup();
    support.len()
}
