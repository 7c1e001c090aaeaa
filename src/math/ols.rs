//! Weighted least squares solver.
//!
//! Both the regression line and every local LOESS fit reduce to:
//!
//! ```text
//! minimize Σ w_i (y_i - x_i^T β)^2
//! ```
//!
//! We scale rows by `sqrt(w_i)` and solve the resulting ordinary least squares
//! problem with SVD, which handles tall design matrices and degrades gracefully
//! when columns are nearly collinear (e.g. a quadratic term over a narrow
//! window). Nalgebra's `QR::solve` only handles square systems.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() == 0 || x.nrows() != y.len() {
        return None;
    }
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Weighted variant: rows with weight `<= 0` drop out of the fit.
pub fn solve_weighted_least_squares(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    weights: &[f64],
) -> Option<DVector<f64>> {
    if weights.len() != x.nrows() {
        return None;
    }
    let mut xw = x.clone();
    let mut yw = y.clone();
    for (i, &w) in weights.iter().enumerate() {
        let s = if w.is_finite() && w > 0.0 { w.sqrt() } else { 0.0 };
        xw.row_mut(i).scale_mut(s);
        yw[i] *= s;
    }
    solve_least_squares(&xw, &yw)
}
