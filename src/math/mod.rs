//! Mathematical utilities: weighted least squares and LOESS smoothing.

pub mod loess;
pub mod ols;

pub use loess::*;
pub use ols::*;
