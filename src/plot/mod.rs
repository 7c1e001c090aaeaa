//! Chart rendering.

pub mod svg;

pub use svg::{ChartKind, ChartSize, RenderedChart, render_charts};
