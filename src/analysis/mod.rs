//! Analysis over a prepared daily series.
//!
//! - summary statistics (`SeriesSummary`)
//! - deaths-on-cases regression (`regression`)
//! - smoothed ratio curve (`smooth`)
//!
//! Every function accepts an empty series and reports "nothing to show"
//! rather than failing.

pub mod regression;
pub mod smooth;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{DailyRow, RegionDailySeries};
use crate::math::LoessOptions;

pub use regression::{LinearFit, fit_deaths_on_cases};
pub use smooth::{SmoothPoint, smooth_ratio};

/// Largest daily value and when it happened (first occurrence wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peak {
    pub date: NaiveDate,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub region: String,
    pub days: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub total_cases: i64,
    pub total_deaths: i64,
    pub peak_cases: Option<Peak>,
    pub peak_deaths: Option<Peak>,
    /// Rows where either delta is negative (downward revisions upstream).
    pub negative_days: usize,
    /// Rows where `daily_cases == 0`.
    pub undefined_ratios: usize,
    /// `total_deaths / total_cases`, undefined when `total_cases == 0`.
    pub overall_ratio: Option<f64>,
}

pub fn summarize(series: &RegionDailySeries) -> SeriesSummary {
    let total_cases = series.rows.iter().map(|r| r.daily_cases).sum();
    let total_deaths = series.rows.iter().map(|r| r.daily_deaths).sum();

    SeriesSummary {
        region: series.region.clone(),
        days: series.len(),
        first_date: series.first_date(),
        last_date: series.last_date(),
        total_cases,
        total_deaths,
        peak_cases: peak(&series.rows, |r| r.daily_cases),
        peak_deaths: peak(&series.rows, |r| r.daily_deaths),
        negative_days: series
            .rows
            .iter()
            .filter(|r| r.daily_cases < 0 || r.daily_deaths < 0)
            .count(),
        undefined_ratios: series.rows.iter().filter(|r| r.ratio.is_none()).count(),
        overall_ratio: crate::series::ratio(total_deaths, total_cases),
    }
}

fn peak(rows: &[DailyRow], value: impl Fn(&DailyRow) -> i64) -> Option<Peak> {
    let mut best: Option<Peak> = None;
    for row in rows {
        let v = value(row);
        if best.is_none_or(|b| v > b.value) {
            best = Some(Peak { date: row.date, value: v });
        }
    }
    best
}

/// Everything computed on top of the daily series for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: SeriesSummary,
    pub regression: Option<LinearFit>,
    pub smoothed_ratio: Vec<SmoothPoint>,
}

pub fn analyze(series: &RegionDailySeries, loess: LoessOptions) -> Analysis {
    let summary = summarize(series);
    let regression = fit_deaths_on_cases(series);
    let smoothed_ratio = smooth_ratio(series, loess);

    info!(
        region = %series.region,
        days = summary.days,
        regression = regression.is_some(),
        smoothed_points = smoothed_ratio.len(),
        "analysis complete"
    );

    Analysis {
        summary,
        regression,
        smoothed_ratio,
    }
}
