//! Cumulative → daily differencing and the deaths/cases ratio.

use chrono::NaiveDate;

use crate::domain::{CombinedObservation, DailyRow};

/// First-differenced counts. `None` means "no predecessor".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaRow {
    pub date: NaiveDate,
    pub daily_cases: Option<i64>,
    pub daily_deaths: Option<i64>,
}

/// A delta row with both counts defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCounts {
    pub date: NaiveDate,
    pub daily_cases: i64,
    pub daily_deaths: i64,
}

/// Difference each cumulative column against the previous row.
///
/// `rows` must already be sorted by date. Negative results (downward
/// revisions upstream) are kept as-is.
pub fn difference(rows: &[CombinedObservation]) -> Vec<DeltaRow> {
    let mut out = Vec::with_capacity(rows.len());
    let mut prev: Option<&CombinedObservation> = None;
    for row in rows {
        out.push(DeltaRow {
            date: row.date,
            daily_cases: prev.map(|p| row.cumulative_cases.saturating_sub(p.cumulative_cases)),
            daily_deaths: prev.map(|p| row.cumulative_deaths.saturating_sub(p.cumulative_deaths)),
        });
        prev = Some(row);
    }
    out
}

/// Remove rows where either delta is undefined.
pub fn drop_incomplete(rows: Vec<DeltaRow>) -> Vec<DailyCounts> {
    rows.into_iter()
        .filter_map(|r| {
            Some(DailyCounts {
                date: r.date,
                daily_cases: r.daily_cases?,
                daily_deaths: r.daily_deaths?,
            })
        })
        .collect()
}

/// `deaths / cases`, undefined when `cases == 0`.
pub fn ratio(daily_deaths: i64, daily_cases: i64) -> Option<f64> {
    if daily_cases == 0 {
        None
    } else {
        Some(daily_deaths as f64 / daily_cases as f64)
    }
}

pub fn derive_ratio(rows: Vec<DailyCounts>) -> Vec<DailyRow> {
    rows.into_iter()
        .map(|r| DailyRow {
            date: r.date,
            daily_cases: r.daily_cases,
            daily_deaths: r.daily_deaths,
            ratio: ratio(r.daily_deaths, r.daily_cases),
        })
        .collect()
}
