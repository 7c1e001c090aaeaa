//! Smoothed deaths/cases ratio over time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::RegionDailySeries;
use crate::math::{LoessOptions, loess};

/// Minimum defined ratios before a smoothed curve is produced.
pub const MIN_SMOOTH_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothPoint {
    pub date: NaiveDate,
    pub ratio: f64,
}

/// LOESS of ratio against day index, evaluated at every date with a defined
/// ratio. Rows with an undefined ratio are left out of the fit, never read as
/// zero.
pub fn smooth_ratio(series: &RegionDailySeries, opts: LoessOptions) -> Vec<SmoothPoint> {
    let Some(origin) = series.first_date() else {
        return Vec::new();
    };

    let defined: Vec<(NaiveDate, f64)> = series
        .rows
        .iter()
        .filter_map(|r| r.ratio.filter(|v| v.is_finite()).map(|v| (r.date, v)))
        .collect();
    if defined.len() < MIN_SMOOTH_POINTS {
        return Vec::new();
    }

    let xs: Vec<f64> = defined
        .iter()
        .map(|(d, _)| (*d - origin).num_days() as f64)
        .collect();
    let ys: Vec<f64> = defined.iter().map(|(_, v)| *v).collect();

    loess(&xs, &ys, &xs, opts)
        .into_iter()
        .zip(&defined)
        .filter_map(|(fit, (date, _))| fit.map(|ratio| SmoothPoint { date: *date, ratio }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyRow;

    fn row(day: u32, cases: i64, deaths: i64) -> DailyRow {
        DailyRow {
            date: NaiveDate::from_ymd_opt(2020, 6, day).unwrap(),
            daily_cases: cases,
            daily_deaths: deaths,
            ratio: crate::series::ratio(deaths, cases),
        }
    }

    #[test]
    fn constant_ratio_smooths_to_itself() {
        let rows = (1..=10).map(|d| row(d, 100, 5)).collect();
        let series = RegionDailySeries { region: "X".into(), rows };
        let curve = smooth_ratio(&series, LoessOptions::default());
        assert_eq!(curve.len(), 10);
        assert!(curve.iter().all(|p| (p.ratio - 0.05).abs() < 1e-9));
    }

    #[test]
    fn undefined_ratios_are_gaps() {
        let mut rows: Vec<DailyRow> = (1..=8).map(|d| row(d, 50, 1)).collect();
        rows[3] = row(4, 0, 2);
        let series = RegionDailySeries { region: "X".into(), rows };

        let curve = smooth_ratio(&series, LoessOptions::default());
        assert_eq!(curve.len(), 7);
        assert!(curve.iter().all(|p| p.date != NaiveDate::from_ymd_opt(2020, 6, 4).unwrap()));
        assert!(curve.iter().all(|p| (p.ratio - 0.02).abs() < 1e-9));
    }

    #[test]
    fn short_series_has_no_curve() {
        let series = RegionDailySeries { region: "X".into(), rows: vec![row(1, 10, 1), row(2, 0, 0), row(3, 5, 1)] };
        assert!(smooth_ratio(&series, LoessOptions::default()).is_empty());
        assert!(smooth_ratio(&RegionDailySeries::empty("X"), LoessOptions::default()).is_empty());
    }
}
