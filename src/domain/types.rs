//! Shared domain types.
//!
//! The pipeline moves through these types in order:
//!
//! `WideCumulativeTable` → `LongObservation` → `CombinedObservation` → `RegionDailySeries`
//!
//! Every stage returns a fresh value; nothing is mutated after construction.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column-name convention of the JHU CSSE time-series tables (`1/22/20`).
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%y";

/// Region label column of the US time-series tables.
pub const DEFAULT_REGION_COLUMN: &str = "Province_State";

pub const DEFAULT_REGION: &str = "New York";

/// Which cumulative count a table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Cases,
    Deaths,
}

impl Measure {
    pub fn display_name(self) -> &'static str {
        match self {
            Measure::Cases => "confirmed cases",
            Measure::Deaths => "deaths",
        }
    }
}

/// One row per (region, sub-region), one value column per header.
///
/// `value_columns` holds every header except the region column. Identifying
/// columns (county names, coordinates, ...) stay in the table; they are dropped
/// at unpivot time because their names don't parse as dates.
#[derive(Debug, Clone, PartialEq)]
pub struct WideCumulativeTable {
    pub measure: Measure,
    pub value_columns: Vec<String>,
    pub rows: Vec<WideRow>,
}

/// A single wide row. `cells[i]` belongs to `value_columns[i]`; `None` marks an
/// empty or non-integer cell.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub region: String,
    pub cells: Vec<Option<i64>>,
}

impl WideCumulativeTable {
    pub fn new(measure: Measure, value_columns: Vec<String>) -> Self {
        Self {
            measure,
            value_columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating `cells` to the column count.
    pub fn push_row(&mut self, region: impl Into<String>, mut cells: Vec<Option<i64>>) {
        cells.resize(self.value_columns.len(), None);
        self.rows.push(WideRow {
            region: region.into(),
            cells,
        });
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.rows.iter().any(|r| r.region == region)
    }
}

/// Long-format record produced by un-pivoting a wide table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongObservation {
    pub region: String,
    pub date: NaiveDate,
    pub value: Option<i64>,
}

/// Cumulative cases and deaths for a (region, date) key observed in both tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedObservation {
    pub region: String,
    pub date: NaiveDate,
    pub cumulative_cases: i64,
    pub cumulative_deaths: i64,
}

/// Daily (first-differenced) counts for one date.
///
/// Deltas may be negative when the upstream cumulative count was revised
/// downward; they are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub daily_cases: i64,
    pub daily_deaths: i64,
    /// `daily_deaths / daily_cases`; `None` when `daily_cases == 0`.
    pub ratio: Option<f64>,
}

/// Date-ordered daily series for exactly one region.
///
/// Rows are strictly ascending by date. May be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDailySeries {
    pub region: String,
    pub rows: Vec<DailyRow>,
}

impl RegionDailySeries {
    pub fn empty(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}

/// Where a source table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    File(PathBuf),
}

impl SourceLocation {
    /// `http://` / `https://` prefixes are URLs; anything else is a local path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceLocation::Url(raw.to_string())
        } else {
            SourceLocation::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Url(url) => write!(f, "{url}"),
            SourceLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub region: String,
    pub confirmed: SourceLocation,
    pub deaths: SourceLocation,
    pub region_column: String,
    pub date_format: String,

    pub out_dir: PathBuf,
    pub charts: bool,
    pub chart_width: u32,
    pub chart_height: u32,

    /// Trailing rows shown in the terminal table.
    pub tail: usize,
    /// LOESS span (fraction of points in each local window).
    pub span: f64,

    pub export_series: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_location_detects_urls() {
        assert_eq!(
            SourceLocation::parse("https://example.org/a.csv"),
            SourceLocation::Url("https://example.org/a.csv".to_string())
        );
        assert_eq!(
            SourceLocation::parse(" HTTP://example.org/a.csv "),
            SourceLocation::Url("HTTP://example.org/a.csv".to_string())
        );
        assert_eq!(
            SourceLocation::parse("data/confirmed.csv"),
            SourceLocation::File(PathBuf::from("data/confirmed.csv"))
        );
    }

    #[test]
    fn push_row_pads_short_rows() {
        let mut table = WideCumulativeTable::new(
            Measure::Cases,
            vec!["1/22/20".to_string(), "1/23/20".to_string()],
        );
        table.push_row("X", vec![Some(1)]);
        table.push_row("Y", vec![Some(1), Some(2), Some(3)]);

        assert_eq!(table.rows[0].cells, vec![Some(1), None]);
        assert_eq!(table.rows[1].cells, vec![Some(1), Some(2)]);
        assert!(table.contains_region("Y"));
        assert!(!table.contains_region("Z"));
    }
}
