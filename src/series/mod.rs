//! Cumulative wide tables → one region's daily series.
//!
//! The preparer is a straight chain of pure stages, each consuming the
//! previous stage's output:
//!
//! 1. `melt::unpivot` (wide → long, date columns only)
//! 2. `melt::aggregate` (sum per region + date)
//! 3. `combine::inner_join` (cases ⋈ deaths)
//! 4. `combine::filter_region`
//! 5. `combine::sort_by_date`
//! 6. `daily::difference`
//! 7. `daily::drop_incomplete`
//! 8. `daily::derive_ratio`

pub mod combine;
pub mod daily;
pub mod melt;

use tracing::{debug, info, warn};

use crate::domain::{DEFAULT_DATE_FORMAT, RegionDailySeries, WideCumulativeTable};

pub use combine::{filter_region, inner_join, sort_by_date};
pub use daily::{DailyCounts, DeltaRow, derive_ratio, difference, drop_incomplete, ratio};
pub use melt::{AggregatedSeries, aggregate, parse_date_columns, unpivot};

/// Turns the two cumulative tables into a `RegionDailySeries`.
#[derive(Debug, Clone)]
pub struct TimeSeriesPreparer {
    date_format: String,
}

impl Default for TimeSeriesPreparer {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl TimeSeriesPreparer {
    /// `date_format` is a `chrono` format string matched against column names.
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Run the full chain for `region`.
    ///
    /// An unknown region, or one with no dates shared by both tables, yields an
    /// empty series rather than an error.
    pub fn prepare(
        &self,
        confirmed: &WideCumulativeTable,
        deaths: &WideCumulativeTable,
        region: &str,
    ) -> RegionDailySeries {
        let cases = aggregate(unpivot(confirmed, &self.date_format));
        let deaths = aggregate(unpivot(deaths, &self.date_format));
        debug!(
            case_keys = cases.len(),
            death_keys = deaths.len(),
            "aggregated cumulative series"
        );

        let joined = inner_join(&cases, &deaths);
        let dropped = cases.len().max(deaths.len()) - joined.len();
        if dropped > 0 {
            debug!(dropped, "inner join dropped region/date keys missing from one series");
        }

        let regional = sort_by_date(filter_region(joined, region));
        if regional.is_empty() {
            warn!(region, "region has no dates present in both tables");
            return RegionDailySeries::empty(region);
        }

        let rows = derive_ratio(drop_incomplete(difference(&regional)));

        let negative = rows
            .iter()
            .filter(|r| r.daily_cases < 0 || r.daily_deaths < 0)
            .count();
        if negative > 0 {
            warn!(region, negative, "downward revisions produced negative daily counts");
        }

        info!(region, days = rows.len(), "prepared daily series");
        RegionDailySeries {
            region: region.to_string(),
            rows,
        }
    }
}

/// `TimeSeriesPreparer::default().prepare(..)`.
pub fn prepare(
    confirmed: &WideCumulativeTable,
    deaths: &WideCumulativeTable,
    region: &str,
) -> RegionDailySeries {
    TimeSeriesPreparer::default().prepare(confirmed, deaths, region)
}
