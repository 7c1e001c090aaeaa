//! Wide → long reshaping and per-(region, date) aggregation.

use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::domain::{LongObservation, WideCumulativeTable};

/// Per-(region, date) totals after collapsing sub-region rows.
///
/// Keys are ordered (region, then date), which keeps the join output
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedSeries {
    totals: BTreeMap<(String, NaiveDate), i64>,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn get(&self, region: &str, date: NaiveDate) -> Option<i64> {
        self.totals.get(&(region.to_string(), date)).copied()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&(String, NaiveDate), &i64)> {
        self.totals.iter()
    }

    pub(crate) fn get_key(&self, key: &(String, NaiveDate)) -> Option<i64> {
        self.totals.get(key).copied()
    }
}

/// Resolve which value columns are dates: `(column index, date)` pairs.
///
/// Columns whose name does not parse under `date_format` are left out.
pub fn parse_date_columns(columns: &[String], date_format: &str) -> Vec<(usize, NaiveDate)> {
    columns
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| {
            NaiveDate::parse_from_str(name.trim(), date_format)
                .ok()
                .map(|date| (idx, date))
        })
        .collect()
}

/// Un-pivot every date column into one `LongObservation` per row.
///
/// Records are produced lazily; a full national table has millions of cells and
/// only the aggregated totals are kept.
pub fn unpivot<'a>(
    table: &'a WideCumulativeTable,
    date_format: &str,
) -> impl Iterator<Item = LongObservation> + 'a {
    let date_columns: Rc<[(usize, NaiveDate)]> =
        parse_date_columns(&table.value_columns, date_format).into();

    table.rows.iter().flat_map(move |row| {
        let columns = Rc::clone(&date_columns);
        (0..columns.len()).map(move |i| {
            let (idx, date) = columns[i];
            LongObservation {
                region: row.region.clone(),
                date,
                value: row.cells.get(idx).copied().flatten(),
            }
        })
    })
}

/// Sum observations per (region, date). Missing values count as zero but
/// still create the key.
pub fn aggregate(observations: impl IntoIterator<Item = LongObservation>) -> AggregatedSeries {
    let mut totals: BTreeMap<(String, NaiveDate), i64> = BTreeMap::new();
    for obs in observations {
        let slot = totals.entry((obs.region, obs.date)).or_insert(0);
        *slot = slot.saturating_add(obs.value.unwrap_or(0));
    }
    AggregatedSeries { totals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_DATE_FORMAT, Measure};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, d).unwrap()
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn date_columns_skip_identifying_headers() {
        let cols = columns(&["Admin2", "Lat", "1/22/20", "Combined_Key", "1/23/20", "13/45/20"]);
        let parsed = parse_date_columns(&cols, DEFAULT_DATE_FORMAT);
        assert_eq!(parsed, vec![(2, date(1, 22)), (4, date(1, 23))]);
    }

    #[test]
    fn date_columns_honor_prefixed_format() {
        let cols = columns(&["UID", "X1.22.20", "X1.23.20", "1/24/20"]);
        let parsed = parse_date_columns(&cols, "X%m.%d.%y");
        assert_eq!(parsed, vec![(1, date(1, 22)), (2, date(1, 23))]);
    }

    #[test]
    fn unpivot_emits_one_record_per_row_and_date() {
        let mut table = WideCumulativeTable::new(Measure::Cases, columns(&["Admin2", "1/22/20", "1/23/20"]));
        table.push_row("X", vec![None, Some(1), Some(2)]);
        table.push_row("Y", vec![None, Some(5), None]);

        let long: Vec<LongObservation> = unpivot(&table, DEFAULT_DATE_FORMAT).collect();
        assert_eq!(long.len(), 4);
        assert_eq!(
            long[3],
            LongObservation {
                region: "Y".to_string(),
                date: date(1, 23),
                value: None,
            }
        );
    }

    #[test]
    fn aggregate_sums_sub_regions_and_treats_missing_as_zero() {
        let mut table = WideCumulativeTable::new(Measure::Cases, columns(&["1/22/20", "1/23/20"]));
        table.push_row("X", vec![Some(3), Some(4)]);
        table.push_row("X", vec![Some(10), None]);
        table.push_row("Y", vec![None, None]);

        let agg = aggregate(unpivot(&table, DEFAULT_DATE_FORMAT));
        assert_eq!(agg.len(), 4);
        assert_eq!(agg.get("X", date(1, 22)), Some(13));
        assert_eq!(agg.get("X", date(1, 23)), Some(4));
        assert_eq!(agg.get("Y", date(1, 22)), Some(0));
        assert_eq!(agg.get("Z", date(1, 22)), None);
    }
}
