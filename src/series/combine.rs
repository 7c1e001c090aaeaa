//! Joining the case and death series and narrowing to one region.

use crate::domain::CombinedObservation;
use crate::series::melt::AggregatedSeries;

/// Inner join on (region, date).
///
/// Keys present in only one series are dropped. Output is ordered by region,
/// then date.
pub fn inner_join(cases: &AggregatedSeries, deaths: &AggregatedSeries) -> Vec<CombinedObservation> {
    cases
        .entries()
        .filter_map(|(key, &cumulative_cases)| {
            let cumulative_deaths = deaths.get_key(key)?;
            Some(CombinedObservation {
                region: key.0.clone(),
                date: key.1,
                cumulative_cases,
                cumulative_deaths,
            })
        })
        .collect()
}

/// Keep rows whose region equals `region` exactly (case-sensitive).
pub fn filter_region(rows: Vec<CombinedObservation>, region: &str) -> Vec<CombinedObservation> {
    rows.into_iter().filter(|r| r.region == region).collect()
}

pub fn sort_by_date(mut rows: Vec<CombinedObservation>) -> Vec<CombinedObservation> {
    rows.sort_by_key(|r| r.date);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LongObservation;
    use crate::series::melt::aggregate;
    use chrono::NaiveDate;

    fn obs(region: &str, day: u32, value: i64) -> LongObservation {
        LongObservation {
            region: region.to_string(),
            date: NaiveDate::from_ymd_opt(2020, 3, day).unwrap(),
            value: Some(value),
        }
    }

    #[test]
    fn join_keeps_only_keys_in_both_series() {
        let cases = aggregate(vec![obs("X", 1, 10), obs("X", 2, 20), obs("X", 3, 30)]);
        let deaths = aggregate(vec![obs("X", 1, 1), obs("X", 3, 3), obs("X", 4, 4)]);

        let joined = inner_join(&cases, &deaths);
        let days: Vec<u32> = joined.iter().map(|r| chrono::Datelike::day(&r.date)).collect();
        assert_eq!(days, vec![1, 3]);
        assert_eq!(joined[1].cumulative_cases, 30);
        assert_eq!(joined[1].cumulative_deaths, 3);
    }

    #[test]
    fn join_matches_region_as_well_as_date() {
        let cases = aggregate(vec![obs("X", 1, 10)]);
        let deaths = aggregate(vec![obs("Y", 1, 1)]);
        assert!(inner_join(&cases, &deaths).is_empty());
    }

    #[test]
    fn filter_is_exact_and_case_sensitive() {
        let cases = aggregate(vec![obs("New York", 1, 10), obs("new york", 1, 7)]);
        let deaths = aggregate(vec![obs("New York", 1, 1), obs("new york", 1, 0)]);

        let rows = filter_region(inner_join(&cases, &deaths), "New York");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cumulative_cases, 10);

        let rows = filter_region(inner_join(&cases, &deaths), "New");
        assert!(rows.is_empty());
    }

    #[test]
    fn sort_orders_by_date() {
        let d = |day| NaiveDate::from_ymd_opt(2020, 3, day).unwrap();
        let rows = vec![
            CombinedObservation { region: "X".into(), date: d(3), cumulative_cases: 3, cumulative_deaths: 0 },
            CombinedObservation { region: "X".into(), date: d(1), cumulative_cases: 1, cumulative_deaths: 0 },
        ];
        let sorted = sort_by_date(rows);
        assert_eq!(sorted[0].date, d(1));
        assert_eq!(sorted[1].date, d(3));
    }
}
