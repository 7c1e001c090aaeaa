use chrono::NaiveDate;
use covid_report::domain::{Measure, RegionDailySeries, WideCumulativeTable};
use covid_report::io::parse_wide_table;
use covid_report::series::{TimeSeriesPreparer, prepare};

const HEADER: &str = "UID,Admin2,Province_State,Lat,Long_,3/1/20,3/2/20,3/3/20,3/4/20,3/5/20,3/6/20";

fn csv(rows: &[&str]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out
}

fn load(measure: Measure, rows: &[&str]) -> WideCumulativeTable {
    parse_wide_table(csv(rows).as_bytes(), measure, "Province_State")
        .unwrap()
        .table
}

fn confirmed() -> WideCumulativeTable {
    load(
        Measure::Cases,
        &[
            "1,Albany,New York,42.6,-73.9,10,30,30,80,75,120",
            "2,Kings,New York,40.6,-73.9,5,5,25,25,60,90",
            "3,Franklin,Ohio,39.9,-83.0,100,200,300,400,500,600",
        ],
    )
}

fn deaths() -> WideCumulativeTable {
    load(
        Measure::Deaths,
        &[
            "1,Albany,New York,42.6,-73.9,0,1,1,2,2,4",
            "2,Kings,New York,40.6,-73.9,0,0,1,1,3,3",
            "3,Franklin,Ohio,39.9,-83.0,9,9,9,9,9,9",
        ],
    )
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, day).unwrap()
}

#[test]
fn dates_are_strictly_ascending_and_unique() {
    let series = prepare(&confirmed(), &deaths(), "New York");
    assert_eq!(series.len(), 5);
    assert!(series.rows.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(series.first_date(), Some(d(2)));
    assert_eq!(series.last_date(), Some(d(6)));
}

#[test]
fn daily_cases_reconcile_with_cumulative_totals() {
    let series = prepare(&confirmed(), &deaths(), "New York");
    // New York cumulative: 15 on 3/1, 210 on 3/6.
    let summed: i64 = series.rows.iter().map(|r| r.daily_cases).sum();
    assert_eq!(summed, 210 - 15);
    let summed_deaths: i64 = series.rows.iter().map(|r| r.daily_deaths).sum();
    assert_eq!(summed_deaths, 7);
}

#[test]
fn negative_deltas_pass_through() {
    let series = prepare(&confirmed(), &deaths(), "New York");
    // Albany revises down on 3/5 but the state aggregate still rises.
    assert!(series.rows.iter().all(|r| r.daily_cases >= 0));

    let c = load(Measure::Cases, &["1,Albany,Albany,0,0,10,30,30,80,75,120"]);
    let k = load(Measure::Deaths, &["1,Albany,Albany,0,0,0,1,1,2,2,4"]);
    let albany = prepare(&c, &k, "Albany");
    let revised = albany.rows.iter().find(|r| r.date == d(5)).unwrap();
    assert_eq!(revised.daily_cases, -5);
    assert_eq!(revised.ratio, Some(0.0 / -5.0));
}

#[test]
fn region_absent_from_either_table_is_empty() {
    assert!(prepare(&confirmed(), &deaths(), "Texas").is_empty());

    let deaths_without_ohio = load(Measure::Deaths, &["1,Albany,New York,42.6,-73.9,0,1,1,2,2,4"]);
    let series = prepare(&confirmed(), &deaths_without_ohio, "Ohio");
    assert_eq!(series, RegionDailySeries::empty("Ohio"));
}

#[test]
fn prepare_is_idempotent() {
    let (c, k) = (confirmed(), deaths());
    let first = prepare(&c, &k, "New York");
    let second = prepare(&c, &k, "New York");
    assert_eq!(first, second);
}

#[test]
fn ratio_defined_iff_cases_nonzero() {
    for region in ["New York", "Ohio"] {
        let series = prepare(&confirmed(), &deaths(), region);
        assert!(!series.is_empty());
        for row in &series.rows {
            match row.ratio {
                Some(r) => {
                    assert_ne!(row.daily_cases, 0);
                    assert_eq!(r, row.daily_deaths as f64 / row.daily_cases as f64);
                }
                None => assert_eq!(row.daily_cases, 0),
            }
        }
    }
}

#[test]
fn worked_example_from_csv() {
    let c = parse_wide_table(
        "Province_State,3/1/20,3/2/20,3/3/20,3/4/20\nX,100,150,150,200\n".as_bytes(),
        Measure::Cases,
        "Province_State",
    )
    .unwrap();
    let k = parse_wide_table(
        "Province_State,3/1/20,3/2/20,3/3/20,3/4/20\nX,1,2,2,5\n".as_bytes(),
        Measure::Deaths,
        "Province_State",
    )
    .unwrap();

    let series = prepare(&c.table, &k.table, "X");
    let got: Vec<(NaiveDate, i64, i64, Option<f64>)> = series
        .rows
        .iter()
        .map(|r| (r.date, r.daily_cases, r.daily_deaths, r.ratio))
        .collect();
    assert_eq!(
        got,
        vec![
            (d(2), 50, 1, Some(1.0 / 50.0)),
            (d(3), 0, 0, None),
            (d(4), 50, 3, Some(3.0 / 50.0)),
        ]
    );
}

#[test]
fn other_regions_never_leak_in() {
    let ohio = prepare(&confirmed(), &deaths(), "Ohio");
    assert!(ohio.rows.iter().all(|r| r.daily_cases == 100 && r.daily_deaths == 0));
    assert_eq!(ohio.region, "Ohio");
}

#[test]
fn date_only_in_cases_is_dropped() {
    let k = parse_wide_table(
        "Province_State,3/1/20,3/2/20,3/4/20,3/5/20,3/6/20\nOhio,9,9,9,9,9\n".as_bytes(),
        Measure::Deaths,
        "Province_State",
    )
    .unwrap();

    let series = prepare(&confirmed(), &k.table, "Ohio");
    let dates: Vec<NaiveDate> = series.rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![d(2), d(4), d(5), d(6)]);
    // 3/4 is differenced against 3/2.
    assert_eq!(series.rows[1].daily_cases, 200);
}

#[test]
fn custom_date_format_reads_prefixed_headers() {
    let c = parse_wide_table(
        "Province_State,X03.01.20,X03.02.20\nZ,4,9\n".as_bytes(),
        Measure::Cases,
        "Province_State",
    )
    .unwrap();
    let k = parse_wide_table(
        "Province_State,X03.01.20,X03.02.20\nZ,0,1\n".as_bytes(),
        Measure::Deaths,
        "Province_State",
    )
    .unwrap();

    let preparer = TimeSeriesPreparer::new("X%m.%d.%y");
    let series = preparer.prepare(&c.table, &k.table, "Z");
    assert_eq!(series.len(), 1);
    assert_eq!(series.rows[0].date, d(2));
    assert_eq!(series.rows[0].daily_cases, 5);

    // The default format sees no date columns at all.
    assert!(prepare(&c.table, &k.table, "Z").is_empty());
}
