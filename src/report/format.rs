//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline and analysis code stays clean and testable
//! - output changes are localized

use crate::analysis::{Analysis, LinearFit, Peak};
use crate::domain::{DailyRow, RegionDailySeries};

/// Format the run summary (span, totals, peaks, regression).
pub fn format_summary(series: &RegionDailySeries, analysis: &Analysis) -> String {
    let s = &analysis.summary;
    let mut out = String::new();

    out.push_str("=== covid-report - daily cases and deaths ===\n");
    out.push_str(&format!("Region: {}\n", series.region));

    let (Some(first), Some(last)) = (s.first_date, s.last_date) else {
        out.push_str("No dates are present in both tables for this region.\n");
        return out;
    };

    out.push_str(&format!("Span: {first} .. {last} ({} days)\n", s.days));
    out.push_str(&format!(
        "Totals: cases={} | deaths={} | deaths/cases={}\n",
        s.total_cases,
        s.total_deaths,
        fmt_ratio(s.overall_ratio)
    ));
    out.push_str(&format!(
        "Peaks: cases={} | deaths={}\n",
        fmt_peak(s.peak_cases),
        fmt_peak(s.peak_deaths)
    ));
    if s.negative_days > 0 {
        out.push_str(&format!(
            "Revisions: {} day(s) with negative deltas (kept as reported)\n",
            s.negative_days
        ));
    }
    out.push_str(&format!("Undefined ratio (zero cases): {} day(s)\n", s.undefined_ratios));

    out.push_str("\nRegression (daily deaths ~ daily cases):\n");
    out.push_str(&format!("- {}\n", fmt_fit(analysis.regression.as_ref())));
    out.push_str(&format!(
        "- smoothed ratio: {} point(s)\n",
        analysis.smoothed_ratio.len()
    ));
    out.push('\n');

    out
}

/// Format the trailing `tail` rows of the series as a table (`0` = all rows).
pub fn format_table(series: &RegionDailySeries, tail: usize) -> String {
    let rows: &[DailyRow] = if tail == 0 || tail >= series.rows.len() {
        &series.rows
    } else {
        &series.rows[series.rows.len() - tail..]
    };

    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:>12} {:>12} {:>10}\n",
        "date", "daily_cases", "daily_deaths", "ratio"
    ));
    out.push_str(&format!("{:-<10} {:-<12} {:-<12} {:-<10}\n", "", "", "", ""));

    for r in rows {
        out.push_str(&format!(
            "{:<10} {:>12} {:>12} {:>10}\n",
            r.date.format("%Y-%m-%d"),
            r.daily_cases,
            r.daily_deaths,
            fmt_ratio(r.ratio)
        ));
    }

    out
}

pub fn fmt_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(v) if v.is_finite() => format!("{v:.4}"),
        _ => "-".to_string(),
    }
}

pub fn fmt_fit(fit: Option<&LinearFit>) -> String {
    match fit {
        Some(f) => format!(
            "deaths = {:.4} + {:.6} * cases | R²={:.4} | n={}",
            f.intercept, f.slope, f.r_squared, f.n
        ),
        None => "not enough data".to_string(),
    }
}

fn fmt_peak(peak: Option<Peak>) -> String {
    match peak {
        Some(p) => format!("{} on {}", p.value, p.date),
        None => "-".to_string(),
    }
}
