//! Markdown report document.
//!
//! The document is the artifact of a full run: run metadata, summary,
//! regression, links to the rendered charts and the full daily table.

use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::analysis::Analysis;
use crate::domain::{RegionDailySeries, ReportConfig};
use crate::error::AppError;
use crate::plot::RenderedChart;
use crate::report::format::{fmt_fit, fmt_ratio};

pub const REPORT_FILE: &str = "report.md";

pub fn write_report_markdown(
    config: &ReportConfig,
    series: &RegionDailySeries,
    analysis: &Analysis,
    charts: &[RenderedChart],
) -> Result<PathBuf, AppError> {
    create_dir_all(&config.out_dir).map_err(|e| {
        AppError::input(format!(
            "Failed to create output dir '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    let path = config.out_dir.join(REPORT_FILE);
    let file = File::create(&path)
        .map_err(|e| AppError::input(format!("Failed to create report '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    render(&mut out, config, series, analysis, charts, &config.out_dir)
        .and_then(|_| out.flush())
        .map_err(|e| AppError::input(format!("Failed to write report '{}': {e}", path.display())))?;

    Ok(path)
}

fn render(
    out: &mut impl Write,
    config: &ReportConfig,
    series: &RegionDailySeries,
    analysis: &Analysis,
    charts: &[RenderedChart],
    out_dir: &Path,
) -> std::io::Result<()> {
    let s = &analysis.summary;

    writeln!(out, "# Daily COVID-19 cases and deaths: {}", series.region)?;
    writeln!(out)?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(out, "- confirmed source: {}", config.confirmed)?;
    writeln!(out, "- deaths source: {}", config.deaths)?;
    writeln!(out, "- region column: `{}`", config.region_column)?;
    writeln!(out, "- date column format: `{}`", config.date_format)?;

    writeln!(out, "\n## Summary")?;
    match (s.first_date, s.last_date) {
        (Some(first), Some(last)) => {
            writeln!(out, "| field | value |")?;
            writeln!(out, "| - | - |")?;
            writeln!(out, "| span | {first} .. {last} |")?;
            writeln!(out, "| days | {} |", s.days)?;
            writeln!(out, "| total cases | {} |", s.total_cases)?;
            writeln!(out, "| total deaths | {} |", s.total_deaths)?;
            writeln!(out, "| deaths / cases | {} |", fmt_ratio(s.overall_ratio))?;
            if let Some(p) = s.peak_cases {
                writeln!(out, "| peak daily cases | {} ({}) |", p.value, p.date)?;
            }
            if let Some(p) = s.peak_deaths {
                writeln!(out, "| peak daily deaths | {} ({}) |", p.value, p.date)?;
            }
            writeln!(out, "| days with negative deltas | {} |", s.negative_days)?;
            writeln!(out, "| days with undefined ratio | {} |", s.undefined_ratios)?;
        }
        _ => {
            writeln!(out, "No dates are present in both tables for this region.")?;
        }
    }

    writeln!(out, "\n## Regression")?;
    writeln!(out, "Daily deaths against daily cases, ordinary least squares:")?;
    writeln!(out)?;
    writeln!(out, "    {}", fmt_fit(analysis.regression.as_ref()))?;

    if !charts.is_empty() {
        writeln!(out, "\n## Charts")?;
        for chart in charts {
            let link = chart.path.strip_prefix(out_dir).unwrap_or(chart.path.as_path());
            writeln!(out, "\n![{}]({})", chart.kind.title(), link.display())?;
        }
    }

    if !series.is_empty() {
        writeln!(out, "\n## Daily series")?;
        writeln!(out, "| date | daily cases | daily deaths | ratio |")?;
        writeln!(out, "| - | - | - | - |")?;
        for r in &series.rows {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                r.date,
                r.daily_cases,
                r.daily_deaths,
                fmt_ratio(r.ratio)
            )?;
        }
    }

    Ok(())
}
