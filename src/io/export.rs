//! Export the daily series to CSV and the analysis to JSON.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::analysis::Analysis;
use crate::domain::RegionDailySeries;
use crate::error::AppError;

#[derive(Serialize)]
struct SeriesCsvRow {
    date: String,
    daily_cases: i64,
    daily_deaths: i64,
    /// Empty cell when undefined.
    ratio: Option<f64>,
}

/// Write `date,daily_cases,daily_deaths,ratio` rows.
pub fn write_series_csv(path: &Path, series: &RegionDailySeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    if series.is_empty() {
        // serde-driven headers are only emitted with the first record.
        writer
            .write_record(["date", "daily_cases", "daily_deaths", "ratio"])
            .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;
    }

    for r in &series.rows {
        writer
            .serialize(SeriesCsvRow {
                date: r.date.format("%Y-%m-%d").to_string(),
                daily_cases: r.daily_cases,
                daily_deaths: r.daily_deaths,
                ratio: r.ratio,
            })
            .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV '{}': {e}", path.display())))?;
    Ok(())
}

/// Write the analysis (summary, regression, smoothed ratio) as pretty JSON.
pub fn write_summary_json(path: &Path, analysis: &Analysis) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create summary JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, analysis)
        .map_err(|e| AppError::input(format!("Failed to write summary JSON: {e}")))?;
    Ok(())
}

/// Read a summary JSON written by `write_summary_json`.
pub fn read_summary_json(path: &Path) -> Result<Analysis, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open summary JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid summary JSON: {e}")))
}
