//! CSV ingest for wide cumulative tables.
//!
//! This module turns a time-series CSV (one row per county, one column per
//! reporting date) into a `WideCumulativeTable`.
//!
//! Design goals:
//! - **Strict schema** only where it matters: the region column must exist
//! - **Row-level tolerance**: unreadable records are skipped and reported
//! - **Cell-level tolerance**: empty or non-integer cells become missing values
//! - **No reshaping here**: date handling belongs to `series`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{Measure, WideCumulativeTable};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the table plus what was skipped along the way.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: WideCumulativeTable,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

/// Read a wide table from a local CSV file.
pub fn load_table_file(path: &Path, measure: Measure, region_column: &str) -> Result<IngestedTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_wide_table(file, measure, region_column)
}

/// Parse a wide table from any CSV byte source.
pub fn parse_wide_table<R: Read>(
    reader: R,
    measure: Measure,
    region_column: &str,
) -> Result<IngestedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| {
            AppError::input(format!(
                "Failed to read CSV headers of the {} table: {e}",
                measure.display_name()
            ))
        })?
        .clone();

    let region_idx = find_column(&headers, region_column).ok_or_else(|| {
        AppError::input(format!(
            "Missing required column `{region_column}` in the {} table.",
            measure.display_name()
        ))
    })?;

    let value_indices: Vec<usize> = (0..headers.len()).filter(|&i| i != region_idx).collect();
    let value_columns = value_indices
        .iter()
        .map(|&i| clean_header(&headers[i]).to_string())
        .collect();

    let mut table = WideCumulativeTable::new(measure, value_columns);
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header line, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let region = record.get(region_idx).unwrap_or("").to_string();
        let cells = value_indices
            .iter()
            .map(|&i| record.get(i).and_then(parse_count))
            .collect();
        table.push_row(region, cells);
    }

    if !row_errors.is_empty() {
        warn!(
            table = measure.display_name(),
            skipped = row_errors.len(),
            first_line = row_errors[0].line,
            "skipped unreadable CSV records"
        );
    }
    debug!(
        table = measure.display_name(),
        rows = table.rows.len(),
        columns = table.value_columns.len(),
        "ingested wide table"
    );

    Ok(IngestedTable {
        table,
        rows_read,
        row_errors,
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    let wanted = normalize_header_name(name);
    headers
        .iter()
        .position(|h| normalize_header_name(h) == wanted)
}

fn clean_header(name: &str) -> &str {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema lookups miss that column.
    name.trim().trim_start_matches('\u{feff}').trim()
}

fn normalize_header_name(name: &str) -> String {
    clean_header(name).to_ascii_lowercase()
}

/// Parse a cumulative count. Integral decimals (`12.0`) are accepted.
fn parse_count(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}
