//! Shared report pipeline used by both subcommands.
//!
//! load tables -> prepare daily series -> analyze
//!
//! The subcommands then only differ in presentation.

use tracing::{info, warn};

use crate::analysis::{Analysis, analyze};
use crate::data::{JhuClient, SourceTables};
use crate::domain::{RegionDailySeries, ReportConfig};
use crate::error::AppError;
use crate::io::ingest::IngestedTable;
use crate::math::LoessOptions;
use crate::series::TimeSeriesPreparer;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub tables: SourceTables,
    pub series: RegionDailySeries,
    pub analysis: Analysis,
}

/// Load both tables from the configured sources and run the pipeline.
pub fn run_report(config: &ReportConfig) -> Result<RunOutput, AppError> {
    let client = JhuClient::new(config.region_column.clone())?;
    let tables = client.fetch_tables(&config.confirmed, &config.deaths)?;

    Ok(run_with_tables(config, tables))
}

/// Run the pipeline over already loaded tables.
pub fn run_with_tables(config: &ReportConfig, tables: SourceTables) -> RunOutput {
    log_ingest(&tables.confirmed);
    log_ingest(&tables.deaths);

    for ingested in [&tables.confirmed, &tables.deaths] {
        if !ingested.table.contains_region(&config.region) {
            warn!(
                region = %config.region,
                table = ingested.table.measure.display_name(),
                "region not found in table"
            );
        }
    }

    let preparer = TimeSeriesPreparer::new(config.date_format.clone());
    let series = preparer.prepare(&tables.confirmed.table, &tables.deaths.table, &config.region);

    let analysis = analyze(
        &series,
        LoessOptions {
            span: config.span,
            ..LoessOptions::default()
        },
    );

    RunOutput {
        tables,
        series,
        analysis,
    }
}

fn log_ingest(ingested: &IngestedTable) {
    info!(
        table = ingested.table.measure.display_name(),
        rows = ingested.rows_read,
        columns = ingested.table.value_columns.len(),
        skipped = ingested.row_errors.len(),
        "table ingested"
    );
    for err in ingested.row_errors.iter().take(5) {
        warn!(line = err.line, "{}", err.message);
    }
}
