//! Retrieval of the JHU CSSE US time-series tables.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::info;

use crate::domain::{Measure, SourceLocation};
use crate::error::AppError;
use crate::io::ingest::{IngestedTable, load_table_file, parse_wide_table};

const BASE_URL: &str =
    "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series";

pub const CONFIRMED_US_FILE: &str = "time_series_covid19_confirmed_US.csv";
pub const DEATHS_US_FILE: &str = "time_series_covid19_deaths_US.csv";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub fn default_confirmed_url() -> String {
    format!("{BASE_URL}/{CONFIRMED_US_FILE}")
}

pub fn default_deaths_url() -> String {
    format!("{BASE_URL}/{DEATHS_US_FILE}")
}

/// Both cumulative tables as loaded for one run.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub confirmed: IngestedTable,
    pub deaths: IngestedTable,
}

pub struct JhuClient {
    client: Client,
    region_column: String,
}

impl JhuClient {
    pub fn new(region_column: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::external(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            region_column: region_column.into(),
        })
    }

    pub fn fetch_tables(
        &self,
        confirmed: &SourceLocation,
        deaths: &SourceLocation,
    ) -> Result<SourceTables, AppError> {
        Ok(SourceTables {
            confirmed: self.fetch_table(confirmed, Measure::Cases)?,
            deaths: self.fetch_table(deaths, Measure::Deaths)?,
        })
    }

    pub fn fetch_table(&self, location: &SourceLocation, measure: Measure) -> Result<IngestedTable, AppError> {
        info!(table = measure.display_name(), source = %location, "loading table");
        match location {
            SourceLocation::File(path) => load_table_file(path, measure, &self.region_column),
            SourceLocation::Url(url) => {
                let body = self.download(url)?;
                parse_wide_table(body.as_bytes(), measure, &self.region_column)
            }
        }
    }

    fn download(&self, url: &str) -> Result<String, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::external(format!("Request to {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::external(format!(
                "Request to {url} failed with status {}.",
                resp.status()
            )));
        }

        resp.text()
            .map_err(|e| AppError::external(format!("Failed to read response body from {url}: {e}")))
    }
}
