//! Command-line parsing for the daily COVID-19 report.
//!
//! Argument parsing and command dispatch stay separate from the pipeline and
//! analysis code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::{default_confirmed_url, default_deaths_url};
use crate::domain::{DEFAULT_DATE_FORMAT, DEFAULT_REGION, DEFAULT_REGION_COLUMN};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "covid-report",
    version,
    about = "Daily COVID-19 cases and deaths for one region (JHU CSSE time series)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prepare the daily series, print the summary, render charts and write the report.
    Report(ReportArgs),
    /// Print the daily series table only (useful for scripting).
    Series(ReportArgs),
}

/// Options shared by both subcommands.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Region to isolate (exact, case-sensitive match on the region column).
    #[arg(short = 'r', long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Cumulative confirmed-cases table (URL or local path).
    #[arg(long, env = "COVID_CONFIRMED_SOURCE", default_value_t = default_confirmed_url())]
    pub confirmed: String,

    /// Cumulative deaths table (URL or local path).
    #[arg(long, env = "COVID_DEATHS_SOURCE", default_value_t = default_deaths_url())]
    pub deaths: String,

    /// Header of the region column in both tables.
    #[arg(long, default_value = DEFAULT_REGION_COLUMN)]
    pub region_column: String,

    /// chrono format of the date column headers.
    #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Directory for charts and report.md.
    #[arg(short = 'o', long, default_value = "report")]
    pub out_dir: PathBuf,

    /// Skip SVG chart rendering.
    #[arg(long)]
    pub no_charts: bool,

    /// Trailing rows shown in the terminal table (0 = all).
    #[arg(long, default_value_t = 14)]
    pub tail: usize,

    /// LOESS span for the smoothed ratio, in (0, 1].
    #[arg(long, default_value_t = 0.75)]
    pub span: f64,

    /// Export the daily series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export summary, regression and smoothed ratio to JSON.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults() {
        let cli = Cli::try_parse_from(["covid-report", "report"]).unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.region, "New York");
        assert_eq!(args.region_column, "Province_State");
        assert_eq!(args.date_format, "%m/%d/%y");
        assert_eq!(args.out_dir, PathBuf::from("report"));
        assert_eq!(args.tail, 14);
        assert!(!args.no_charts);
        assert!(args.export.is_none());
    }

    #[test]
    fn series_accepts_local_sources() {
        let cli = Cli::try_parse_from([
            "covid-report",
            "series",
            "--confirmed",
            "c.csv",
            "--deaths",
            "d.csv",
            "-r",
            "Ohio",
            "--tail",
            "0",
        ])
        .unwrap();
        let Command::Series(args) = cli.command else {
            panic!("expected series");
        };
        assert_eq!(args.confirmed, "c.csv");
        assert_eq!(args.deaths, "d.csv");
        assert_eq!(args.region, "Ohio");
        assert_eq!(args.tail, 0);
    }
}
