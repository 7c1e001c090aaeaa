//! Top-level application orchestration.
//!
//! `src/main.rs` only sets up logging and maps errors to exit codes; this
//! module is the "real main" that:
//! - parses CLI arguments
//! - loads both cumulative tables
//! - prepares the daily series and runs the analysis
//! - prints the summary and table
//! - renders charts, writes report.md and optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{Command, ReportArgs};
use crate::domain::{ReportConfig, SourceLocation};
use crate::error::AppError;
use crate::plot::ChartSize;

pub mod pipeline;

/// Entry point for the `covid-report` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; the env-backed flags fall back to their defaults.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(&args),
        Command::Series(args) => handle_series(&args),
    }
}

fn handle_report(args: &ReportArgs) -> Result<(), AppError> {
    let config = config_from_args(args)?;
    let run = pipeline::run_report(&config)?;

    println!("{}", crate::report::format_summary(&run.series, &run.analysis));
    if !run.series.is_empty() {
        println!("{}", crate::report::format_table(&run.series, config.tail));
    }

    let charts = if config.charts {
        crate::plot::render_charts(
            &run.series,
            &run.analysis,
            &config.out_dir,
            ChartSize {
                width: config.chart_width,
                height: config.chart_height,
            },
        )?
    } else {
        Vec::new()
    };

    let report = crate::report::write_report_markdown(&config, &run.series, &run.analysis, &charts)?;
    info!(path = %report.display(), charts = charts.len(), "report written");

    write_exports(&config, &run)
}

fn handle_series(args: &ReportArgs) -> Result<(), AppError> {
    let config = config_from_args(args)?;
    let run = pipeline::run_report(&config)?;

    println!("{}", crate::report::format_table(&run.series, config.tail));

    write_exports(&config, &run)
}

fn write_exports(config: &ReportConfig, run: &pipeline::RunOutput) -> Result<(), AppError> {
    if let Some(path) = &config.export_series {
        crate::io::export::write_series_csv(path, &run.series)?;
        info!(path = %path.display(), "series exported");
    }
    if let Some(path) = &config.export_summary {
        crate::io::export::write_summary_json(path, &run.analysis)?;
        info!(path = %path.display(), "summary exported");
    }
    Ok(())
}

/// Fold parsed flags into a validated `ReportConfig`.
pub fn config_from_args(args: &ReportArgs) -> Result<ReportConfig, AppError> {
    if !(args.span > 0.0 && args.span <= 1.0) {
        return Err(AppError::input(format!(
            "--span must be in (0, 1], got {}.",
            args.span
        )));
    }
    if args.width == 0 || args.height == 0 {
        return Err(AppError::input(format!(
            "Chart size must be non-zero, got {}x{}.",
            args.width, args.height
        )));
    }
    if args.region_column.trim().is_empty() {
        return Err(AppError::input("--region-column must not be empty."));
    }

    Ok(ReportConfig {
        region: args.region.clone(),
        confirmed: SourceLocation::parse(&args.confirmed),
        deaths: SourceLocation::parse(&args.deaths),
        region_column: args.region_column.clone(),
        date_format: args.date_format.clone(),
        out_dir: args.out_dir.clone(),
        charts: !args.no_charts,
        chart_width: args.width,
        chart_height: args.height,
        tail: args.tail,
        span: args.span,
        export_series: args.export.clone(),
        export_summary: args.export_summary.clone(),
    })
}

/// Rewrite argv so `covid-report` defaults to `covid-report report`.
///
/// Rules:
/// - `covid-report`                      -> `covid-report report`
/// - `covid-report -r Ohio ...`          -> `covid-report report -r Ohio ...`
/// - `covid-report --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "series");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_INPUT;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn args(extra: &[&str]) -> ReportArgs {
        let mut full = vec!["covid-report", "report"];
        full.extend_from_slice(extra);
        match crate::cli::Cli::try_parse_from(full).unwrap().command {
            Command::Report(a) => a,
            Command::Series(_) => panic!("expected report"),
        }
    }

    #[test]
    fn bare_invocation_defaults_to_report() {
        assert_eq!(rewrite_args(argv(&["covid-report"])), argv(&["covid-report", "report"]));
    }

    #[test]
    fn leading_flag_is_routed_to_report() {
        assert_eq!(
            rewrite_args(argv(&["covid-report", "-r", "Ohio"])),
            argv(&["covid-report", "report", "-r", "Ohio"])
        );
    }

    #[test]
    fn explicit_subcommand_and_help_are_untouched() {
        let series = argv(&["covid-report", "series", "--tail", "3"]);
        assert_eq!(rewrite_args(series.clone()), series);
        let help = argv(&["covid-report", "--help"]);
        assert_eq!(rewrite_args(help.clone()), help);
    }

    #[test]
    fn config_maps_flags() {
        let config = config_from_args(&args(&[
            "--confirmed",
            "c.csv",
            "--deaths",
            "https://example.org/d.csv",
            "--no-charts",
            "--span",
            "0.5",
        ]))
        .unwrap();
        assert_eq!(config.confirmed, SourceLocation::File("c.csv".into()));
        assert_eq!(
            config.deaths,
            SourceLocation::Url("https://example.org/d.csv".into())
        );
        assert!(!config.charts);
        assert_eq!(config.span, 0.5);
        assert_eq!(config.region, "New York");
    }

    #[test]
    fn config_rejects_bad_span_and_size() {
        for span in ["0", "1.5", "NaN"] {
            let err = config_from_args(&args(&["--span", span])).unwrap_err();
            assert_eq!(err.exit_code(), EXIT_INPUT);
        }
        let err = config_from_args(&args(&["--width", "0"])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }
}
