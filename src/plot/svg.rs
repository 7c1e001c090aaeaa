//! Plotters-powered SVG charts for the report.
//!
//! Dates are plotted as day offsets from the first row of the series and
//! formatted back to calendar dates on the tick labels, which keeps the
//! coordinate system a plain `f64` range.

use std::error::Error;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use tracing::{debug, warn};

use crate::analysis::Analysis;
use crate::domain::RegionDailySeries;
use crate::error::AppError;

type DrawResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    DailyCases,
    DailyDeaths,
    DeathsVsCases,
    RatioSmoothed,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::DailyCases,
        ChartKind::DailyDeaths,
        ChartKind::DeathsVsCases,
        ChartKind::RatioSmoothed,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::DailyCases => "daily_cases.svg",
            ChartKind::DailyDeaths => "daily_deaths.svg",
            ChartKind::DeathsVsCases => "deaths_vs_cases.svg",
            ChartKind::RatioSmoothed => "ratio_smoothed.svg",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::DailyCases => "Daily cases",
            ChartKind::DailyDeaths => "Daily deaths",
            ChartKind::DeathsVsCases => "Daily deaths vs daily cases",
            ChartKind::RatioSmoothed => "Deaths / cases (smoothed)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub kind: ChartKind,
    pub path: PathBuf,
}

/// Chart canvas size in pixels.
#[derive(Debug, Clone, Copy)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

/// Render every chart that has data into `out_dir`.
///
/// An empty series renders nothing. The ratio chart is skipped when no row
/// has a defined ratio.
pub fn render_charts(
    series: &RegionDailySeries,
    analysis: &Analysis,
    out_dir: &Path,
    size: ChartSize,
) -> Result<Vec<RenderedChart>, AppError> {
    let Some(origin) = series.first_date() else {
        warn!(region = %series.region, "empty series, skipping charts");
        return Ok(Vec::new());
    };

    create_dir_all(out_dir)
        .map_err(|e| AppError::input(format!("Failed to create output dir '{}': {e}", out_dir.display())))?;

    let offset = |d: NaiveDate| (d - origin).num_days() as f64;
    let cases: Vec<(f64, f64)> = series
        .rows
        .iter()
        .map(|r| (offset(r.date), r.daily_cases as f64))
        .collect();
    let deaths: Vec<(f64, f64)> = series
        .rows
        .iter()
        .map(|r| (offset(r.date), r.daily_deaths as f64))
        .collect();
    let scatter: Vec<(f64, f64)> = series
        .rows
        .iter()
        .map(|r| (r.daily_cases as f64, r.daily_deaths as f64))
        .collect();
    let ratios: Vec<(f64, f64)> = series
        .rows
        .iter()
        .filter_map(|r| r.ratio.filter(|v| v.is_finite()).map(|v| (offset(r.date), v)))
        .collect();
    let smoothed: Vec<(f64, f64)> = analysis
        .smoothed_ratio
        .iter()
        .map(|p| (offset(p.date), p.ratio))
        .collect();

    let mut rendered = Vec::new();
    for kind in ChartKind::ALL {
        let path = out_dir.join(kind.file_name());
        let title = format!("{}: {}", series.region, kind.title());
        let result = match kind {
            ChartKind::DailyCases => draw_daily(&path, &title, size, origin, &cases, "cases", BLUE),
            ChartKind::DailyDeaths => draw_daily(&path, &title, size, origin, &deaths, "deaths", RED),
            ChartKind::DeathsVsCases => draw_scatter(&path, &title, size, &scatter, analysis),
            ChartKind::RatioSmoothed => {
                if ratios.is_empty() {
                    warn!("no defined ratios, skipping ratio chart");
                    continue;
                }
                draw_ratio(&path, &title, size, origin, &ratios, &smoothed)
            }
        };
        result.map_err(|e| {
            AppError::external(format!("Failed to render chart '{}': {e}", path.display()))
        })?;
        debug!(chart = kind.file_name(), "rendered chart");
        rendered.push(RenderedChart { kind, path });
    }

    Ok(rendered)
}

fn draw_daily(
    path: &Path,
    title: &str,
    size: ChartSize,
    origin: NaiveDate,
    points: &[(f64, f64)],
    y_label: &str,
    color: RGBColor,
) -> DrawResult {
    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = padded_range(points.iter().map(|p| p.0));
    let (y0, y1) = padded_range(points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("date")
        .y_desc(y_label)
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| date_label(origin, *v))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &color))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 2, color.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn draw_scatter(
    path: &Path,
    title: &str,
    size: ChartSize,
    points: &[(f64, f64)],
    analysis: &Analysis,
) -> DrawResult {
    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = padded_range(points.iter().map(|p| p.0));
    let line: Option<[(f64, f64); 2]> = analysis
        .regression
        .map(|fit| [(x0, fit.predict(x0)), (x1, fit.predict(x1))]);
    let (y0, y1) = padded_range(
        points
            .iter()
            .map(|p| p.1)
            .chain(line.iter().flatten().map(|p| p.1)),
    );

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("daily cases")
        .y_desc("daily deaths")
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, BLACK.mix(0.6).filled())),
        )?
        .label("days")
        .legend(|(x, y)| Rectangle::new([(x + 7, y - 3), (x + 13, y + 3)], BLACK.filled()));

    if let (Some(line), Some(fit)) = (line, analysis.regression) {
        chart
            .draw_series(LineSeries::new(line, BLUE.stroke_width(2)))?
            .label(format!(
                "OLS: {:.4} x + {:.2} (R² {:.3})",
                fit.slope, fit.intercept, fit.r_squared
            ))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_ratio(
    path: &Path,
    title: &str,
    size: ChartSize,
    origin: NaiveDate,
    ratios: &[(f64, f64)],
    smoothed: &[(f64, f64)],
) -> DrawResult {
    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = padded_range(ratios.iter().map(|p| p.0));
    let (y0, y1) = padded_range(ratios.iter().chain(smoothed).map(|p| p.1));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("date")
        .y_desc("deaths / cases")
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| date_label(origin, *v))
        .y_label_formatter(&|v| format!("{v:.3}"))
        .draw()?;

    // Undefined ratios have no point here; the gaps are intentional.
    chart
        .draw_series(
            ratios
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, BLACK.mix(0.5).filled())),
        )?
        .label("daily ratio")
        .legend(|(x, y)| Rectangle::new([(x + 7, y - 3), (x + 13, y + 3)], BLACK.filled()));

    if !smoothed.is_empty() {
        chart
            .draw_series(LineSeries::new(smoothed.iter().copied(), RED.stroke_width(2)))?
            .label("LOESS")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Min/max padded by 5% on each side; degenerate ranges are widened to ±1.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < 1e-12 {
        lo -= 1.0;
        hi += 1.0;
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn date_label(origin: NaiveDate, offset: f64) -> String {
    origin
        .checked_add_signed(Duration::days(offset.round() as i64))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
