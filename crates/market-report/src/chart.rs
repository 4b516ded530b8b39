//! Trend chart rendering

use market_core::{Granularity, MarketError, NormalizedSeries, Result};
use plotters::prelude::*;
use plotters::style::FontStyle;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolution of rendered charts
pub const CHART_DPI: f64 = 300.0;

/// Chart width in inches: an A4 page less a thin margin
const CHART_WIDTH_IN: f64 = 8.27 - 2.0 * 0.09;

/// Pixel size of every chart, 3:1 width to height
pub fn chart_size() -> (u32, u32) {
    let width = (CHART_WIDTH_IN * CHART_DPI).round();
    let height = (CHART_WIDTH_IN / 3.0 * CHART_DPI).round();
    (width as u32, height as u32)
}

/// Chart caption, e.g. `Weekly trend of 'IBM' stock`
pub fn chart_title(symbol: &str, granularity: Granularity) -> String {
    format!("{} trend of '{symbol}' stock", granularity.label())
}

const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

fn render_error(e: impl Display) -> MarketError {
    MarketError::Render(e.to_string())
}

/// Draw `series` as a line chart with point markers into a PNG at `path`
///
/// Points are plotted in stored order; sort them first.
pub fn render_chart(
    path: &Path,
    symbol: &str,
    granularity: Granularity,
    series: &NormalizedSeries,
) -> Result<()> {
    let (lo, hi) = series
        .price_bounds()
        .ok_or_else(|| MarketError::Render(format!("no {granularity} points to plot")))?;
    let pad = ((hi - lo) * 0.1).max(0.5);
    let points = series.points();

    let root = BitMapBackend::new(path, chart_size()).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            chart_title(symbol, granularity),
            ("sans-serif", 40).into_font().style(FontStyle::Bold),
        )
        .margin(30)
        .x_label_area_size(90)
        .y_label_area_size(130)
        .build_cartesian_2d(0..points.len(), (lo - pad)..(hi + pad))
        .map_err(render_error)?;

    let date_label = |idx: &usize| {
        points
            .get(*idx)
            .map(|p| p.date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_labels(points.len())
        .x_label_formatter(&date_label)
        .y_desc("Stock Price (USD)")
        .label_style(("sans-serif", 24))
        .axis_desc_style(("sans-serif", 28))
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(LineSeries::new(
            points.iter().enumerate().map(|(i, p)| (i, p.price)),
            LINE_COLOR.stroke_width(3),
        ))
        .map_err(render_error)?;

    chart
        .draw_series(
            points
                .iter()
                .enumerate()
                .map(|(i, p)| Circle::new((i, p.price), 7, LINE_COLOR.filled())),
        )
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}

/// Renders charts into one output directory with fixed file names
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Where the chart for `granularity` is written
    pub fn chart_path(&self, granularity: Granularity) -> PathBuf {
        self.output_dir.join(granularity.plot_file_name())
    }

    /// Render one chart, returning its path
    pub fn render(
        &self,
        symbol: &str,
        granularity: Granularity,
        series: &NormalizedSeries,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.chart_path(granularity);
        render_chart(&path, symbol, granularity, series)?;
        info!(path = %path.display(), %granularity, points = series.len(), "Rendered chart");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use market_core::PricePoint;
    use tempfile::tempdir;

    #[test]
    fn test_chart_size() {
        let (w, h) = chart_size();
        assert_eq!(w, 2427);
        assert_eq!(h, 809);
    }

    #[test]
    fn test_chart_title() {
        assert_eq!(
            chart_title("IBM", Granularity::Daily),
            "Daily (Hrs) trend of 'IBM' stock"
        );
    }

    #[test]
    fn test_chart_path() {
        let renderer = ChartRenderer::new("output");
        assert_eq!(
            renderer.chart_path(Granularity::Weekly),
            PathBuf::from("output/Weekly_plot.png")
        );
    }

    #[test]
    fn test_empty_series_rejected() {
        let dir = tempdir().unwrap();
        let result = ChartRenderer::new(dir.path()).render(
            "IBM",
            Granularity::Monthly,
            &NormalizedSeries::default(),
        );
        assert!(matches!(result, Err(MarketError::Render(_))));
        assert!(!dir.path().join("Monthly_plot.png").exists());
    }

    #[test]
    #[ignore] // Requires system fonts
    fn test_render_png() {
        let dir = tempdir().unwrap();
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let series = NormalizedSeries::new(
            (0..7)
                .map(|d| PricePoint::new(start + chrono::Duration::weeks(d), 140.0 + d as f64))
                .collect(),
        );

        let path = ChartRenderer::new(dir.path())
            .render("IBM", Granularity::Weekly, &series)
            .unwrap();

        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
