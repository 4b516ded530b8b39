//! # Market Report
//!
//! Turns normalized price series and a company overview into trend charts
//! and a single PDF summary report.
//!
//! ## Example
//!
//! ```rust,no_run
//! use market_core::{CompanyOverview, Granularity, NormalizedSeries};
//! use market_report::{ReportAssembler, ReportInput};
//! use market_utils::OutputLayout;
//!
//! # fn run(overview: CompanyOverview, daily: NormalizedSeries) -> market_core::Result<()> {
//! let input = ReportInput::new("IBM", overview)?.with_series(Granularity::Daily, &daily);
//! let report = ReportAssembler::new(&OutputLayout::default()).assemble(&input)?;
//! println!("Report written to {}", report.display());
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod input;
pub mod metrics;
pub mod pdf;
pub mod style;

pub use chart::{ChartRenderer, chart_title, render_chart};
pub use input::ReportInput;
pub use metrics::{METRIC_LAYOUT, console_table, metric_rows};
pub use pdf::{CREDITS, render_pdf};
pub use style::{ReportStyle, Rgb};

use market_core::{Granularity, Result};
use market_utils::OutputLayout;
use std::path::{Path, PathBuf};
use tracing::info;

/// Renders charts and writes the PDF report for one layout
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    charts: ChartRenderer,
    report_path: PathBuf,
    style: ReportStyle,
}

impl ReportAssembler {
    pub fn new(layout: &OutputLayout) -> Self {
        Self {
            charts: ChartRenderer::new(&layout.output_dir),
            report_path: layout.report_path.clone(),
            style: ReportStyle::default(),
        }
    }

    /// Use `style` for every report built by this assembler
    pub fn with_style(mut self, style: ReportStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &ReportStyle {
        &self.style
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Render one chart per attached series
    pub fn render_charts(&self, input: &ReportInput) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for granularity in Granularity::ALL {
            if let Some(series) = input.series(granularity) {
                paths.push(self.charts.render(input.symbol(), granularity, series)?);
            }
        }
        Ok(paths)
    }

    /// Build the PDF from `input` and whichever charts exist on disk
    ///
    /// The file is only written once the whole document has been laid out.
    pub fn build_pdf(&self, input: &ReportInput) -> Result<PathBuf> {
        let charts: Vec<PathBuf> = Granularity::ALL
            .iter()
            .map(|g| self.charts.chart_path(*g))
            .collect();
        let chart_refs: Vec<&Path> = charts.iter().map(PathBuf::as_path).collect();

        let bytes = render_pdf(input, &chart_refs, &self.style)?;

        if let Some(parent) = self.report_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.report_path, &bytes)?;

        info!(path = %self.report_path.display(), bytes = bytes.len(), "Wrote PDF report");
        Ok(self.report_path.clone())
    }

    /// Render charts then build the PDF
    pub fn assemble(&self, input: &ReportInput) -> Result<PathBuf> {
        self.render_charts(input)?;
        self.build_pdf(input)
    }
}
