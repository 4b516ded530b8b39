//! Command-line interface for the financial market analyzer
//!
//! Fetches daily, weekly and monthly prices plus the company overview for one
//! symbol, normalizes the series to CSV, and writes charts and a PDF report.

use anyhow::Context;
use clap::Parser;
use market_core::{CompanyOverview, Granularity, NormalizedSeries};
use market_data::{AlphaVantageClient, ExtractedTable, FileSequence, MarketConfig, SeriesNormalizer};
use market_report::{ReportAssembler, ReportInput, console_table};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "market-analyzer")]
#[command(about = "Stock trend charts and a PDF summary report from Alpha Vantage data", long_about = None)]
struct Args {
    /// Alpha Vantage API key
    #[arg(long)]
    api_key: String,

    /// Ticker symbol, e.g. IBM
    #[arg(short, long)]
    symbol: String,

    /// Directory for charts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Directory for normalized CSV files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Path of the PDF report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Query endpoint override
    #[arg(long)]
    base_url: Option<String>,
}

impl Args {
    fn config(&self) -> market_core::Result<MarketConfig> {
        let mut builder = MarketConfig::builder().api_key(&self.api_key);
        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir);
        }
        if let Some(dir) = &self.data_dir {
            builder = builder.data_dir(dir);
        }
        if let Some(path) = &self.report {
            builder = builder.report_path(path);
        }
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url);
        }
        builder.build()
    }
}

/// Raw provider data for one symbol
struct Retrieved {
    series: Vec<(Granularity, ExtractedTable)>,
    overview: CompanyOverview,
}

async fn retrieve(client: &AlphaVantageClient, symbol: &str) -> anyhow::Result<Retrieved> {
    let mut series = Vec::with_capacity(Granularity::ALL.len());
    for granularity in Granularity::ALL {
        let table = client
            .series(granularity, symbol)
            .await
            .with_context(|| format!("fetching {granularity} series for {symbol}"))?;
        series.push((granularity, table));
    }

    let overview = client
        .company_overview(symbol)
        .await
        .with_context(|| format!("fetching company overview for {symbol}"))?;

    Ok(Retrieved { series, overview })
}

fn process(
    normalizer: &SeriesNormalizer,
    retrieved: &Retrieved,
) -> anyhow::Result<Vec<(Granularity, NormalizedSeries)>> {
    let mut processed = Vec::with_capacity(retrieved.series.len());
    for (granularity, table) in &retrieved.series {
        let series = normalizer
            .normalize(table)
            .with_context(|| format!("normalizing {granularity} series"))?;
        processed.push((*granularity, series));
    }
    Ok(processed)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.config().context("invalid configuration")?;
    config
        .layout
        .ensure_dirs()
        .context("creating output directories")?;

    let symbol = args.symbol.trim().to_string();
    info!(%symbol, report = %config.layout.report_path.display(), "Starting analysis");

    let client = AlphaVantageClient::from_config(&config)?;
    let retrieved = retrieve(&client, &symbol).await?;
    println!("Data retrieved successfully.");

    let normalizer =
        SeriesNormalizer::new(&config.layout.data_dir, Arc::new(FileSequence::new()));
    let processed = process(&normalizer, &retrieved)?;
    println!("Data processed successfully.");

    let input = processed.iter().fold(
        ReportInput::new(&symbol, retrieved.overview.clone())?,
        |input, (granularity, series)| input.with_series(*granularity, series),
    );
    let report = ReportAssembler::new(&config.layout)
        .assemble(&input)
        .context("generating report")?;

    println!("{}", console_table(input.overview())?);
    println!("PDF report generated successfully.");
    info!(path = %report.display(), "Done");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    market_utils::init_tracing();

    let args = Args::parse();
    run(args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_required_flags() {
        assert!(Args::try_parse_from(["market-analyzer", "--symbol", "IBM"]).is_err());
        assert!(Args::try_parse_from(["market-analyzer", "--api-key", "demo"]).is_err());
    }

    #[test]
    fn test_config_from_flags() {
        let args = Args::try_parse_from([
            "market-analyzer",
            "--api-key",
            "demo",
            "--symbol",
            "ibm",
            "--output-dir",
            "charts",
        ])
        .unwrap();

        let config = args.config().unwrap();
        assert_eq!(config.api_key, "demo");
        assert_eq!(config.layout.output_dir, PathBuf::from("charts"));
        assert_eq!(config.layout.report_path, PathBuf::from("charts/report.pdf"));
        assert_eq!(config.layout.data_dir, PathBuf::from("testfiles"));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let args = Args::try_parse_from([
            "market-analyzer",
            "--api-key",
            "demo",
            "--symbol",
            "IBM",
            "--base-url",
            "not a url",
        ])
        .unwrap();

        assert!(args.config().is_err());
    }
}
