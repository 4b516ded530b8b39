//! Market data retrieval and normalization
//!
//! This crate is the data half of the financial market analyzer:
//!
//! - [`api::AlphaVantageClient`] issues queries and decodes the payloads into
//!   typed [`api::ProviderResponse`] variants
//! - [`series::extract`] turns a nested series object into an
//!   [`series::ExtractedTable`]
//! - [`series::SeriesNormalizer`] reduces tables to `{date, price}` series and
//!   persists each one as a numbered CSV file
//!
//! # Example
//!
//! ```rust,ignore
//! use market_data::{AlphaVantageClient, FileSequence, MarketConfig, SeriesNormalizer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MarketConfig::builder().with_env_api_key().build()?;
//!     let client = AlphaVantageClient::from_config(&config)?;
//!     let normalizer =
//!         SeriesNormalizer::new(&config.layout.data_dir, Arc::new(FileSequence::new()));
//!
//!     let table = client.daily_series("IBM").await?;
//!     let series = normalizer.normalize(&table)?;
//!     println!("{} daily points", series.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod series;

pub use api::{AlphaVantageClient, ApiFunction, OutputSize, ProviderResponse};
pub use config::{MarketConfig, MarketConfigBuilder};
pub use series::{ExtractedTable, FileSequence, SequenceSource, SeriesNormalizer};

// Re-export core types for convenience
pub use market_core::{CompanyOverview, Granularity, MarketError, NormalizedSeries, PricePoint, Result};
