//! Configuration for market data retrieval

use crate::api::OutputSize;
use market_core::{MarketError, Result};
use market_utils::OutputLayout;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default Alpha Vantage endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Environment variable holding the Alpha Vantage API key
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Configuration for the market data pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Alpha Vantage API key
    pub api_key: String,

    /// Query endpoint
    pub base_url: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Maximum requests per minute (5 on the free tier)
    pub rate_limit_per_minute: u32,

    /// Amount of history requested per series
    pub output_size: OutputSize,

    /// Where CSV files, charts, and the report land
    pub layout: OutputLayout,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            rate_limit_per_minute: 5,
            output_size: OutputSize::Compact,
            layout: OutputLayout::default(),
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Load the API key from `ALPHA_VANTAGE_API_KEY` when set
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.api_key = key;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(MarketError::Config("API key must not be empty".to_string()));
        }

        if self.rate_limit_per_minute == 0 {
            return Err(MarketError::Config(
                "rate_limit_per_minute must be greater than 0".to_string(),
            ));
        }

        url::Url::parse(&self.base_url).map_err(|e| {
            MarketError::Config(format!("Invalid base URL '{}': {e}", self.base_url))
        })?;

        Ok(())
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    rate_limit_per_minute: Option<u32>,
    output_size: Option<OutputSize>,
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    report_path: Option<PathBuf>,
}

impl MarketConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Load the API key from the environment unless one was set
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var(API_KEY_ENV).ok();
        }
        self
    }

    /// Set the query endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the per-minute request quota
    pub fn rate_limit_per_minute(mut self, limit: u32) -> Self {
        self.rate_limit_per_minute = Some(limit);
        self
    }

    /// Set the output size
    pub fn output_size(mut self, size: OutputSize) -> Self {
        self.output_size = Some(size);
        self
    }

    /// Set the CSV output directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the chart output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the PDF report path
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let output_dir = self.output_dir.unwrap_or(defaults.layout.output_dir);
        let report_path = self
            .report_path
            .unwrap_or_else(|| output_dir.join("report.pdf"));

        let config = MarketConfig {
            api_key: self.api_key.unwrap_or(defaults.api_key),
            base_url: self.base_url.unwrap_or(defaults.base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            rate_limit_per_minute: self
                .rate_limit_per_minute
                .unwrap_or(defaults.rate_limit_per_minute),
            output_size: self.output_size.unwrap_or(defaults.output_size),
            layout: OutputLayout {
                data_dir: self.data_dir.unwrap_or(defaults.layout.data_dir),
                output_dir,
                report_path,
            },
        };

        config.validate()?;
        Ok(config)
    }
}
