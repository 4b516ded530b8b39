//! Alpha Vantage API client

use super::response::ProviderResponse;
use crate::config::{DEFAULT_BASE_URL, MarketConfig};
use crate::series::ExtractedTable;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use market_core::{CompanyOverview, Granularity, MarketError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, warn};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Provider functions used by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFunction {
    TimeSeriesDaily,
    TimeSeriesWeekly,
    TimeSeriesMonthly,
    Overview,
}

impl ApiFunction {
    /// Value of the `function` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeSeriesDaily => "TIME_SERIES_DAILY",
            Self::TimeSeriesWeekly => "TIME_SERIES_WEEKLY",
            Self::TimeSeriesMonthly => "TIME_SERIES_MONTHLY",
            Self::Overview => "OVERVIEW",
        }
    }

    /// Top-level key holding the series in a successful response
    pub fn series_key(&self) -> Option<&'static str> {
        match self {
            Self::TimeSeriesDaily => Some("Time Series (Daily)"),
            Self::TimeSeriesWeekly => Some("Weekly Time Series"),
            Self::TimeSeriesMonthly => Some("Monthly Time Series"),
            Self::Overview => None,
        }
    }

    pub fn granularity(&self) -> Option<Granularity> {
        match self {
            Self::TimeSeriesDaily => Some(Granularity::Daily),
            Self::TimeSeriesWeekly => Some(Granularity::Weekly),
            Self::TimeSeriesMonthly => Some(Granularity::Monthly),
            Self::Overview => None,
        }
    }
}

impl From<Granularity> for ApiFunction {
    fn from(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Daily => Self::TimeSeriesDaily,
            Granularity::Weekly => Self::TimeSeriesWeekly,
            Granularity::Monthly => Self::TimeSeriesMonthly,
        }
    }
}

impl fmt::Display for ApiFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount of history returned for a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// Latest 100 data points
    #[default]
    Compact,
    /// Full history
    Full,
}

impl OutputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    output_size: OutputSize,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client with API key and rate limit
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `rate_limit` - Maximum requests per minute (5 on the free tier)
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        Self::with_client(Client::new(), api_key, rate_limit)
    }

    fn with_client(client: Client, api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));

        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_size: OutputSize::Compact,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Create a client from a validated configuration
    pub fn from_config(config: &MarketConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| MarketError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(
            Self::with_client(client, config.api_key.clone(), config.rate_limit_per_minute)
                .with_base_url(config.base_url.clone())
                .with_output_size(config.output_size),
        )
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Output size used by the series accessors
    pub fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }

    /// Issue one query and return the parsed JSON body
    ///
    /// Fails with [`MarketError::Transport`] when the request cannot be sent,
    /// the status is not a success, or the body is not JSON. Payload content is
    /// not inspected here.
    pub async fn fetch(
        &self,
        function: ApiFunction,
        symbol: &str,
        interval: Option<&str>,
        output_size: OutputSize,
    ) -> Result<serde_json::Value> {
        if symbol.trim().is_empty() {
            return Err(MarketError::invalid_symbol(symbol, "symbol must not be empty"));
        }

        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let mut params = vec![
            ("function", function.as_str()),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
            ("outputsize", output_size.as_str()),
        ];
        if let Some(interval) = interval {
            params.push(("interval", interval));
        }

        debug!(%function, symbol, "Requesting Alpha Vantage data");

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| MarketError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%function, symbol, %status, "Alpha Vantage returned an error status");
            return Err(MarketError::Transport(format!("HTTP error: {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| MarketError::Transport(format!("invalid JSON body: {}", e.without_url())))
    }

    async fn fetch_decoded(&self, function: ApiFunction, symbol: &str) -> Result<ProviderResponse> {
        let data = self.fetch(function, symbol, None, self.output_size).await?;
        let decoded = ProviderResponse::decode(function, &data)?;
        if let ProviderResponse::Error(err) = &decoded {
            warn!(%function, symbol, kind = ?err.kind, "No data in Alpha Vantage response");
        }
        Ok(decoded)
    }

    /// Fetch the series for `granularity` as an extracted table
    pub async fn series(&self, granularity: Granularity, symbol: &str) -> Result<ExtractedTable> {
        let table = self
            .fetch_decoded(granularity.into(), symbol)
            .await?
            .into_table(symbol)?;
        debug!(%granularity, symbol, rows = table.len(), "Extracted series");
        Ok(table)
    }

    /// Get daily time series data
    pub async fn daily_series(&self, symbol: &str) -> Result<ExtractedTable> {
        self.series(Granularity::Daily, symbol).await
    }

    /// Get weekly time series data
    pub async fn weekly_series(&self, symbol: &str) -> Result<ExtractedTable> {
        self.series(Granularity::Weekly, symbol).await
    }

    /// Get monthly time series data
    pub async fn monthly_series(&self, symbol: &str) -> Result<ExtractedTable> {
        self.series(Granularity::Monthly, symbol).await
    }

    /// Get company overview and fundamental data
    pub async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        self.fetch_decoded(ApiFunction::Overview, symbol)
            .await?
            .into_overview(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    fn client_for(server: &ServerGuard) -> AlphaVantageClient {
        AlphaVantageClient::new("test_key", 60).with_base_url(format!("{}/query", server.url()))
    }

    #[test]
    fn test_client_creation() {
        let client = AlphaVantageClient::new("test_key", 5);
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.output_size, OutputSize::Compact);
    }

    #[test]
    fn test_function_names() {
        assert_eq!(ApiFunction::TimeSeriesDaily.as_str(), "TIME_SERIES_DAILY");
        assert_eq!(ApiFunction::from(Granularity::Weekly), ApiFunction::TimeSeriesWeekly);
        assert_eq!(ApiFunction::TimeSeriesMonthly.series_key(), Some("Monthly Time Series"));
        assert_eq!(ApiFunction::Overview.series_key(), None);
    }

    #[tokio::test]
    async fn test_fetch_sends_query_parameters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("function".into(), "TIME_SERIES_DAILY".into()),
                Matcher::UrlEncoded("symbol".into(), "IBM".into()),
                Matcher::UrlEncoded("apikey".into(), "test_key".into()),
                Matcher::UrlEncoded("outputsize".into(), "full".into()),
                Matcher::UrlEncoded("interval".into(), "5min".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sample_key": "sample_value"}"#)
            .create_async()
            .await;

        let data = client_for(&server)
            .fetch(ApiFunction::TimeSeriesDaily, "IBM", Some("5min"), OutputSize::Full)
            .await
            .unwrap();

        assert_eq!(data, json!({"sample_key": "sample_value"}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_transport_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("not json at all")
            .create_async()
            .await;

        let err = client_for(&server)
            .fetch(ApiFunction::TimeSeriesDaily, "IBM", None, OutputSize::Compact)
            .await
            .unwrap_err();

        match err {
            MarketError::Transport(msg) => assert!(msg.contains("503")),
            other => panic!("Expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_error() {
        // Reserve a free port, then release it so nothing is listening
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = AlphaVantageClient::new("test_key", 60)
            .with_base_url(format!("http://127.0.0.1:{port}/query"));

        let err = client.daily_series("IBM").await.unwrap_err();
        assert!(matches!(err, MarketError::Transport(_)));
        assert!(!err.to_string().contains("test_key"));
    }

    #[tokio::test]
    async fn test_empty_symbol_rejected_without_request() {
        let client = AlphaVantageClient::new("test_key", 60).with_base_url("http://127.0.0.1:9/query");
        let err = client.weekly_series("  ").await.unwrap_err();
        assert!(matches!(err, MarketError::InvalidSymbol { .. }));
    }

    #[tokio::test]
    async fn test_daily_series_success() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(Matcher::UrlEncoded("function".into(), "TIME_SERIES_DAILY".into()))
            .with_status(200)
            .with_body(
                json!({
                    "Meta Data": { "2. Symbol": "IBM" },
                    "Time Series (Daily)": {
                        "2023-01-03": { "1. open": "141.10", "4. close": "141.55" },
                        "2023-01-02": { "1. open": "140.00", "4. close": "140.90" }
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let table = client_for(&server).daily_series("IBM").await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].key, "2023-01-03");
    }

    #[tokio::test]
    async fn test_error_payload_is_invalid_symbol() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#)
            .create_async()
            .await;

        let err = client_for(&server).daily_series("INVALID").await.unwrap_err();
        assert!(matches!(err, MarketError::InvalidSymbol { .. }));
        assert!(err.to_string().contains("Invalid symbol please use a correct ticker symbol."));
    }

    #[tokio::test]
    async fn test_rate_limit_note_is_invalid_symbol() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#)
            .create_async()
            .await;

        let err = client_for(&server).monthly_series("IBM").await.unwrap_err();
        match err {
            MarketError::InvalidSymbol { detail, .. } => assert!(detail.starts_with("Note:")),
            other => panic!("Expected InvalidSymbol, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_company_overview() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(Matcher::UrlEncoded("function".into(), "OVERVIEW".into()))
            .with_status(200)
            .with_body(r#"{"Symbol": "IBM", "Name": "International Business Machines", "EPS": "9.08"}"#)
            .create_async()
            .await;

        let overview = client_for(&server).company_overview("IBM").await.unwrap();
        assert_eq!(overview.symbol(), Some("IBM"));
        assert_eq!(overview.get("EPS"), Some("9.08"));
    }

    #[tokio::test]
    #[ignore] // Requires API key and network access
    async fn test_get_daily_live() {
        let config = MarketConfig::default().with_env_api_key();
        let client = AlphaVantageClient::from_config(&config).unwrap();
        let data = client.daily_series("IBM").await;
        assert!(data.is_ok());
        assert!(!data.unwrap().is_empty());
    }
}
