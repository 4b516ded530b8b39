//! Error types for market data operations

use thiserror::Error;

/// Message returned when the provider answers without the requested data.
pub const INVALID_SYMBOL_MESSAGE: &str = "Invalid symbol please use a correct ticker symbol.";

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors raised while fetching, normalizing, or reporting market data
#[derive(Debug, Error)]
pub enum MarketError {
    /// The HTTP call failed or the server returned a non-success status
    #[error("An error occurred while fetching data: {0}")]
    Transport(String),

    /// The response was well-formed but did not carry the requested data
    #[error("Invalid symbol please use a correct ticker symbol. (symbol: {symbol}, detail: {detail})")]
    InvalidSymbol {
        symbol: String,
        detail: String,
    },

    /// A series row could not be parsed into a date/price pair
    #[error("Malformed row '{row}': {reason}")]
    MalformedRow {
        row: String,
        reason: String,
    },

    /// A metric required by the report is absent from the company overview
    #[error("Missing metric '{0}' in company overview")]
    MissingMetric(String),

    /// Chart or PDF backend failure
    #[error("Render error: {0}")]
    Render(String),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarketError {
    /// Build an invalid-symbol error for `symbol`
    pub fn invalid_symbol(symbol: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidSymbol {
            symbol: symbol.into(),
            detail: detail.into(),
        }
    }

    /// Build a malformed-row error for the row keyed by `row`
    pub fn malformed_row(row: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            row: row.into(),
            reason: reason.into(),
        }
    }

    /// Short name of the failure kind, used in CLI output and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::InvalidSymbol { .. } => "invalid_symbol",
            Self::MalformedRow { .. } => "malformed_row",
            Self::MissingMetric(_) => "missing_metric",
            Self::Render(_) => "render",
            Self::Csv(_) => "csv",
            Self::Config(_) => "config",
            Self::Json(_) => "json",
            Self::Io(_) => "io",
        }
    }
}
