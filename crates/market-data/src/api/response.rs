//! Typed decoding of Alpha Vantage payloads

use super::alpha_vantage::ApiFunction;
use crate::series::{ExtractedTable, extract};
use market_core::{CompanyOverview, Granularity, MarketError, Result};
use serde_json::Value;

/// Why a payload carried no usable data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// `"Error Message"`: unknown symbol or bad call
    ErrorMessage,
    /// `"Note"`: call frequency exceeded
    RateLimited,
    /// `"Information"`: premium endpoint or daily quota
    Information,
    /// The expected key was simply not there
    MissingData,
}

/// Error object returned in place of data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

/// Payload decoded according to the function that was requested
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    Daily(ExtractedTable),
    Weekly(ExtractedTable),
    Monthly(ExtractedTable),
    Overview(CompanyOverview),
    Error(ProviderError),
}

impl ProviderResponse {
    /// Decode `payload` as the answer to `function`
    ///
    /// A present series key whose rows are inconsistent fails with
    /// [`MarketError::MalformedRow`]; anything else without data becomes
    /// [`ProviderResponse::Error`].
    pub fn decode(function: ApiFunction, payload: &Value) -> Result<Self> {
        if let Some(granularity) = function.granularity() {
            let key = function.series_key().unwrap_or_default();
            if let Some(table) = extract(payload, key)? {
                return Ok(match granularity {
                    Granularity::Daily => Self::Daily(table),
                    Granularity::Weekly => Self::Weekly(table),
                    Granularity::Monthly => Self::Monthly(table),
                });
            }
            return Ok(Self::Error(provider_error(
                payload,
                &format!("Data not found in the response (expected '{key}')"),
            )));
        }

        let overview = CompanyOverview::from_json(payload)
            .filter(|o| o.symbol().is_some_and(|s| !s.is_empty()));
        Ok(match overview {
            Some(overview) => Self::Overview(overview),
            None => Self::Error(provider_error(
                payload,
                "Data not found in the response (expected 'Symbol')",
            )),
        })
    }

    /// Series table, or `InvalidSymbol` for error payloads
    pub fn into_table(self, symbol: &str) -> Result<ExtractedTable> {
        match self {
            Self::Daily(table) | Self::Weekly(table) | Self::Monthly(table) => Ok(table),
            Self::Overview(_) => Err(MarketError::invalid_symbol(
                symbol,
                "expected a time series, got a company overview",
            )),
            Self::Error(err) => Err(MarketError::invalid_symbol(symbol, err.message)),
        }
    }

    /// Company overview, or `InvalidSymbol` for anything else
    pub fn into_overview(self, symbol: &str) -> Result<CompanyOverview> {
        match self {
            Self::Overview(overview) => Ok(overview),
            Self::Error(err) => Err(MarketError::invalid_symbol(symbol, err.message)),
            _ => Err(MarketError::invalid_symbol(
                symbol,
                "expected a company overview, got a time series",
            )),
        }
    }
}

fn provider_error(payload: &Value, fallback: &str) -> ProviderError {
    let lookup = [
        ("Error Message", ProviderErrorKind::ErrorMessage),
        ("Note", ProviderErrorKind::RateLimited),
        ("Information", ProviderErrorKind::Information),
    ];

    for (key, kind) in lookup {
        if let Some(message) = payload.get(key) {
            let message = message
                .as_str()
                .map_or_else(|| message.to_string(), str::to_string);
            return ProviderError {
                kind,
                message: format!("{key}: {message}"),
            };
        }
    }

    ProviderError {
        kind: ProviderErrorKind::MissingData,
        message: fallback.to_string(),
    }
}
