//! Company overview metrics

use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Metrics the report cannot be built without
pub const REQUIRED_METRICS: [&str; 13] = [
    "Name",
    "Description",
    "MarketCapitalization",
    "EPS",
    "PERatio",
    "RevenueTTM",
    "GrossProfitTTM",
    "OperatingMarginTTM",
    "ReturnOnEquityTTM",
    "RevenuePerShareTTM",
    "ProfitMargin",
    "BookValue",
    "DividendYield",
];

/// Flat metric-name to value mapping, passed through from the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyOverview {
    metrics: BTreeMap<String, String>,
}

impl CompanyOverview {
    /// Create an empty overview
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object, stringifying non-string values
    ///
    /// Returns `None` if `value` is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let metrics = object
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect();
        Some(Self { metrics })
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a metric
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metrics.insert(key.into(), value.into());
    }

    /// Look up a metric
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metrics.get(key).map(String::as_str)
    }

    /// Look up a metric, failing with [`MarketError::MissingMetric`]
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| MarketError::MissingMetric(key.to_string()))
    }

    /// Check every metric in [`REQUIRED_METRICS`], failing on the first gap
    pub fn validate_required(&self) -> Result<()> {
        for key in REQUIRED_METRICS {
            self.require(key)?;
        }
        Ok(())
    }

    /// Ticker symbol reported by the provider
    pub fn symbol(&self) -> Option<&str> {
        self.get("Symbol")
    }

    /// Company name
    pub fn name(&self) -> Option<&str> {
        self.get("Name")
    }

    /// Number of metrics
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether the overview is empty
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Iterate over metrics ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metrics.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete() -> CompanyOverview {
        REQUIRED_METRICS
            .iter()
            .fold(CompanyOverview::new(), |o, key| o.with(*key, "1"))
    }

    #[test]
    fn test_from_json() {
        let overview = CompanyOverview::from_json(&json!({
            "Symbol": "IBM",
            "Name": "International Business Machines",
            "EPS": 9.08,
            "Beta": null
        }))
        .unwrap();

        assert_eq!(overview.symbol(), Some("IBM"));
        assert_eq!(overview.name(), Some("International Business Machines"));
        assert_eq!(overview.get("EPS"), Some("9.08"));
        assert_eq!(overview.get("Beta"), Some(""));
        assert!(CompanyOverview::from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_validate_complete() {
        assert!(complete().validate_required().is_ok());
    }

    #[test]
    fn test_validate_missing_eps() {
        let mut overview = CompanyOverview::new();
        for key in REQUIRED_METRICS.iter().filter(|k| **k != "EPS") {
            overview.insert(*key, "1");
        }

        match overview.validate_required() {
            Err(MarketError::MissingMetric(key)) => assert_eq!(key, "EPS"),
            other => panic!("Expected MissingMetric, got {other:?}"),
        }
    }
}
