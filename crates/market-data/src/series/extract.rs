//! Extraction of nested provider series into row-oriented tables

use market_core::{MarketError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// One dated row of a provider series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRow {
    /// Row key as sent by the provider, e.g. `2023-01-01`
    pub key: String,
    /// Named fields such as `1. open` or `4. close`
    pub fields: BTreeMap<String, String>,
}

impl ExtractedRow {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insert
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Rows keyed by date, in provider order
///
/// Every row carries the same field set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTable {
    rows: Vec<ExtractedRow>,
}

impl ExtractedTable {
    /// Build a table, checking that all rows share one field set
    pub fn from_rows(rows: Vec<ExtractedRow>) -> Result<Self> {
        if let Some(first) = rows.first() {
            for row in &rows[1..] {
                if !row.fields.keys().eq(first.fields.keys()) {
                    return Err(MarketError::malformed_row(
                        &row.key,
                        format!(
                            "field set differs from row '{}' ({:?} vs {:?})",
                            first.key,
                            row.fields.keys().collect::<Vec<_>>(),
                            first.fields.keys().collect::<Vec<_>>()
                        ),
                    ));
                }
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ExtractedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Field names shared by every row
    pub fn field_names(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Extract `payload[key]` into a table
///
/// Returns `Ok(None)` when the key is absent or not an object, so callers can
/// tell "no data" apart from "bad data".
pub fn extract(payload: &Value, key: &str) -> Result<Option<ExtractedTable>> {
    let Some(series) = payload.get(key).and_then(Value::as_object) else {
        return Ok(None);
    };

    let mut rows = Vec::with_capacity(series.len());
    for (date, values) in series {
        let object = values.as_object().ok_or_else(|| {
            MarketError::malformed_row(date, format!("expected an object, found {values}"))
        })?;

        let fields = object
            .iter()
            .map(|(name, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), text)
            })
            .collect();

        rows.push(ExtractedRow {
            key: date.clone(),
            fields,
        });
    }

    ExtractedTable::from_rows(rows).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "Meta Data": { "2. Symbol": "IBM" },
            "Time Series (Daily)": {
                "2023-01-03": { "1. open": "141.10", "4. close": "141.55", "5. volume": "3338829" },
                "2023-01-02": { "1. open": "140.00", "4. close": "140.90", "5. volume": "2810000" },
                "2022-12-30": { "1. open": "139.50", "4. close": "140.89", "5. volume": "2400000" }
            }
        })
    }

    #[test]
    fn test_extract_keeps_provider_order() {
        let table = extract(&payload(), "Time Series (Daily)").unwrap().unwrap();

        assert_eq!(table.len(), 3);
        let keys: Vec<_> = table.rows().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["2023-01-03", "2023-01-02", "2022-12-30"]);
        assert_eq!(table.rows()[0].get("4. close"), Some("141.55"));
        assert_eq!(table.field_names(), vec!["1. open", "4. close", "5. volume"]);
    }

    #[test]
    fn test_extract_missing_key() {
        assert!(extract(&payload(), "Weekly Time Series").unwrap().is_none());
        assert!(extract(&json!({"Error Message": "bad"}), "Time Series (Daily)")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_extract_non_object_row() {
        let bad = json!({ "Weekly Time Series": { "2023-01-06": "141.0" } });
        let err = extract(&bad, "Weekly Time Series").unwrap_err();
        assert!(matches!(err, MarketError::MalformedRow { .. }));
    }

    #[test]
    fn test_inconsistent_fields_rejected() {
        let rows = vec![
            ExtractedRow::new("2023-01-02").field("4. close", "1"),
            ExtractedRow::new("2023-01-01").field("1. open", "1"),
        ];

        match ExtractedTable::from_rows(rows) {
            Err(MarketError::MalformedRow { row, .. }) => assert_eq!(row, "2023-01-01"),
            other => panic!("Expected MalformedRow, got {other:?}"),
        }
    }
}
