//! Normalization of extracted tables into `{date, price}` series

use super::extract::{ExtractedRow, ExtractedTable};
use super::sequence::SequenceSource;
use super::store;
use chrono::{NaiveDate, NaiveDateTime};
use market_core::{MarketError, NormalizedSeries, PricePoint, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Provider field carrying the closing price
pub const CLOSE_FIELD: &str = "4. close";

/// Convert every row to a rounded close price, failing on the first bad row
///
/// Output order and length match the input table.
pub fn normalize(table: &ExtractedTable) -> Result<NormalizedSeries> {
    table
        .rows()
        .iter()
        .map(normalize_row)
        .collect::<Result<Vec<_>>>()
        .map(NormalizedSeries::new)
}

fn normalize_row(row: &ExtractedRow) -> Result<PricePoint> {
    let date = parse_row_date(&row.key)?;

    let raw = row
        .get(CLOSE_FIELD)
        .ok_or_else(|| MarketError::malformed_row(&row.key, format!("missing '{CLOSE_FIELD}'")))?;

    let price: f64 = raw.trim().parse().map_err(|e| {
        MarketError::malformed_row(&row.key, format!("close '{raw}' is not numeric: {e}"))
    })?;

    if !price.is_finite() || price < 0.0 {
        return Err(MarketError::malformed_row(
            &row.key,
            format!("close '{raw}' is not a finite non-negative price"),
        ));
    }

    Ok(PricePoint::new(date, price))
}

/// Parse a row key as a calendar date
///
/// Intraday keys (`2023-01-03 16:00:00`) keep their date part.
pub fn parse_row_date(key: &str) -> Result<NaiveDate> {
    let key = key.trim();
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(key, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|e| MarketError::malformed_row(key, format!("invalid date: {e}")))
}

/// Normalizes tables and persists each result as a numbered CSV file
pub struct SeriesNormalizer {
    data_dir: PathBuf,
    sequence: Arc<dyn SequenceSource>,
}

impl SeriesNormalizer {
    /// Create a normalizer writing into `data_dir`, numbering files from `sequence`
    pub fn new(data_dir: impl Into<PathBuf>, sequence: Arc<dyn SequenceSource>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sequence,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Normalize `table` and write the result to `sample_data_<n>.csv`
    ///
    /// Nothing is written if any row fails. The series is staged in a
    /// temporary file and only takes a sequence number once fully written,
    /// so a failed write leaves no gap in the numbering.
    pub fn normalize(&self, table: &ExtractedTable) -> Result<NormalizedSeries> {
        let series = normalize(table)?;
        debug!(rows = series.len(), "Normalized series");

        std::fs::create_dir_all(&self.data_dir)?;
        let staged = NamedTempFile::new_in(&self.data_dir)?;
        store::write_series(staged.path(), &series)?;

        let path = self.next_path();
        staged.persist(&path).map_err(|e| MarketError::Io(e.error))?;
        info!(path = %path.display(), rows = series.len(), "Saved normalized series");

        Ok(series)
    }

    fn next_path(&self) -> PathBuf {
        let id = self.sequence.next_id();
        self.data_dir.join(format!("sample_data_{id}.csv"))
    }
}
