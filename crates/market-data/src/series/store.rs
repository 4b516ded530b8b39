//! CSV persistence of normalized series
//!
//! Files carry an `index,date,price` header; dates are `YYYY-MM-DD` and
//! prices are written with two decimals.

use chrono::NaiveDate;
use market_core::{MarketError, NormalizedSeries, PricePoint, Result};
use serde::Deserialize;
use std::path::Path;

const HEADER: [&str; 3] = ["index", "date", "price"];

#[derive(Debug, Deserialize)]
struct SeriesRecord {
    date: NaiveDate,
    price: f64,
}

fn csv_error(e: csv::Error) -> MarketError {
    MarketError::Csv(e.to_string())
}

/// Write `series` to `path`, creating parent directories as needed
pub fn write_series(path: &Path, series: &NormalizedSeries) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(HEADER).map_err(csv_error)?;
    for (index, point) in series.iter().enumerate() {
        writer
            .write_record([
                index.to_string(),
                point.date.format("%Y-%m-%d").to_string(),
                format!("{:.2}", point.price),
            ])
            .map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a series previously written by [`write_series`]
pub fn read_series(path: &Path) -> Result<NormalizedSeries> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let mut points = Vec::new();
    for record in reader.deserialize::<SeriesRecord>() {
        let record = record.map_err(csv_error)?;
        points.push(PricePoint::new(record.date, record.price));
    }
    Ok(NormalizedSeries::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sample_data_1.csv");
        let series = NormalizedSeries::new(vec![
            PricePoint::new(date("2023-01-02"), 200.456),
            PricePoint::new(date("2023-01-01"), 100.0),
        ]);

        write_series(&path, &series).unwrap();
        let loaded = read_series(&path).unwrap();

        assert_eq!(loaded, series);
    }

    #[test]
    fn test_file_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("series.csv");
        let series = NormalizedSeries::new(vec![PricePoint::new(date("2023-01-01"), 100.1)]);

        write_series(&path, &series).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert_eq!(text, "index,date,price\n0,2023-01-01,100.10\n");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_series(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(MarketError::Csv(_))));
    }
}
