//! Validated report input

use market_core::{CompanyOverview, Granularity, NormalizedSeries, Result};

/// Everything a report is built from
///
/// Construction fails fast on a missing metric, so a `ReportInput` always
/// carries a complete overview.
#[derive(Debug, Clone)]
pub struct ReportInput {
    symbol: String,
    overview: CompanyOverview,
    series: Vec<(Granularity, NormalizedSeries)>,
}

impl ReportInput {
    /// Create an input for `symbol`, checking the required metrics
    pub fn new(symbol: impl Into<String>, overview: CompanyOverview) -> Result<Self> {
        overview.validate_required()?;
        Ok(Self {
            symbol: symbol.into(),
            overview,
            series: Vec::new(),
        })
    }

    /// Attach a series, keeping its most recent points in ascending date order
    pub fn with_series(mut self, granularity: Granularity, series: &NormalizedSeries) -> Self {
        let trimmed = series
            .most_recent(granularity.report_points())
            .sorted_ascending();

        self.series.retain(|(g, _)| *g != granularity);
        self.series.push((granularity, trimmed));
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn overview(&self) -> &CompanyOverview {
        &self.overview
    }

    /// Plot-ready series for `granularity`
    pub fn series(&self, granularity: Granularity) -> Option<&NormalizedSeries> {
        self.series
            .iter()
            .find(|(g, _)| *g == granularity)
            .map(|(_, s)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use market_core::{MarketError, PricePoint, REQUIRED_METRICS};

    fn overview() -> CompanyOverview {
        REQUIRED_METRICS
            .iter()
            .fold(CompanyOverview::new(), |o, key| o.with(*key, format!("{key} value")))
    }

    fn newest_first(days: i64) -> NormalizedSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        NormalizedSeries::new(
            (0..days)
                .rev()
                .map(|d| PricePoint::new(start + Duration::days(d), 100.0 + d as f64))
                .collect(),
        )
    }

    #[test]
    fn test_series_truncated_and_sorted() {
        let input = ReportInput::new("IBM", overview())
            .unwrap()
            .with_series(Granularity::Daily, &newest_first(30))
            .with_series(Granularity::Weekly, &newest_first(30));

        let daily = input.series(Granularity::Daily).unwrap();
        assert_eq!(daily.len(), 11);
        assert!(daily.points().windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(daily.points()[10].price, 129.0);

        assert_eq!(input.series(Granularity::Weekly).unwrap().len(), 7);
        assert!(input.series(Granularity::Monthly).is_none());
    }

    #[test]
    fn test_with_series_replaces() {
        let input = ReportInput::new("IBM", overview())
            .unwrap()
            .with_series(Granularity::Monthly, &newest_first(3))
            .with_series(Granularity::Monthly, &newest_first(5));

        assert_eq!(input.series(Granularity::Monthly).unwrap().len(), 5);
    }

    #[test]
    fn test_missing_metric_rejected() {
        let mut partial = CompanyOverview::new();
        partial.insert("Name", "International Business Machines");

        let err = ReportInput::new("IBM", partial).unwrap_err();
        assert!(matches!(err, MarketError::MissingMetric(_)));
    }
}
