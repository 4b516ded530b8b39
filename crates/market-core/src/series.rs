//! Normalized price series
//!
//! A [`NormalizedSeries`] is the canonical two-column `{date, price}` shape
//! every provider series is reduced to before charting or persistence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling period of a price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// All granularities in report order
    pub const ALL: [Granularity; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    /// Label used in chart titles and image file names
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily (Hrs)",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    /// Number of most recent points shown in the report
    pub fn report_points(&self) -> usize {
        match self {
            Self::Daily => 11,
            Self::Weekly => 7,
            Self::Monthly => 11,
        }
    }

    /// File name of the rendered chart
    pub fn plot_file_name(&self) -> String {
        format!("{}_plot.png", self.label())
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// One observation of a normalized series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    /// Create a point, rounding the price to cents
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price: round_cents(price),
        }
    }
}

/// Round to two decimal places
///
/// Rounds the exact binary value with ties to even, so `2.675` (stored just
/// below) becomes `2.67` and `0.125` becomes `0.12`.
pub fn round_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Ordered `{date, price}` series
///
/// Rows keep the order they were created in (the provider returns newest
/// first). Use [`NormalizedSeries::sorted_ascending`] before plotting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    points: Vec<PricePoint>,
}

impl NormalizedSeries {
    /// Create a series from points, keeping their order
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Points in stored order
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over points in stored order
    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    /// The `n` newest points, newest first
    pub fn most_recent(&self, n: usize) -> Self {
        let mut points = self.points.clone();
        points.sort_by(|a, b| b.date.cmp(&a.date));
        points.truncate(n);
        Self { points }
    }

    /// Copy of the series sorted by date, oldest first
    pub fn sorted_ascending(&self) -> Self {
        let mut points = self.points.clone();
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    /// Lowest and highest price, if any
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.price;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.min(p.price), hi.max(p.price))
        }))
    }
}

impl From<Vec<PricePoint>> for NormalizedSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}

impl<'a> IntoIterator for &'a NormalizedSeries {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> NormalizedSeries {
        NormalizedSeries::new(vec![
            PricePoint::new(date("2023-01-05"), 105.0),
            PricePoint::new(date("2023-01-04"), 104.0),
            PricePoint::new(date("2023-01-03"), 101.5),
            PricePoint::new(date("2023-01-02"), 110.25),
        ])
    }

    #[test]
    fn test_price_rounding() {
        assert_eq!(PricePoint::new(date("2023-01-01"), 100.123).price, 100.12);
        assert_eq!(PricePoint::new(date("2023-01-01"), 200.456).price, 200.46);
        assert_eq!(round_cents(0.0), 0.0);
    }

    #[test]
    fn test_price_rounding_ties() {
        assert_eq!(round_cents(100.125), 100.12);
        assert_eq!(round_cents(0.125), 0.12);
        assert_eq!(round_cents(2.675), 2.67);
        assert_eq!(round_cents(141.375), 141.38);
    }

    #[test]
    fn test_most_recent_then_sort() {
        let recent = sample().most_recent(3).sorted_ascending();
        let dates: Vec<_> = recent.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date("2023-01-03"), date("2023-01-04"), date("2023-01-05")]
        );
    }

    #[test]
    fn test_most_recent_ignores_stored_order() {
        let ascending = sample().sorted_ascending();
        let recent = ascending.most_recent(2);
        assert_eq!(recent.points()[0].date, date("2023-01-05"));
        assert_eq!(recent.points()[1].date, date("2023-01-04"));
    }

    #[test]
    fn test_most_recent_larger_than_series() {
        assert_eq!(sample().most_recent(11).len(), 4);
    }

    #[test]
    fn test_price_bounds() {
        assert_eq!(sample().price_bounds(), Some((101.5, 110.25)));
        assert_eq!(NormalizedSeries::default().price_bounds(), None);
    }

    #[test]
    fn test_granularity_labels() {
        assert_eq!(Granularity::Daily.plot_file_name(), "Daily (Hrs)_plot.png");
        assert_eq!(Granularity::Weekly.plot_file_name(), "Weekly_plot.png");
        assert_eq!(Granularity::Monthly.plot_file_name(), "Monthly_plot.png");
        assert_eq!(Granularity::Weekly.report_points(), 7);
        assert_eq!(Granularity::Monthly.to_string(), "monthly");
    }
}
