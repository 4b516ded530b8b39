//! Core types for the financial market analyzer
//!
//! This crate defines the data shared between the provider client, the
//! normalization pipeline, and the report renderer.

pub mod error;
pub mod overview;
pub mod series;

pub use error::{MarketError, Result};
pub use overview::{CompanyOverview, REQUIRED_METRICS};
pub use series::{Granularity, NormalizedSeries, PricePoint};
