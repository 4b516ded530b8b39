//! Alpha Vantage provider client

pub mod alpha_vantage;
pub mod response;

pub use alpha_vantage::{AlphaVantageClient, ApiFunction, OutputSize};
pub use response::{ProviderError, ProviderErrorKind, ProviderResponse};
