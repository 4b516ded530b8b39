//! Shared utilities for the financial market analyzer
//!
//! This crate provides logging setup and the on-disk output layout used by
//! the normalizer, the chart renderer, and the PDF builder.

pub mod config;
pub mod logging;

pub use config::OutputLayout;
pub use logging::{init_tracing, init_tracing_with};
