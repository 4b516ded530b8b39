//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber with default configuration
///
/// Honors `RUST_LOG`, falling back to `info`.
pub fn init_tracing() {
    init_tracing_with("info");
}

/// Initialize tracing subscriber, using `default_filter` when `RUST_LOG` is unset
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_tracing_with(default_filter: &str) {
    // A subscriber is already installed when this fails
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing_with("debug");
        init_tracing();
        tracing::info!("still logging");
    }
}
