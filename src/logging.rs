//! Structured logging for Cyberfort Core.
//!
//! Verdicts, remote lookups and HTTP requests are logged through `tracing`.
//! Production output is one JSON object per line so the verdict source
//! (remote or heuristic) can be filtered on.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset: service events plus request spans.
const DEFAULT_FILTER: &str = "cyberfort_core=info,tower_http=info";

/// Install the JSON subscriber for the service.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Readable output captured per test. Safe to call from every test.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("cyberfort_core=debug")
        .try_init();
}
