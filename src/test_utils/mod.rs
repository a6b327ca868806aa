//! Test utilities for dicon
//!
//! - [`init_test_logging`] - opt-in tracing output for tests
//! - [`fixtures`] - Go packages covering the generator's scenarios, and a helper to
//!   lay them out on disk

pub mod fixtures;

pub use fixtures::{GoPackageFixture, write_package};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, tests stay silent.
///
/// ```bash
/// RUST_LOG=dicon=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
