//! Test harness helpers.

use tracing_subscriber::EnvFilter;

/// Route engine logs to the test writer.
///
/// Honors `RUST_LOG`; defaults to `popguard_core=debug`. Safe to call from
/// every test: only the first call installs a subscriber.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("popguard_core=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
    tracing::trace!("test logging initialized");
}
