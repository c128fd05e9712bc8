use tracing_subscriber::EnvFilter;

/// Initialize structured logging for the CLI.
///
/// Honors RUST_LOG; defaults to "info" when unset.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
