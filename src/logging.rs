// Logging module for structured logging using the tracing crate

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for structured logging.
///
/// Log level defaults to INFO and can be overridden with `RUST_LOG`
/// (e.g. `RUST_LOG=manzara=debug`). Output goes to stdout so scheduled
/// runs under cron or CI capture it directly.
///
/// Calling this twice returns an error from the underlying registry;
/// callers are expected to initialize exactly once at process entry.
pub fn init_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()?;

    Ok(())
}
