use tracing_subscriber::EnvFilter;

/// JSON logs to stderr, filtered by `RUST_LOG` (default `info`).
///
/// Stdout is left for the run result.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
