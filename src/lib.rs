pub mod commands;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod store;
pub mod youtube;

use tracing_subscriber::EnvFilter;

/// Route `log` records to stderr, at `info` unless `RUST_LOG` says otherwise.
/// Stdout stays free for each binary's summary.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
