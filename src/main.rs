//! ODBC probe - main entry point.
//!
//! One-shot console diagnostic: enumerates the host's ODBC drivers and
//! data sources, connects to each reachable source, and prints a bounded
//! Markdown preview of every base table on stdout.

use odbc_probe::config::Settings;
use odbc_probe::registry::Store;
use odbc_probe::runner;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Diagnostics go to stderr; stdout carries only the rendered previews.
fn init_tracing(settings: &Settings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if settings.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing settings file is fine; a malformed one is not.
    let settings = Settings::load()?;

    init_tracing(&settings);

    info!("Starting ODBC probe v{}", env!("CARGO_PKG_VERSION"));

    let store = Store::discover();
    let summary = runner::run(&settings, &store);

    if let Err(e) = summary.into_result() {
        error!(error = %e, "Probe finished with failures");
        return Err(e.into());
    }

    info!("Probe complete");
    Ok(())
}
