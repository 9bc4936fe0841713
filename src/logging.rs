/*!
 * Logging for transfer endpoints
 *
 * Comet logs through `tracing`. Every ingest and every fetch drain runs
 * inside a `transfer` span carrying the locator, so store, builder, and
 * channel events correlate per transfer without threading the name through
 * each call site.
 */

use std::fs::File;
use std::sync::Arc;

use comet_core_manifest::Name;
use tracing::{info_span, Span};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::TransferConfig;
use crate::error::{CometError, Result};

/// Span wrapping one transfer operation, producer ingest or consumer fetch.
///
/// Entered by `FileRepo::load_file` and `ManifestFetcher::fetch_to_writer`.
pub fn transfer_span(locator: &Name) -> Span {
    info_span!("transfer", locator = %locator)
}

/// Filter scoping the configured level to this crate, so dependency noise
/// stays out of transfer logs.
fn transfer_filter(config: &TransferConfig) -> EnvFilter {
    let directive = format!("comet={}", config.log_level.to_tracing_level())
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    EnvFilter::default().add_directive(directive)
}

/// Install the global subscriber.
///
/// Events go to stdout in a compact human-readable form, or as JSON lines
/// when the configuration names a log file. An explicit `RUST_LOG` takes
/// precedence over the configured level.
pub fn init_logging(config: &TransferConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| transfer_filter(config));

    let installed = match &config.log_file {
        Some(path) => {
            let sink = File::create(path).map_err(|e| {
                CometError::config(format!("cannot create log file {}: {}", path.display(), e))
            })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_writer(Arc::new(sink))
                .with_ansi(false)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .try_init(),
    };

    installed.map_err(|e| CometError::config(format!("failed to install subscriber: {}", e)))
}

/// Test-writer subscriber; safe to call from any number of tests.
#[cfg(test)]
pub fn init_test_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("comet=debug"))
        .with_test_writer()
        .compact()
        .try_init()
        .ok();
}
