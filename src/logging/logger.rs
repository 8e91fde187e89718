// file: src/logging/logger.rs
// version: 1.2.0
// guid: 5b2e8c71-0a4d-4f3b-9e6c-d18a7f3e42b0

//! Logger initialization and configuration

use crate::error::WizardError;
use crate::Result;
use tracing::Instrument;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pick the filter from the verbosity flags.
///
/// `RUST_LOG` wins over both flags when it is set.
pub fn level_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Initialize the logging system.
///
/// Logs go to stderr so rendered manifests can be piped from stdout.
pub fn init_logger(verbose: bool, quiet: bool, json: bool) -> Result<()> {
    let registry = tracing_subscriber::registry().with(level_filter(verbose, quiet));

    let outcome = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .try_init()
    };

    outcome.map_err(|e| WizardError::config(format!("Failed to initialize logger: {}", e)))
}

/// Run `f` inside a named span
pub fn with_operation_span<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let span = tracing::info_span!("operation", name = operation);
    let _enter = span.enter();
    f()
}

/// Async counterpart of [`with_operation_span`]
pub async fn with_async_operation_span<F, Fut, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    let span = tracing::info_span!("operation", name = operation);
    f().instrument(span).await
}
