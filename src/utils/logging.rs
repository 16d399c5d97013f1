//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the EventZen client core.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::{LogFormat, LoggingConfig};
use crate::utils::errors::{ErrorSeverity, EventZenError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, &config.file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    // The file layer carries the configured format; stderr stays human readable
    let initialized = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
            .try_init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
            .try_init(),
    };
    initialized.map_err(|e| EventZenError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {} ({:?} file format)", config.level, config.format);
    Ok(guard)
}

/// Log a registration or cancellation attempt
pub fn log_registration_attempt(event_id: i64, visitor_id: Option<i64>, action: &str, private: bool) {
    info!(
        event_id = event_id,
        visitor_id = visitor_id,
        action = action,
        private = private,
        "Registration action requested"
    );
}

/// Log the eligibility gate decision for an event
pub fn log_gate_decision(event_id: i64, decision: &str) {
    debug!(event_id = event_id, decision = decision, "Eligibility gate evaluated");
}

/// Log API errors with context, at the level given by the error's severity
pub fn log_api_error(endpoint: &str, error: &EventZenError, context: Option<&str>) {
    let recoverable = error.is_recoverable();
    match error.severity() {
        ErrorSeverity::Critical | ErrorSeverity::Error => error!(
            endpoint = endpoint,
            error = %error,
            context = context,
            recoverable = recoverable,
            "API request failed"
        ),
        ErrorSeverity::Warning => warn!(
            endpoint = endpoint,
            error = %error,
            context = context,
            recoverable = recoverable,
            "API request refused"
        ),
        ErrorSeverity::Info => info!(
            endpoint = endpoint,
            error = %error,
            context = context,
            recoverable = recoverable,
            "API request rejected by backend"
        ),
    }
}

/// Log catalog refreshes
pub fn log_catalog_refresh(generation: u64, events: usize, applied: bool) {
    if applied {
        info!(generation = generation, events = events, "Catalog refreshed");
    } else {
        debug!(generation = generation, events = events, "Discarded stale catalog response");
    }
}
