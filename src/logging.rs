//! # Structured Logging Module
//!
//! Environment-aware structured logging. Every courier runs inside a `courier`
//! span, so each line carries a timestamp, the thread, and the courier identity.
//! The fmt layer writes each event as a single line, which keeps concurrent
//! couriers from interleaving output.

use std::sync::OnceLock;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::{ConfigManager, LoggingConfig};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging. Safe to call more than once; only the first call
/// installs a subscriber.
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = ConfigManager::detect_environment();
        let filter = build_filter(config, &environment);

        let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .json()
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_level(true)
                .boxed()
        };

        // A subscriber may already be installed by a host application or test harness
        if tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - continuing");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            json = config.json,
            "Structured logging initialized"
        );
    });
}

fn build_filter(config: &LoggingConfig, environment: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = config
        .level
        .clone()
        .unwrap_or_else(|| default_level(environment).to_string());
    EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(default_level(environment)))
}

/// Get log level based on environment
fn default_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log an order lifecycle event
pub fn log_order_operation(
    operation: &str,
    order_id: u64,
    destination: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        order_id = order_id,
        destination = %destination,
        status = %status,
        details = details,
        "ORDER_OPERATION"
    );
}

/// Log a courier lifecycle event
pub fn log_courier_operation(courier: &str, operation: &str, status: &str, details: Option<&str>) {
    tracing::info!(
        courier = %courier,
        operation = %operation,
        status = %status,
        details = details,
        "COURIER_OPERATION"
    );
}
