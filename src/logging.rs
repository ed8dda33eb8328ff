//! # Structured Logging Module
//!
//! Environment-aware structured logging for the data layer. Every lifecycle
//! and cache event is a `tracing` event with an `event` field naming it
//! (`kv_hit`, `db_ws_init_failed`, ...), so hosts can filter on the name
//! regardless of output format.
//!
//! Console output by default; `LOG_FORMAT=json` switches to one JSON object
//! per line. `RUST_LOG` overrides the environment-derived level.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

pub const LOG_FORMAT: &str = "LOG_FORMAT";

/// Initialize structured logging with environment-specific configuration
///
/// Safe to call more than once and safe to call when the host already
/// installed a global subscriber.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let json = std::env::var(LOG_FORMAT)
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let layer = if json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .boxed()
        };

        if tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            json = json,
            "Structured logging initialized"
        );
    });
}

/// Current environment name: `CINESCORE_ENV`, then `APP_ENV`, then `development`
pub fn get_environment() -> String {
    environment_from(|name| std::env::var(name).ok())
}

fn environment_from<F: Fn(&str) -> Option<String>>(lookup: F) -> String {
    [crate::config::CINESCORE_ENV, crate::config::APP_ENV]
        .into_iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "development".to_string())
}

/// Get log level based on environment
pub fn get_log_level(environment: &str) -> String {
    match environment {
        "test" => "debug".to_string(),
        "development" => "debug".to_string(),
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_environment_detection() {
        assert_eq!(
            environment_from(lookup(&[("CINESCORE_ENV", "test"), ("APP_ENV", "production")])),
            "test"
        );
        assert_eq!(environment_from(lookup(&[("APP_ENV", "production")])), "production");
        assert_eq!(environment_from(lookup(&[("CINESCORE_ENV", " ")])), "development");
        assert_eq!(environment_from(lookup(&[])), "development");
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
        assert!(LOGGER_INITIALIZED.get().is_some());
    }
}
