//! # Structured Logging Module
//!
//! Environment-aware structured logging for resolver diagnostics, plus the
//! [`DiagnosticSink`] seam resolvers report normalization failures through.

use chrono::Utc;
use std::fmt;
use std::sync::OnceLock;
use tracing_subscriber::{
    fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// Safe to call repeatedly and safe to call when the host application has
/// already installed its own subscriber.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = std::env::var("RESOLVER_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let result = if json {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_fmt::layer().with_target(true).json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true),
                )
                .try_init()
        };

        if result.is_err() {
            // Host application owns the global subscriber
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            environment = %environment,
            json = json,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("RESOLVER_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// One diagnostic emitted by a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Resolver or normalizer that produced the diagnostic
    pub component: String,
    /// `add`, `resolve`, ...
    pub operation: &'static str,
    /// Display form of the raw key involved
    pub key: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        component: impl Into<String>,
        operation: &'static str,
        key: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            operation,
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// A normalization failure, worded the way operators grep for it.
    pub fn resolution_failure(
        component: impl Into<String>,
        operation: &'static str,
        key: impl ToString,
        cause: impl fmt::Display,
    ) -> Self {
        let component = component.into();
        let key = key.to_string();
        let message =
            format!("Failed to resolve {component} configuration key {key}. Cause: {cause}");
        Self {
            component,
            operation,
            key,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Where resolvers send their diagnostics.
pub trait DiagnosticSink: Send + Sync + fmt::Debug {
    fn error(&self, diagnostic: &Diagnostic);
    fn debug(&self, diagnostic: &Diagnostic);
}

/// Default sink: forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn error(&self, diagnostic: &Diagnostic) {
        log_error(
            &diagnostic.component,
            diagnostic.operation,
            &diagnostic.message,
            Some(&diagnostic.key),
        );
    }

    fn debug(&self, diagnostic: &Diagnostic) {
        tracing::debug!(
            component = %diagnostic.component,
            operation = diagnostic.operation,
            key = %diagnostic.key,
            "{}",
            diagnostic.message
        );
    }
}

/// Log structured data for resolver registry operations
pub fn log_resolver_operation(
    operation: &str,
    resolver: &str,
    entries: usize,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        resolver = %resolver,
        entries = entries,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "RESOLVER_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "RESOLVER_ERROR"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    fn test_resolution_failure_message() {
        let diagnostic = Diagnostic::resolution_failure(
            "relational",
            "resolve",
            ":test",
            "no connection registered under alias 'test'",
        );
        assert_eq!(diagnostic.key, ":test");
        assert_eq!(
            diagnostic.message,
            "Failed to resolve relational configuration key :test. \
             Cause: no connection registered under alias 'test'"
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
        TracingSink.error(&Diagnostic::new("test", "resolve", "k", "message"));
    }
}
