//! # Error Types
//!
//! Error taxonomy for configuration resolution.
//!
//! Normalization failures never escape `add` or `resolve`: resolvers catch them,
//! report them to their [`DiagnosticSink`](crate::logging::DiagnosticSink) and
//! carry on as "not registered" / "no match". They are still public so that
//! normalizers can be called directly and so callers can build diagnostics.

use thiserror::Error;

/// Raw input that could not be turned into a canonical record or matcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// A symbolic alias has no entry in the alias registry
    #[error("no connection registered under alias '{alias}'")]
    AliasNotFound { alias: String },

    /// A connection URL could not be parsed
    #[error("malformed connection URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    /// A connection URL parsed but uses a scheme the normalizer does not support
    #[error("unsupported URL scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },

    /// The descriptor shape is not accepted by this normalizer
    #[error("{normalizer} normalizer does not accept {kind} descriptors")]
    UnsupportedDescriptor {
        normalizer: String,
        kind: &'static str,
    },

    /// A field carried a value that cannot be represented in the canonical record
    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    /// A JSON document could not be converted into a descriptor
    #[error("cannot build a descriptor from JSON: {0}")]
    InvalidJson(String),

    /// A custom matcher normalizer refused the matcher
    #[error("matcher rejected: {0}")]
    Rejected(String),
}

impl NormalizationError {
    pub fn malformed_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_field(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Failures while loading or validating [`ResolverConfig`](crate::config::ResolverConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The configuration sources could not be read or deserialized
    #[error("Failed to load resolver configuration: {0}")]
    Load(String),

    /// A value was read but is not acceptable
    #[error("Invalid value '{value}' for field '{field}': {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },
}

impl ConfigurationError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl ToString,
        context: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            context: context.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(error: config::ConfigError) -> Self {
        ConfigurationError::Load(error.to_string())
    }
}

/// Top-level error for fallible crate entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

pub type ResolverResult<T> = Result<T, ResolverError>;
