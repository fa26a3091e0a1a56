//! # Domain Normalizers
//!
//! Normalizers turn a raw [`Descriptor`] into the canonical [`Record`] of
//! their domain. The structural resolver runs matchers and probes through
//! the same normalizer, so both sides always share one record shape.
//!
//! | Normalizer | Schema fields |
//! |------------|---------------|
//! | [`RelationalNormalizer`] | `adapter, host, port, database, username, role` |
//! | [`CacheNormalizer`] | `url, host, port, db, scheme` |
//!
//! Normalization is deterministic. Failures (unknown alias, malformed URL)
//! come back as [`NormalizationError`]; [`Normalizer::normalize_total`] turns
//! them into a logged, all-absent record for callers that need a value no
//! matter what.

pub mod alias;
pub mod cache;
pub mod relational;

pub use alias::{AliasLookup, AliasRegistry, StaticAliasRegistry};
pub use cache::{CacheNormalizer, CACHE_SCHEMA};
pub use relational::{RelationalNormalizer, RELATIONAL_SCHEMA};

use crate::descriptor::Descriptor;
use crate::error::NormalizationError;
use crate::logging::{Diagnostic, DiagnosticSink};
use crate::record::{Record, Scalar, Schema};

/// Maps raw descriptors of one resource type onto canonical records.
pub trait Normalizer: Send + Sync {
    /// The record layout this normalizer produces.
    fn schema(&self) -> &'static Schema;

    /// Name used in diagnostics, e.g. `relational`.
    fn name(&self) -> &str;

    fn normalize(&self, descriptor: &Descriptor) -> Result<Record, NormalizationError>;

    /// Like [`normalize`](Self::normalize), but never fails: on error the
    /// failure goes to `sink` and the all-absent record is returned.
    fn normalize_total(&self, descriptor: &Descriptor, sink: &dyn DiagnosticSink) -> Record {
        match self.normalize(descriptor) {
            Ok(record) => record,
            Err(error) => {
                sink.error(&Diagnostic::resolution_failure(
                    self.name(),
                    "normalize",
                    descriptor,
                    error,
                ));
                Record::empty(self.schema())
            }
        }
    }
}

impl<N: Normalizer + ?Sized> Normalizer for std::sync::Arc<N> {
    fn schema(&self) -> &'static Schema {
        (**self).schema()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn normalize(&self, descriptor: &Descriptor) -> Result<Record, NormalizationError> {
        (**self).normalize(descriptor)
    }
}

/// Read an integer-valued field, accepting numeric strings.
pub(crate) fn integer_field(field: &str, value: &Scalar) -> Result<i64, NormalizationError> {
    value.to_int().ok_or_else(|| {
        NormalizationError::invalid_field(field, value.to_string(), "expected an integer")
    })
}
