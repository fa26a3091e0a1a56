//! # Structural Resolver
//!
//! Partial-record matching over descriptors normalized by a domain
//! [`Normalizer`].
//!
//! Matchers and probes go through the same normalizer. A stored matcher
//! accepts a probe when every field it populates is equal in the probe
//! record; unpopulated fields are wildcards, so the empty matcher accepts
//! every probe that normalizes.
//!
//! When several matchers accept a probe the latest registration wins by
//! default, so later `add` calls act as overrides:
//!
//! ```rust
//! use config_resolver::descriptor::Descriptor;
//! use config_resolver::normalizers::RelationalNormalizer;
//! use config_resolver::resolver::{ConfigurationResolver, StructuralResolver};
//!
//! let resolver = StructuralResolver::new(RelationalNormalizer::new());
//! resolver.add(Descriptor::fields([("adapter", "mysql2")]), "cfg_a");
//! resolver.add(Descriptor::any(), "cfg_b");
//!
//! let probe = Descriptor::fields([("adapter", "mysql2"), ("host", "x")]);
//! assert_eq!(resolver.resolve(&probe), Some("cfg_b"));
//! ```
//!
//! Use [`Precedence::FirstWins`] through
//! [`with_precedence`](StructuralResolver::with_precedence) for the opposite
//! rule.

use super::store::ConfigurationStore;
use super::{ConfigurationResolver, Precedence};
use crate::config::StructuralConfig;
use crate::descriptor::Descriptor;
use crate::logging::{Diagnostic, DiagnosticSink, TracingSink};
use crate::normalizers::Normalizer;
use crate::record::Record;
use std::fmt;
use std::sync::Arc;

pub struct StructuralResolver<V, N> {
    store: ConfigurationStore<Record, V>,
    normalizer: N,
    precedence: Precedence,
    sink: Arc<dyn DiagnosticSink>,
}

impl<V: fmt::Debug, N: Normalizer> fmt::Debug for StructuralResolver<V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuralResolver")
            .field("normalizer", &self.normalizer.name())
            .field("precedence", &self.precedence)
            .field("configurations", &self.store.snapshot())
            .finish()
    }
}

impl<V, N: Normalizer> StructuralResolver<V, N> {
    /// Last-registered-wins resolver over `normalizer`'s records.
    pub fn new(normalizer: N) -> Self {
        Self {
            store: ConfigurationStore::default(),
            normalizer,
            precedence: Precedence::default(),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn from_config(normalizer: N, config: &StructuralConfig) -> Self {
        Self::new(normalizer).with_precedence(config.precedence)
    }

    #[must_use]
    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    fn normalize(&self, operation: &'static str, descriptor: &Descriptor) -> Option<Record> {
        match self.normalizer.normalize(descriptor) {
            Ok(record) => Some(record),
            Err(error) => {
                self.sink.error(&Diagnostic::resolution_failure(
                    self.normalizer.name(),
                    operation,
                    descriptor,
                    error,
                ));
                None
            }
        }
    }
}

impl<V: Clone, N: Normalizer> StructuralResolver<V, N> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn register(&self, operation: &'static str, record: Record, value: V) {
        let key = record.to_string();
        let replaced = self.store.insert(record, value);
        self.sink.debug(&Diagnostic::new(
            self.normalizer.name(),
            operation,
            key,
            if replaced {
                "Replaced existing matcher"
            } else {
                "Registered matcher"
            },
        ));
    }
}

impl<V, N> ConfigurationResolver<V> for StructuralResolver<V, N>
where
    V: Clone + Send + Sync,
    N: Normalizer,
{
    type Matcher = Descriptor;
    type Key = Record;
    type Probe = Descriptor;

    fn add(&self, matcher: Descriptor, value: V) -> V {
        if let Some(record) = self.normalize("add", &matcher) {
            self.register("add", record, value.clone());
        }
        value
    }

    fn get(&self, matcher: Descriptor) -> Option<V> {
        let record = self.normalize("get", &matcher)?;
        self.store.get(&record)
    }

    fn update<F>(&self, matcher: Descriptor, update: F) -> V
    where
        F: FnOnce(Option<V>) -> V,
    {
        match self.normalize("update", &matcher) {
            Some(record) => {
                let value = update(self.store.get(&record));
                self.register("update", record, value.clone());
                value
            }
            None => update(None),
        }
    }

    fn resolve(&self, probe: &Descriptor) -> Option<V> {
        let probe = self.normalize("resolve", probe)?;
        let entries = self.store.snapshot();

        self.precedence
            .select(entries.as_slice(), |(matcher, _)| matcher.matches(&probe))
            .map(|(_, value)| value.clone())
    }

    fn configurations(&self) -> Vec<(Record, V)> {
        self.store.snapshot().as_ref().clone()
    }

    fn reset(&self) {
        self.store.clear();
    }

    fn resolver_name(&self) -> &str {
        self.normalizer.name()
    }
}
