//! # Base Resolver
//!
//! Ordered matcher → value mapping with exact-equality resolution.
//!
//! Matchers pass through a [`MatcherNormalizer`] hook before they are stored
//! or looked up. The default hook, [`Identity`], stores matchers unchanged.
//! A hook that fails makes `add` a logged no-op.
//!
//! ```rust
//! use config_resolver::resolver::{ConfigurationResolver, Resolver};
//!
//! let resolver: Resolver<&str, u32> = Resolver::new();
//! assert_eq!(resolver.add("orders", 1), 1);
//! assert_eq!(resolver.resolve(&"orders"), Some(1));
//! assert_eq!(resolver.resolve(&"billing"), None);
//! ```

use super::store::ConfigurationStore;
use super::ConfigurationResolver;
use crate::error::NormalizationError;
use crate::logging::{Diagnostic, DiagnosticSink, TracingSink};
use std::fmt;
use std::sync::Arc;

/// Hook converting a raw matcher into the stored key.
pub trait MatcherNormalizer<K>: Send + Sync {
    fn normalize_matcher(&self, matcher: K) -> Result<K, NormalizationError>;
}

/// Stores matchers as given.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl<K> MatcherNormalizer<K> for Identity {
    fn normalize_matcher(&self, matcher: K) -> Result<K, NormalizationError> {
        Ok(matcher)
    }
}

impl<K, F> MatcherNormalizer<K> for F
where
    F: Fn(K) -> Result<K, NormalizationError> + Send + Sync,
{
    fn normalize_matcher(&self, matcher: K) -> Result<K, NormalizationError> {
        self(matcher)
    }
}

/// Exact-match resolver.
pub struct Resolver<K, V, N = Identity> {
    store: ConfigurationStore<K, V>,
    normalizer: N,
    sink: Arc<dyn DiagnosticSink>,
    name: String,
}

impl<K, V, N> fmt::Debug for Resolver<K, V, N>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("name", &self.name)
            .field("configurations", &self.store.snapshot())
            .finish()
    }
}

impl<K, V> Default for Resolver<K, V, Identity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Resolver<K, V, Identity> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_normalizer(Identity)
    }
}

impl<K, V, N> Resolver<K, V, N> {
    /// Create a resolver that normalizes matchers through `normalizer`.
    #[must_use]
    pub fn with_normalizer(normalizer: N) -> Self {
        Self {
            store: ConfigurationStore::default(),
            normalizer,
            sink: Arc::new(TracingSink),
            name: "base".to_string(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }
}

impl<K, V, N> Resolver<K, V, N>
where
    K: Clone + PartialEq + fmt::Debug,
    V: Clone,
    N: MatcherNormalizer<K>,
{
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn normalize(&self, operation: &'static str, matcher: K) -> Option<K> {
        let raw = format!("{matcher:?}");
        match self.normalizer.normalize_matcher(matcher) {
            Ok(key) => Some(key),
            Err(error) => {
                self.sink.error(&Diagnostic::resolution_failure(
                    &self.name, operation, raw, error,
                ));
                None
            }
        }
    }
}

impl<K, V, N> Resolver<K, V, N>
where
    K: Clone + PartialEq + fmt::Debug,
    V: Clone,
{
    fn register(&self, operation: &'static str, key: K, value: V) {
        let rendered = format!("{key:?}");
        let replaced = self.store.insert(key, value);
        self.sink.debug(&Diagnostic::new(
            &self.name,
            operation,
            rendered,
            if replaced {
                "Replaced existing matcher"
            } else {
                "Registered matcher"
            },
        ));
    }
}

impl<K, V, N> ConfigurationResolver<V> for Resolver<K, V, N>
where
    K: Clone + PartialEq + fmt::Debug + Send + Sync,
    V: Clone + Send + Sync,
    N: MatcherNormalizer<K>,
{
    type Matcher = K;
    type Key = K;
    type Probe = K;

    fn add(&self, matcher: K, value: V) -> V {
        if let Some(key) = self.normalize("add", matcher) {
            self.register("add", key, value.clone());
        }
        value
    }

    fn get(&self, matcher: K) -> Option<V> {
        let key = self.normalize("get", matcher)?;
        self.store.get(&key)
    }

    fn update<F>(&self, matcher: K, update: F) -> V
    where
        F: FnOnce(Option<V>) -> V,
    {
        match self.normalize("update", matcher) {
            Some(key) => {
                let value = update(self.store.get(&key));
                self.register("update", key, value.clone());
                value
            }
            None => update(None),
        }
    }

    fn resolve(&self, probe: &K) -> Option<V> {
        self.store.get(probe)
    }

    fn configurations(&self) -> Vec<(K, V)> {
        self.store.snapshot().as_ref().clone()
    }

    fn reset(&self) {
        self.store.clear();
    }

    fn resolver_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct RecordingSink {
        errors: Mutex<Vec<Diagnostic>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn error(&self, diagnostic: &Diagnostic) {
            self.errors.lock().push(diagnostic.clone());
        }

        fn debug(&self, _diagnostic: &Diagnostic) {}
    }

    #[test]
    fn test_add_returns_value_unchanged() {
        let resolver: Resolver<String, Arc<str>> = Resolver::new();
        let config: Arc<str> = Arc::from("config");

        let returned = resolver.add("key".to_string(), Arc::clone(&config));
        assert!(Arc::ptr_eq(&returned, &config));
    }

    #[test]
    fn test_add_stores_in_configurations() {
        let resolver = Resolver::new();
        resolver.add("key", 1);
        assert_eq!(resolver.configurations(), vec![("key", 1)]);
    }

    #[test]
    fn test_resolve_with_matching_key() {
        let resolver = Resolver::new();
        resolver.add("key", "config");
        assert_eq!(resolver.resolve(&"key"), Some("config"));
    }

    #[test]
    fn test_resolve_with_different_key() {
        let resolver = Resolver::new();
        resolver.add("different_value", "config");
        assert_eq!(resolver.resolve(&"key"), None);
    }

    #[test]
    fn test_resolve_without_matchers() {
        let resolver: Resolver<&str, &str> = Resolver::new();
        assert_eq!(resolver.resolve(&"key"), None);
    }

    #[test]
    fn test_readd_replaces_value_in_place() {
        let resolver = Resolver::new();
        resolver.add("a", 1);
        resolver.add("b", 2);
        resolver.add("a", 3);
        assert_eq!(resolver.configurations(), vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn test_normalizer_hook_applies_to_add_and_get() {
        let resolver = Resolver::with_normalizer(|key: String| {
            Ok::<_, NormalizationError>(key.to_lowercase())
        });
        resolver.add("Orders".to_string(), 1);

        assert_eq!(resolver.get("ORDERS".to_string()), Some(1));
        assert_eq!(resolver.configurations(), vec![("orders".to_string(), 1)]);
        // resolve is exact and does not normalize the probe
        assert_eq!(resolver.resolve(&"Orders".to_string()), None);
        assert_eq!(resolver.resolve(&"orders".to_string()), Some(1));
    }

    #[test]
    fn test_failed_normalization_is_logged_noop() {
        let sink = Arc::new(RecordingSink::default());
        let resolver = Resolver::with_normalizer(|key: String| {
            if key.is_empty() {
                Err(NormalizationError::Rejected("empty matcher".to_string()))
            } else {
                Ok(key)
            }
        })
        .with_name("named")
        .with_sink(sink.clone());

        assert_eq!(resolver.add(String::new(), 7), 7);
        assert!(resolver.is_empty());

        let errors = sink.errors.lock();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].operation, "add");
        assert!(errors[0].message.contains("named"));
        assert!(errors[0].message.contains("empty matcher"));
    }

    #[test]
    fn test_update_normalizes_once() {
        let sink = Arc::new(RecordingSink::default());
        let resolver = Resolver::with_normalizer(|key: String| {
            if key.is_empty() {
                Err(NormalizationError::Rejected("empty matcher".to_string()))
            } else {
                Ok(key.to_lowercase())
            }
        })
        .with_sink(sink.clone());

        assert_eq!(resolver.update(String::new(), |existing| existing.unwrap_or(0) + 1), 1);
        assert!(resolver.is_empty());

        resolver.update("Orders".to_string(), |existing| existing.unwrap_or(0) + 1);
        resolver.update("ORDERS".to_string(), |existing| existing.unwrap_or(0) + 1);
        assert_eq!(resolver.configurations(), vec![("orders".to_string(), 2)]);

        let errors = sink.errors.lock();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].operation, "update");
    }

    #[test]
    fn test_reset_clears() {
        let resolver = Resolver::new();
        resolver.add(1, "one");
        resolver.reset();
        assert!(resolver.is_empty());
        assert_eq!(resolver.resolve(&1), None);
    }
}
