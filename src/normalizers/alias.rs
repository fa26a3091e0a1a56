//! Symbolic alias lookup.
//!
//! An [`AliasRegistry`] maps names like `primary` to the descriptor they
//! stand for. [`AliasLookup`] is the per-normalizer handle to it: the
//! registry itself is built on first use and successful lookups are
//! memoized, so repeated probes with the same alias do not hit the registry
//! again.

use crate::descriptor::Descriptor;
use crate::error::NormalizationError;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Source of alias definitions.
pub trait AliasRegistry: Send + Sync {
    fn lookup(&self, alias: &str) -> Option<Descriptor>;
}

/// In-memory registry, e.g. built from application settings at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticAliasRegistry {
    entries: HashMap<String, Descriptor>,
}

impl StaticAliasRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, descriptor: Descriptor) -> Self {
        self.entries.insert(alias.into(), descriptor);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Descriptor)> for StaticAliasRegistry {
    fn from_iter<I: IntoIterator<Item = (S, Descriptor)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(alias, descriptor)| (alias.into(), descriptor))
                .collect(),
        }
    }
}

impl AliasRegistry for StaticAliasRegistry {
    fn lookup(&self, alias: &str) -> Option<Descriptor> {
        self.entries.get(alias).cloned()
    }
}

type RegistryFactory = Box<dyn Fn() -> Arc<dyn AliasRegistry> + Send + Sync>;

/// Lazily initialized, memoizing view of an [`AliasRegistry`].
pub struct AliasLookup {
    factory: RegistryFactory,
    registry: OnceLock<Arc<dyn AliasRegistry>>,
    resolved: DashMap<String, Descriptor>,
}

impl AliasLookup {
    /// Use an already-built registry.
    pub fn new(registry: Arc<dyn AliasRegistry>) -> Self {
        Self::lazy(move || Arc::clone(&registry))
    }

    /// Build the registry with `factory` the first time an alias is looked up.
    pub fn lazy<F>(factory: F) -> Self
    where
        F: Fn() -> Arc<dyn AliasRegistry> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            registry: OnceLock::new(),
            resolved: DashMap::new(),
        }
    }

    /// A lookup that knows no aliases.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Arc::new(StaticAliasRegistry::new()))
    }

    pub fn resolve(&self, alias: &str) -> Result<Descriptor, NormalizationError> {
        if let Some(descriptor) = self.resolved.get(alias) {
            return Ok(descriptor.clone());
        }

        let registry = self.registry.get_or_init(|| (self.factory)());
        let descriptor = registry
            .lookup(alias)
            .ok_or_else(|| NormalizationError::AliasNotFound {
                alias: alias.to_string(),
            })?;

        self.resolved.insert(alias.to_string(), descriptor.clone());
        Ok(descriptor)
    }

    /// Whether the registry has been built yet.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.registry.get().is_some()
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.resolved.len()
    }
}

impl Default for AliasLookup {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for AliasLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasLookup")
            .field("initialized", &self.is_initialized())
            .field("cached", &self.cached_len())
            .finish()
    }
}
