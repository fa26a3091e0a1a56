//! # Integration Configuration
//!
//! Per-integration settings on top of a resolver.
//!
//! An integration (a database client, a cache client, an HTTP client) owns
//! one [`IntegrationConfiguration`]. Settings registered for specific
//! matchers are kept in the resolver; everything else falls back to a lazily
//! created default instance.
//!
//! ```rust
//! use config_resolver::integration::IntegrationConfiguration;
//! use config_resolver::resolver::{Pattern, PatternResolver};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Settings {
//!     service_name: Option<String>,
//! }
//!
//! let resolver: PatternResolver<Arc<Settings>> = PatternResolver::new();
//! let integration = IntegrationConfiguration::new("http", resolver);
//! integration.configure(Some(Pattern::literal("payments.internal")), |settings: &mut Settings| {
//!     settings.service_name = Some("payments".to_string());
//! });
//!
//! assert_eq!(
//!     integration.resolve("payments.internal").service_name.as_deref(),
//!     Some("payments")
//! );
//! assert_eq!(integration.resolve("example.com").service_name, None);
//! assert!(!integration.configuration_for("example.com"));
//! ```

use crate::logging::log_resolver_operation;
use crate::resolver::ConfigurationResolver;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

pub struct IntegrationConfiguration<R, S> {
    name: String,
    resolver: R,
    default: RwLock<Option<Arc<S>>>,
    // serializes read-modify-write in configure
    configure_lock: Mutex<()>,
}

impl<R, S> fmt::Debug for IntegrationConfiguration<R, S>
where
    R: fmt::Debug,
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationConfiguration")
            .field("name", &self.name)
            .field("resolver", &self.resolver)
            .field("default", &*self.default.read())
            .finish()
    }
}

impl<R, S> IntegrationConfiguration<R, S>
where
    R: ConfigurationResolver<Arc<S>>,
    S: Default + Clone + Send + Sync,
{
    pub fn new(name: impl Into<String>, resolver: R) -> Self {
        Self {
            name: name.into(),
            resolver,
            default: RwLock::new(None),
            configure_lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The fallback settings, created on first use and kept until [`reset`](Self::reset).
    pub fn default_configuration(&self) -> Arc<S> {
        if let Some(default) = self.default.read().as_ref() {
            return Arc::clone(default);
        }

        let mut guard = self.default.write();
        Arc::clone(guard.get_or_insert_with(|| Arc::new(S::default())))
    }

    /// Settings registered for exactly `matcher`, or the default.
    ///
    /// `None` asks for the default directly.
    pub fn configuration(&self, matcher: Option<R::Matcher>) -> Arc<S> {
        matcher
            .and_then(|matcher| self.resolver.get(matcher))
            .unwrap_or_else(|| self.default_configuration())
    }

    /// Settings for a runtime probe, or the default when nothing matches.
    pub fn resolve(&self, probe: &R::Probe) -> Arc<S> {
        self.resolver
            .resolve(probe)
            .unwrap_or_else(|| self.default_configuration())
    }

    /// Whether `probe` has settings of its own (the default does not count).
    pub fn configuration_for(&self, probe: &R::Probe) -> bool {
        self.resolver.resolve(probe).is_some()
    }

    /// Create or update the settings for `matcher` (`None` for the default).
    ///
    /// New matchers start from `S::default()`, not from the current default
    /// settings. The updated settings replace the old ones in place.
    pub fn configure<F>(&self, matcher: Option<R::Matcher>, apply: F) -> Arc<S>
    where
        F: FnOnce(&mut S),
    {
        let _guard = self.configure_lock.lock();

        let configured = match matcher {
            None => {
                let mut default = self.default.write();
                let mut settings = default.as_deref().cloned().unwrap_or_default();
                apply(&mut settings);
                Arc::clone(default.insert(Arc::new(settings)))
            }
            Some(matcher) => self.resolver.update(matcher, |existing| {
                let mut settings = existing
                    .map(|existing| (*existing).clone())
                    .unwrap_or_default();
                apply(&mut settings);
                Arc::new(settings)
            }),
        };

        log_resolver_operation(
            "configure",
            &self.name,
            self.resolver.configurations().len(),
            "success",
            None,
        );
        configured
    }

    /// Registered matcher/settings pairs in insertion order.
    pub fn configurations(&self) -> Vec<(R::Key, Arc<S>)> {
        self.resolver.configurations()
    }

    /// Drop every registration and the default instance.
    pub fn reset(&self) {
        let _guard = self.configure_lock.lock();
        self.resolver.reset();
        *self.default.write() = None;
        log_resolver_operation("reset", &self.name, 0, "success", None);
    }
}
