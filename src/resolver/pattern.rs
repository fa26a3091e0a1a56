//! # Pattern Resolver
//!
//! Resolves probes against regular expressions, predicates and literal
//! strings. The first registered matcher that accepts the probe wins.
//!
//! Regex and literal matchers see the probe's `Display` form; predicates see
//! the probe itself. A regex matches if it finds a match anywhere in that
//! string (anchor it for whole-string matching); a literal requires equality.
//!
//! ```rust
//! use config_resolver::resolver::{ConfigurationResolver, Pattern, PatternResolver};
//! use regex::Regex;
//!
//! let resolver: PatternResolver<&str> = PatternResolver::new();
//! resolver.add(Pattern::regex(Regex::new("^order-").unwrap()), "orders");
//! resolver.add(Pattern::literal("order-42"), "specific");
//!
//! // regex registered first, so it wins
//! assert_eq!(resolver.resolve("order-42"), Some("orders"));
//! assert_eq!(resolver.resolve("invoice-1"), None);
//! ```
//!
//! A predicate that panics unwinds through `resolve`. Predicates run outside
//! the store lock, so the resolver remains usable after such a panic.

use super::store::ConfigurationStore;
use super::ConfigurationResolver;
use crate::logging::{Diagnostic, DiagnosticSink, TracingSink};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied matching function over the raw probe.
pub type Predicate<P> = Arc<dyn Fn(&P) -> bool + Send + Sync>;

/// A pattern matcher. The variant is fixed when the matcher is built.
pub enum Pattern<P: ?Sized = str> {
    Regex(Regex),
    Predicate(Predicate<P>),
    Literal(String),
}

impl<P: ?Sized> Pattern<P> {
    #[must_use]
    pub fn regex(regex: Regex) -> Self {
        Pattern::Regex(regex)
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        Pattern::Predicate(Arc::new(predicate))
    }

    /// Any value is stored as its string form.
    pub fn literal(value: impl ToString) -> Self {
        Pattern::Literal(value.to_string())
    }

    /// Test `probe`. `rendered` supplies the string form on demand.
    fn accepts<'a>(&self, probe: &P, rendered: &mut impl FnMut() -> &'a str) -> bool {
        match self {
            Pattern::Predicate(predicate) => predicate(probe),
            Pattern::Regex(regex) => regex.is_match(rendered()),
            Pattern::Literal(literal) => literal == rendered(),
        }
    }
}

impl<P: ?Sized> Clone for Pattern<P> {
    fn clone(&self) -> Self {
        match self {
            Pattern::Regex(regex) => Pattern::Regex(regex.clone()),
            Pattern::Predicate(predicate) => Pattern::Predicate(Arc::clone(predicate)),
            Pattern::Literal(literal) => Pattern::Literal(literal.clone()),
        }
    }
}

/// Regexes compare by source text, predicates by identity. Builder flags are
/// not part of a regex's identity, so re-adding the same source with other
/// flags replaces the earlier regex.
impl<P: ?Sized> PartialEq for Pattern<P> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::Regex(a), Pattern::Regex(b)) => a.as_str() == b.as_str(),
            (Pattern::Predicate(a), Pattern::Predicate(b)) => Arc::ptr_eq(a, b),
            (Pattern::Literal(a), Pattern::Literal(b)) => a == b,
            _ => false,
        }
    }
}

impl<P: ?Sized> fmt::Display for Pattern<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Regex(regex) => write!(f, "/{}/", regex.as_str()),
            Pattern::Predicate(_) => f.write_str("<predicate>"),
            Pattern::Literal(literal) => write!(f, "{literal:?}"),
        }
    }
}

impl<P: ?Sized> fmt::Debug for Pattern<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<P: ?Sized> From<Regex> for Pattern<P> {
    fn from(regex: Regex) -> Self {
        Pattern::Regex(regex)
    }
}

impl<P: ?Sized> From<&str> for Pattern<P> {
    fn from(literal: &str) -> Self {
        Pattern::Literal(literal.to_string())
    }
}

impl<P: ?Sized> From<String> for Pattern<P> {
    fn from(literal: String) -> Self {
        Pattern::Literal(literal)
    }
}

/// First-registered-wins resolver over [`Pattern`] matchers.
pub struct PatternResolver<V, P: ?Sized = str> {
    store: ConfigurationStore<Pattern<P>, V>,
    sink: Arc<dyn DiagnosticSink>,
    name: String,
}

impl<V: fmt::Debug, P: ?Sized> fmt::Debug for PatternResolver<V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternResolver")
            .field("name", &self.name)
            .field("configurations", &self.store.snapshot())
            .finish()
    }
}

impl<V, P: ?Sized> Default for PatternResolver<V, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, P: ?Sized> PatternResolver<V, P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: ConfigurationStore::default(),
            sink: Arc::new(TracingSink),
            name: "pattern".to_string(),
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

impl<V: Clone, P: ?Sized> PatternResolver<V, P> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn register(&self, operation: &'static str, matcher: Pattern<P>, value: V) {
        let key = matcher.to_string();
        let replaced = self.store.insert(matcher, value);
        self.sink.debug(&Diagnostic::new(
            &self.name,
            operation,
            key,
            if replaced {
                "Replaced existing pattern"
            } else {
                "Registered pattern"
            },
        ));
    }
}

impl<V, P> ConfigurationResolver<V> for PatternResolver<V, P>
where
    V: Clone + Send + Sync,
    P: ?Sized + fmt::Display,
{
    type Matcher = Pattern<P>;
    type Key = Pattern<P>;
    type Probe = P;

    fn add(&self, matcher: Pattern<P>, value: V) -> V {
        self.register("add", matcher, value.clone());
        value
    }

    fn get(&self, matcher: Pattern<P>) -> Option<V> {
        self.store.get(&matcher)
    }

    fn update<F>(&self, matcher: Pattern<P>, update: F) -> V
    where
        F: FnOnce(Option<V>) -> V,
    {
        let value = update(self.store.get(&matcher));
        self.register("update", matcher, value.clone());
        value
    }

    fn resolve(&self, probe: &P) -> Option<V> {
        let entries = self.store.snapshot();
        if entries.is_empty() {
            return None;
        }

        let rendered = std::cell::OnceCell::new();
        let mut render = || rendered.get_or_init(|| probe.to_string()).as_str();

        entries
            .iter()
            .find(|(pattern, _)| pattern.accepts(probe, &mut render))
            .map(|(_, value)| value.clone())
    }

    fn configurations(&self) -> Vec<(Pattern<P>, V)> {
        self.store.snapshot().as_ref().clone()
    }

    fn reset(&self) {
        self.store.clear();
    }

    fn resolver_name(&self) -> &str {
        &self.name
    }
}
