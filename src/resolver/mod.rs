//! # Configuration Resolvers
//!
//! Resolvers map *matchers* to configuration values and select a value for a
//! runtime *probe*.
//!
//! ## Available Resolvers
//!
//! | Resolver | Matcher | Probe | Tie-break |
//! |----------|---------|-------|-----------|
//! | [`Resolver`] | exact key | same key type | n/a (equality) |
//! | [`PatternResolver`] | regex / predicate / literal | any `Display` value | first registered wins |
//! | [`StructuralResolver`] | partial [`Record`](crate::record::Record) | [`Descriptor`](crate::descriptor::Descriptor) | last registered wins (configurable) |
//!
//! ## Lifecycle
//!
//! ```text
//!  integration setup          request processing           configuration reset
//! ┌──────────────────┐       ┌──────────────────┐         ┌──────────────────┐
//! │ add(matcher, v)  │──────►│ resolve(probe)   │──...───►│ reset()          │
//! │ add(...)         │       │ resolve(probe)   │         │                  │
//! └──────────────────┘       └──────────────────┘         └──────────────────┘
//! ```
//!
//! `add` never fails: a matcher that cannot be normalized is reported to the
//! resolver's [`DiagnosticSink`](crate::logging::DiagnosticSink) and is not
//! registered. `resolve` never fails either; normalization errors are
//! reported and treated as "no match". The one exception is a caller-supplied
//! predicate that panics, which unwinds through `resolve` untouched.
//!
//! ## Thread Safety
//!
//! All resolvers are `Send + Sync` for `Send + Sync` values. Reads run on a
//! snapshot and never block each other; see `store` for details.

pub mod base;
pub mod pattern;
pub mod structural;
pub(crate) mod store;

pub use base::{Identity, MatcherNormalizer, Resolver};
pub use pattern::{Pattern, PatternResolver, Predicate};
pub use structural::StructuralResolver;

use serde::{Deserialize, Serialize};

/// The operations every resolver exposes to integration code.
pub trait ConfigurationResolver<V>: Send + Sync {
    /// What callers pass to `add` / `get`, before normalization
    type Matcher;
    /// The normalized matcher as stored
    type Key;
    /// What callers pass to `resolve`
    type Probe: ?Sized;

    /// Register `value` under `matcher` and hand `value` back unchanged.
    fn add(&self, matcher: Self::Matcher, value: V) -> V;

    /// Exact lookup by normalized matcher; no pattern or partial matching.
    fn get(&self, matcher: Self::Matcher) -> Option<V>;

    /// Register `update(existing)` under `matcher`, normalizing it once.
    ///
    /// A matcher that cannot be normalized is reported like in `add`, and
    /// `update(None)` is handed back without being registered.
    fn update<F>(&self, matcher: Self::Matcher, update: F) -> V
    where
        F: FnOnce(Option<V>) -> V,
        Self: Sized;

    /// Select the value for a runtime probe.
    fn resolve(&self, probe: &Self::Probe) -> Option<V>;

    /// Registered matcher/value pairs in insertion order.
    fn configurations(&self) -> Vec<(Self::Key, V)>;

    /// Remove every registration.
    fn reset(&self);

    /// Name used in diagnostics.
    fn resolver_name(&self) -> &str;
}

/// Tie-break rule when several registered matchers accept the same probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// The earliest registration wins
    FirstWins,
    /// The latest registration wins; later `add` calls override earlier ones
    #[default]
    LastWins,
}

impl Precedence {
    /// Pick the winning entry among `entries` (in insertion order) that
    /// satisfy `accepts`.
    pub(crate) fn select<'a, T, F>(self, entries: &'a [T], mut accepts: F) -> Option<&'a T>
    where
        F: FnMut(&T) -> bool,
    {
        match self {
            Precedence::FirstWins => entries.iter().find(|entry| accepts(*entry)),
            Precedence::LastWins => entries.iter().rev().find(|entry| accepts(*entry)),
        }
    }
}
