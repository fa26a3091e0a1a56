#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, Redis in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Config Resolver
//!
//! Selects the configuration registered for a runtime resource instance.
//!
//! ## Overview
//!
//! Integrations register configuration values against *matchers* during
//! setup and look them up for every call they instrument. A probe can be a
//! service name, a URL, or a connection descriptor; the matching discipline
//! depends on the resolver:
//!
//! - **Exact** ([`Resolver`]): equality on a normalized key.
//! - **Pattern** ([`PatternResolver`]): regexes, predicates and literal
//!   strings, first registered wins.
//! - **Structural** ([`StructuralResolver`]): partial records where missing
//!   fields are wildcards, last registered wins by default.
//!
//! Structural resolution runs every matcher and probe through a domain
//! [`Normalizer`] so that `"mysql2://db:3306/app"`, `{adapter: "mysql2",
//! host: "db", port: "3306", database: "app"}` and an alias pointing at
//! either all compare as the same canonical [`Record`].
//!
//! ## Module Organization
//!
//! - [`record`] - Canonical records and their compatibility rule
//! - [`descriptor`] - Raw resource descriptors
//! - [`resolver`] - Exact, pattern and structural resolvers
//! - [`normalizers`] - Relational and cache normalizers, alias lookup
//! - [`integration`] - Per-integration settings with a default fallback
//! - [`config`] - Resolver settings from TOML and environment
//! - [`logging`] - Structured logging and diagnostic sinks
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use config_resolver::{
//!     ConfigurationResolver, Descriptor, RelationalNormalizer, StructuralResolver,
//! };
//!
//! let resolver = StructuralResolver::new(RelationalNormalizer::new());
//! resolver.add(Descriptor::any(), "default");
//! resolver.add(Descriptor::fields([("role", "replica")]), "replicas");
//!
//! let probe = Descriptor::fields([("adapter", "postgresql"), ("name", "replica/1")]);
//! assert_eq!(resolver.resolve(&probe), Some("replicas"));
//!
//! // Unparseable input is logged and treated as "no match"
//! assert_eq!(resolver.resolve(&Descriptor::url("://bad")), None);
//! ```
//!
//! ## Thread Safety
//!
//! Resolvers are meant to be shared (one per integration) and queried from
//! many threads. Reads work on a snapshot and do not block each other.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod integration;
pub mod logging;
pub mod normalizers;
pub mod record;
pub mod resolver;

pub use config::{CacheConfig, RelationalConfig, ResolverConfig, StructuralConfig};
pub use descriptor::Descriptor;
pub use error::{ConfigurationError, NormalizationError, ResolverError, ResolverResult};
pub use integration::IntegrationConfiguration;
pub use logging::{init_structured_logging, Diagnostic, DiagnosticSink, TracingSink};
pub use normalizers::{
    AliasLookup, AliasRegistry, CacheNormalizer, Normalizer, RelationalNormalizer,
    StaticAliasRegistry, CACHE_SCHEMA, RELATIONAL_SCHEMA,
};
pub use record::{Record, Scalar, Schema};
pub use resolver::{
    ConfigurationResolver, Identity, MatcherNormalizer, Pattern, PatternResolver, Precedence,
    Resolver, StructuralResolver,
};
