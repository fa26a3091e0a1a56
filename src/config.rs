//! # Resolver Configuration
//!
//! Settings that tune resolver behavior, loaded from an optional TOML file
//! layered under `RESOLVER__*` environment variables.
//!
//! ```toml
//! [structural]
//! precedence = "last_wins"   # or "first_wins"
//!
//! [cache]
//! default_host = "127.0.0.1"
//! default_port = 6379
//! default_db = 0
//! default_scheme = "redis"
//!
//! [relational]
//! derive_role = true
//!
//! [relational.adapter_aliases]
//! postgres = "postgresql"
//! ```
//!
//! Environment overrides use `__` as the separator, e.g.
//! `RESOLVER__STRUCTURAL__PRECEDENCE=first_wins`.

use crate::error::ConfigurationError;
use crate::resolver::Precedence;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

pub const ENV_PREFIX: &str = "RESOLVER";
pub const ENV_SEPARATOR: &str = "__";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub structural: StructuralConfig,
    pub cache: CacheConfig,
    pub relational: RelationalConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StructuralConfig {
    /// Which compatible matcher wins when several match a probe
    pub precedence: Precedence,
}

/// Defaults the cache normalizer fills in for TCP descriptors
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub default_host: String,
    pub default_port: u16,
    pub default_db: i64,
    pub default_scheme: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_host: "127.0.0.1".to_string(),
            default_port: 6379,
            default_db: 0,
            default_scheme: "redis".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelationalConfig {
    /// Derive `role` from `name` values like `replica/2`
    pub derive_role: bool,
    /// URL scheme → adapter name rewrites
    pub adapter_aliases: BTreeMap<String, String>,
}

impl Default for RelationalConfig {
    fn default() -> Self {
        Self {
            derive_role: true,
            adapter_aliases: BTreeMap::from([("postgres".to_string(), "postgresql".to_string())]),
        }
    }
}

impl ResolverConfig {
    /// Load from process environment only.
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::load_from(None)
    }

    /// Load from an optional TOML file plus process environment.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        Self::build(path, Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
    }

    /// Load with an explicit environment map instead of the process environment.
    ///
    /// Useful for tests that must not touch global environment variables.
    pub fn load_with_env(
        path: Option<&Path>,
        vars: HashMap<String, String>,
    ) -> Result<Self, ConfigurationError> {
        Self::build(
            path,
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .source(Some(vars.into_iter().collect())),
        )
    }

    fn build(path: Option<&Path>, environment: Environment) -> Result<Self, ConfigurationError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "Loading resolver configuration file");
            builder = builder.add_source(File::from(path).required(false));
        }

        let config: ResolverConfig = builder
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.cache.default_host.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "cache.default_host",
                &self.cache.default_host,
                "default host must not be empty",
            ));
        }
        if self.cache.default_port == 0 {
            return Err(ConfigurationError::invalid_value(
                "cache.default_port",
                self.cache.default_port,
                "default port must be non-zero",
            ));
        }
        if self.cache.default_scheme.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "cache.default_scheme",
                &self.cache.default_scheme,
                "default scheme must not be empty",
            ));
        }
        if self.cache.default_db < 0 {
            return Err(ConfigurationError::invalid_value(
                "cache.default_db",
                self.cache.default_db,
                "default db must not be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.structural.precedence, Precedence::LastWins);
        assert_eq!(config.cache.default_host, "127.0.0.1");
        assert_eq!(config.cache.default_port, 6379);
        assert_eq!(config.cache.default_db, 0);
        assert_eq!(config.cache.default_scheme, "redis");
        assert!(config.relational.derive_role);
        assert_eq!(
            config.relational.adapter_aliases.get("postgres").map(String::as_str),
            Some("postgresql")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = ResolverConfig::default();
        config.cache.default_port = 0;
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("cache.default_port"));
    }

    #[test]
    fn test_validate_rejects_empty_scheme() {
        let mut config = ResolverConfig::default();
        config.cache.default_scheme = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_with_empty_env_uses_defaults() {
        let config = ResolverConfig::load_with_env(None, HashMap::new()).unwrap();
        assert_eq!(config, ResolverConfig::default());
    }
}
