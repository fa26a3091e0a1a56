//! Relational database connection descriptors.
//!
//! Accepted shapes:
//!
//! - alias (`:primary`), looked up in the [`AliasLookup`] and normalized as
//!   whatever it stands for
//! - connection URL (`postgres://app@db.internal:5432/orders`)
//! - settings map (`{adapter: "mysql2", host: "db", port: 3306}`), optionally
//!   carrying a `url` key whose components override the map's own values
//!
//! Only `adapter, host, port, database, username, role` survive; anything
//! else is dropped. A `name` like `replica/2` contributes `role = "replica"`,
//! which lets matchers select connections by role alone.

use super::alias::{AliasLookup, AliasRegistry};
use super::{integer_field, Normalizer};
use crate::config::RelationalConfig;
use crate::descriptor::Descriptor;
use crate::error::NormalizationError;
use crate::record::{Record, Scalar, Schema};
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

pub static RELATIONAL_SCHEMA: Schema = Schema::new(
    "relational",
    &["adapter", "host", "port", "database", "username", "role"],
);

const TEXT_FIELDS: [&str; 5] = ["adapter", "host", "database", "username", "role"];

type Settings = BTreeMap<String, Scalar>;

#[derive(Debug)]
pub struct RelationalNormalizer {
    aliases: AliasLookup,
    derive_role: bool,
    adapter_aliases: BTreeMap<String, String>,
}

impl Default for RelationalNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationalNormalizer {
    /// Default settings and no aliases.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&RelationalConfig::default())
    }

    #[must_use]
    pub fn from_config(config: &RelationalConfig) -> Self {
        Self {
            aliases: AliasLookup::empty(),
            derive_role: config.derive_role,
            adapter_aliases: config.adapter_aliases.clone(),
        }
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasLookup) -> Self {
        self.aliases = aliases;
        self
    }

    #[must_use]
    pub fn with_registry(self, registry: Arc<dyn AliasRegistry>) -> Self {
        self.with_aliases(AliasLookup::new(registry))
    }

    fn settings(&self, descriptor: &Descriptor) -> Result<Settings, NormalizationError> {
        match descriptor {
            Descriptor::Alias(alias) => match self.aliases.resolve(alias)? {
                Descriptor::Alias(target) => Err(NormalizationError::Rejected(format!(
                    "alias '{alias}' points at another alias '{target}'"
                ))),
                resolved => self.settings(&resolved),
            },
            Descriptor::Url(url) => self.url_settings(url),
            Descriptor::Fields(fields) => {
                let mut settings = fields.clone();
                if let Some(url) = settings.remove("url") {
                    let url = match url {
                        Scalar::Str(url) => url,
                        other => {
                            return Err(NormalizationError::invalid_field(
                                "url",
                                other.to_string(),
                                "expected a connection URL",
                            ))
                        }
                    };
                    settings.extend(self.url_settings(&url)?);
                }
                Ok(settings)
            }
        }
    }

    fn url_settings(&self, url: &str) -> Result<Settings, NormalizationError> {
        let parsed = Url::parse(url).map_err(|e| NormalizationError::malformed_url(url, e))?;

        let mut settings: Settings = parsed
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), Scalar::Str(value.into_owned())))
            .collect();

        let scheme = parsed.scheme().replace('-', "_");
        let adapter = self.adapter_aliases.get(&scheme).cloned().unwrap_or(scheme);
        settings.insert("adapter".to_string(), Scalar::Str(adapter));

        if let Some(host) = parsed.host_str().filter(|host| !host.is_empty()) {
            settings.insert("host".to_string(), host.into());
        }
        if let Some(port) = parsed.port() {
            settings.insert("port".to_string(), port.into());
        }
        if !parsed.username().is_empty() {
            let username = decode_component(url, parsed.username())?;
            settings.insert("username".to_string(), username.into());
        }

        let path = parsed.path();
        let database = path.strip_prefix('/').unwrap_or(path);
        if !database.is_empty() {
            let database = decode_component(url, database)?;
            settings.insert("database".to_string(), database.into());
        }

        Ok(settings)
    }

    fn record(&self, settings: &Settings) -> Result<Record, NormalizationError> {
        let mut record = Record::empty(&RELATIONAL_SCHEMA);

        for field in TEXT_FIELDS {
            record = record.with_value(field, settings.get(field).cloned());
        }
        if let Some(port) = settings.get("port") {
            record = record.with_field("port", integer_field("port", port)?);
        }

        if self.derive_role {
            if let Some(Scalar::Str(name)) = settings.get("name") {
                let role = name.split('/').next().unwrap_or_default();
                record = record.with_field("role", role);
            }
        }

        Ok(record)
    }
}

/// URL components arrive percent-encoded; map values do not.
fn decode_component(url: &str, component: &str) -> Result<String, NormalizationError> {
    percent_decode_str(component)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| NormalizationError::malformed_url(url, e))
}

impl Normalizer for RelationalNormalizer {
    fn schema(&self) -> &'static Schema {
        &RELATIONAL_SCHEMA
    }

    fn name(&self) -> &str {
        "relational"
    }

    fn normalize(&self, descriptor: &Descriptor) -> Result<Record, NormalizationError> {
        let settings = self.settings(descriptor)?;
        self.record(&settings)
    }
}
