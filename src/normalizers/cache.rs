//! Cache (Redis-style) connection descriptors.
//!
//! TCP connections normalize to `host, port, db, scheme` with defaults filled
//! in, so `{host: "127.0.0.1", port: 6379}` and
//! `"redis://127.0.0.1:6379/0"` produce the same record. Unix-socket
//! connections normalize to `url` alone.
//!
//! In a settings map, explicit `host`/`port`/`db`/`scheme` entries override
//! what a `url` entry supplies. A `path` entry means a unix socket.

use super::{integer_field, Normalizer};
use crate::config::CacheConfig;
use crate::descriptor::Descriptor;
use crate::error::NormalizationError;
use crate::record::{Record, Scalar, Schema};
use std::collections::BTreeMap;
use url::Url;

pub static CACHE_SCHEMA: Schema = Schema::new("cache", &["url", "host", "port", "db", "scheme"]);

const UNIX_SCHEME: &str = "unix";
const TCP_SCHEMES: [&str; 2] = ["redis", "rediss"];

#[derive(Debug, Clone, Default)]
pub struct CacheNormalizer {
    defaults: CacheConfig,
}

#[derive(Debug, Default)]
struct TcpSettings {
    scheme: Option<String>,
    host: Option<String>,
    port: Option<i64>,
    db: Option<i64>,
}

impl CacheNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            defaults: config.clone(),
        }
    }

    fn unix_record(url: &str) -> Record {
        Record::empty(&CACHE_SCHEMA).with_field("url", url)
    }

    fn normalize_fields(
        &self,
        fields: &BTreeMap<String, Scalar>,
    ) -> Result<Record, NormalizationError> {
        if let Some(path) = fields.get("path") {
            let path = text_field("path", path)?;
            return Ok(Self::unix_record(&format!("{UNIX_SCHEME}://{path}")));
        }

        let mut settings = TcpSettings::default();

        if let Some(url) = fields.get("url") {
            let url = text_field("url", url)?;
            let parsed = Url::parse(url).map_err(|e| NormalizationError::malformed_url(url, e))?;

            match parsed.scheme() {
                UNIX_SCHEME => return Ok(Self::unix_record(url)),
                scheme if TCP_SCHEMES.contains(&scheme) => {
                    settings.scheme = Some(scheme.to_string());
                    settings.host = parsed
                        .host_str()
                        .filter(|host| !host.is_empty())
                        .map(str::to_string);
                    settings.port = parsed.port().map(i64::from);
                    settings.db = db_from_path(parsed.path())?;
                }
                scheme => {
                    return Err(NormalizationError::UnsupportedScheme {
                        url: url.to_string(),
                        scheme: scheme.to_string(),
                    })
                }
            }
        }

        if let Some(scheme) = fields.get("scheme") {
            settings.scheme = Some(text_field("scheme", scheme)?.to_string());
        }
        if let Some(host) = fields.get("host") {
            settings.host = Some(text_field("host", host)?.to_string());
        }
        if let Some(port) = fields.get("port") {
            settings.port = Some(integer_field("port", port)?);
        }
        if let Some(db) = fields.get("db") {
            settings.db = Some(integer_field("db", db)?);
        }

        let scheme = settings
            .scheme
            .unwrap_or_else(|| self.defaults.default_scheme.clone());
        if scheme == UNIX_SCHEME {
            return Err(NormalizationError::invalid_field(
                "scheme",
                scheme,
                "unix sockets need a url or path",
            ));
        }
        if !TCP_SCHEMES.contains(&scheme.as_str()) {
            return Err(NormalizationError::UnsupportedScheme {
                url: Descriptor::Fields(fields.clone()).to_string(),
                scheme,
            });
        }

        Ok(Record::empty(&CACHE_SCHEMA)
            .with_field(
                "host",
                settings
                    .host
                    .unwrap_or_else(|| self.defaults.default_host.clone()),
            )
            .with_field(
                "port",
                settings
                    .port
                    .unwrap_or_else(|| i64::from(self.defaults.default_port)),
            )
            .with_field("db", settings.db.unwrap_or(self.defaults.default_db))
            .with_field("scheme", scheme))
    }
}

fn text_field<'a>(field: &str, value: &'a Scalar) -> Result<&'a str, NormalizationError> {
    value.as_str().ok_or_else(|| {
        NormalizationError::invalid_field(field, value.to_string(), "expected a string")
    })
}

/// `/2` → `Some(2)`, `` or `/` → `None`.
fn db_from_path(path: &str) -> Result<Option<i64>, NormalizationError> {
    let db = path.strip_prefix('/').unwrap_or(path);
    if db.is_empty() {
        return Ok(None);
    }
    db.parse()
        .map(Some)
        .map_err(|_| NormalizationError::invalid_field("db", db, "expected a database number"))
}

impl Normalizer for CacheNormalizer {
    fn schema(&self) -> &'static Schema {
        &CACHE_SCHEMA
    }

    fn name(&self) -> &str {
        "cache"
    }

    fn normalize(&self, descriptor: &Descriptor) -> Result<Record, NormalizationError> {
        match descriptor {
            Descriptor::Alias(_) => Err(NormalizationError::UnsupportedDescriptor {
                normalizer: self.name().to_string(),
                kind: descriptor.kind(),
            }),
            Descriptor::Url(url) => self.normalize_fields(&BTreeMap::from([(
                "url".to_string(),
                Scalar::from(url.as_str()),
            )])),
            Descriptor::Fields(fields) => self.normalize_fields(fields),
        }
    }
}
