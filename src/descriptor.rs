//! # Resource Descriptors
//!
//! Raw, un-normalized descriptions of a resource instance as callers hand them
//! to a structural resolver, either as a matcher in `add` or as a probe in
//! `resolve`.
//!
//! | Shape | Example | Typical meaning |
//! |-------|---------|-----------------|
//! | `Alias` | `:primary` | name to look up in an alias registry |
//! | `Url` | `"mysql2://db.internal:3306/app"` | connection URL |
//! | `Fields` | `{adapter: "mysql2", host: "db"}` | structured settings |
//!
//! Normalizers turn descriptors into canonical [`Record`](crate::record::Record)s.

use crate::error::NormalizationError;
use crate::record::Scalar;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// Symbolic name resolved against an alias registry
    Alias(String),
    /// Connection URL string
    Url(String),
    /// Structured key/value settings
    Fields(BTreeMap<String, Scalar>),
}

impl Descriptor {
    #[must_use]
    pub fn alias(name: impl Into<String>) -> Self {
        Descriptor::Alias(name.into())
    }

    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Descriptor::Url(url.into())
    }

    /// Build a `Fields` descriptor. Later duplicates of a key win.
    pub fn fields<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (K, V)>,
    {
        Descriptor::Fields(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The empty mapping. Normalizes to the wildcard in most domains.
    #[must_use]
    pub fn any() -> Self {
        Descriptor::Fields(BTreeMap::new())
    }

    /// Short name of the shape, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Descriptor::Alias(_) => "alias",
            Descriptor::Url(_) => "url",
            Descriptor::Fields(_) => "fields",
        }
    }

    /// Build a descriptor from JSON: strings are URLs, objects are field maps,
    /// `null` is the empty map.
    ///
    /// Objects may only hold strings, integers, booleans or `null` (dropped).
    pub fn from_json(value: &serde_json::Value) -> Result<Self, NormalizationError> {
        use serde_json::Value;

        match value {
            Value::String(url) => Ok(Descriptor::Url(url.clone())),
            Value::Null => Ok(Descriptor::any()),
            Value::Object(map) => {
                let mut fields = BTreeMap::new();
                for (key, value) in map {
                    let scalar = match value {
                        Value::Null => continue,
                        Value::Bool(b) => Scalar::Bool(*b),
                        Value::String(s) => Scalar::Str(s.clone()),
                        Value::Number(n) => match n.as_i64() {
                            Some(i) => Scalar::Int(i),
                            None => {
                                return Err(NormalizationError::InvalidJson(format!(
                                    "field '{key}' is not an integer: {n}"
                                )))
                            }
                        },
                        other => {
                            return Err(NormalizationError::InvalidJson(format!(
                                "field '{key}' must be a scalar, got {other}"
                            )))
                        }
                    };
                    fields.insert(key.clone(), scalar);
                }
                Ok(Descriptor::Fields(fields))
            }
            other => Err(NormalizationError::InvalidJson(format!(
                "expected a URL string or an object, got {other}"
            ))),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Alias(name) => write!(f, ":{name}"),
            Descriptor::Url(url) => write!(f, "{url:?}"),
            Descriptor::Fields(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl TryFrom<serde_json::Value> for Descriptor {
    type Error = NormalizationError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Descriptor::from_json(&value)
    }
}
