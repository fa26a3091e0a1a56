//! # Canonical Records
//!
//! Immutable, structurally comparable representation of a resource key.
//!
//! A [`Record`] is a fixed, ordered set of named fields described by a
//! [`Schema`]. Every field is either populated with a [`Scalar`] or explicitly
//! absent. Absence is distinct from any zero value: a port of `0` is a value,
//! a missing port is a wildcard.
//!
//! ## Compatibility
//!
//! ```text
//! matcher: { adapter: "mysql2", host: _,   port: _, ... }
//! probe:   { adapter: "mysql2", host: "x", port: 3306, ... }
//!            ───────┬───────   ─────┬──────────────────
//!               must equal      absent in matcher: ignored
//! ```
//!
//! A matcher record is compatible with a probe record iff every field present
//! in the matcher has an equal value in the probe. The empty record is the
//! wildcard and is compatible with everything of the same schema.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Scalar {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Interpret the value as an integer, accepting numeric strings.
    #[must_use]
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Str(s) => s.trim().parse().ok(),
            Scalar::Bool(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<u16> for Scalar {
    fn from(value: u16) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// The fixed field layout shared by all records of one domain.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Schema {
    name: &'static str,
    fields: &'static [&'static str],
}

impl Schema {
    #[must_use]
    pub const fn new(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { name, fields }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    #[must_use]
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }
}

/// A canonical record: one optional value per schema field.
///
/// Records are values. They are built once (through [`Record::empty`] and the
/// consuming [`Record::with_field`] / [`Record::with_value`]) and never
/// mutated afterwards, so they can be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    schema: &'static Schema,
    values: Box<[Option<Scalar>]>,
}

impl Record {
    /// A record with every field absent (the wildcard).
    #[must_use]
    pub fn empty(schema: &'static Schema) -> Self {
        Self {
            schema,
            values: vec![None; schema.fields.len()].into_boxed_slice(),
        }
    }

    /// Set `field` to `value`. Fields outside the schema are discarded.
    #[must_use]
    pub fn with_field(self, field: &str, value: impl Into<Scalar>) -> Self {
        self.with_value(field, Some(value.into()))
    }

    /// Set `field` to an optional value; `None` makes the field absent.
    #[must_use]
    pub fn with_value(mut self, field: &str, value: Option<Scalar>) -> Self {
        if let Some(index) = self.schema.index_of(field) {
            self.values[index] = value;
        }
        self
    }

    #[must_use]
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.schema
            .index_of(field)
            .and_then(|index| self.values[index].as_ref())
    }

    /// All fields in schema order, populated or not.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, Option<&Scalar>)> + '_ {
        self.schema
            .fields
            .iter()
            .copied()
            .zip(self.values.iter().map(Option::as_ref))
    }

    /// Only the populated fields, in schema order.
    pub fn present_fields(&self) -> impl Iterator<Item = (&'static str, &Scalar)> + '_ {
        self.fields()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
    }

    #[must_use]
    pub fn present_len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Whether this record, used as a matcher, accepts `probe`.
    ///
    /// Records of different schemas are never compatible.
    #[must_use]
    pub fn matches(&self, probe: &Record) -> bool {
        if self.schema != probe.schema {
            return false;
        }

        self.values
            .iter()
            .zip(probe.values.iter())
            .all(|(expected, actual)| match expected {
                None => true,
                Some(expected) => actual.as_ref() == Some(expected),
            })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.present_fields().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.present_len()))?;
        for (name, value) in self.present_fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
