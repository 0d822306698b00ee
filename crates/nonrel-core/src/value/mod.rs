mod compare;
mod text;

#[cfg(test)]
mod tests;

use crate::types::Float64;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// re-exports
pub use compare::{canonical_cmp, strict_order_cmp, values_equal};
pub use text::{TextMode, casefold};

///
/// Value
///
/// Runtime value crossing both the application boundary and the storage
/// driver boundary. Storage kinds map onto a subset of these variants.
///
/// Null     → SQL NULL, the host's missing value.
/// Set      → canonical, sorted, duplicate-free element list.
/// Map      → dict payload; keys are never converted.
/// Embedded → nested record keyed by attribute name (app side) or column
///            name (storage side).
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(Float64),
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    List(Vec<Self>),
    Set(Vec<Self>),
    Map(BTreeMap<String, Self>),
    Embedded(EmbeddedValue),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from a list literal.
    pub fn from_list<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a canonical `Value::Set`: elements sorted and deduplicated.
    pub fn from_set<T: Into<Self>>(items: impl IntoIterator<Item = T>) -> Self {
        let mut items: Vec<Self> = items.into_iter().map(Into::into).collect();
        items.sort_by(canonical_cmp);
        items.dedup();

        Self::Set(items)
    }

    /// Build a `Value::Map` from `(key, value)` pairs.
    pub fn from_map<K: Into<String>, V: Into<Self>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a float value; `None` for non-finite input.
    #[must_use]
    pub fn float(v: f64) -> Option<Self> {
        Float64::try_new(v).map(Self::Float)
    }

    ///
    /// INSPECTION
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_))
    }

    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date(_) | Self::DateTime(_) | Self::Time(_))
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a list or set value.
    #[must_use]
    pub fn as_elements(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Short, stable type label used in diagnostics.
    #[must_use]
    pub const fn type_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Time(_) => "time",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Embedded(_) => "embedded",
        }
    }

    ///
    /// TEXT
    ///

    #[must_use]
    pub fn text_eq(&self, other: &Self, mode: TextMode) -> Option<bool> {
        let (a, b) = (self.as_text()?, other.as_text()?);
        Some(mode.fold(a) == mode.fold(b))
    }

    #[must_use]
    pub fn text_contains(&self, needle: &Self, mode: TextMode) -> Option<bool> {
        let (a, b) = (self.as_text()?, needle.as_text()?);
        Some(mode.fold(a).contains(mode.fold(b).as_ref()))
    }

    #[must_use]
    pub fn text_starts_with(&self, prefix: &Self, mode: TextMode) -> Option<bool> {
        let (a, b) = (self.as_text()?, prefix.as_text()?);
        Some(mode.fold(a).starts_with(mode.fold(b).as_ref()))
    }

    #[must_use]
    pub fn text_ends_with(&self, suffix: &Self, mode: TextMode) -> Option<bool> {
        let (a, b) = (self.as_text()?, suffix.as_text()?);
        Some(mode.fold(a).ends_with(mode.fold(b).as_ref()))
    }
}

///
/// EmbeddedValue
///
/// A nested record. `type_tag` names the concrete embedded entity
/// (`module.Name`). Every embedding field requires it; a typed field also
/// requires it to match its model.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EmbeddedValue {
    pub type_tag: Option<String>,
    pub fields: BTreeMap<String, Value>,
}

impl EmbeddedValue {
    #[must_use]
    pub const fn new(type_tag: Option<String>, fields: BTreeMap<String, Value>) -> Self {
        Self { type_tag, fields }
    }

    pub fn tagged<K: Into<String>, V: Into<Value>>(
        type_tag: impl Into<String>,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            type_tag: Some(type_tag.into()),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

///
/// From impls
///

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<Float64> for Value {
    fn from(v: Float64) -> Self {
        Self::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<EmbeddedValue> for Value {
    fn from(v: EmbeddedValue) -> Self {
        Self::Embedded(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
