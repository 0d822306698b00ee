use crate::value::Value;
use derive_more::{Deref, DerefMut, IntoIterator};
use std::collections::BTreeMap;

///
/// Record
///
/// One stored row: column name -> storage value.
/// Constructed per fetched or written row and never cached.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Eq, IntoIterator, PartialEq)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Stored value for a column; a missing column reads as NULL.
    #[must_use]
    pub fn get_or_null(&self, column: &str) -> &Value {
        const NULL: &Value = &Value::Null;

        self.0.get(column).unwrap_or(NULL)
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
