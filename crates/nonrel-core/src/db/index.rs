use crate::{
    config::ToolboxConfig,
    db::{predicate::Lookup, record::Record},
    error::Error,
    model::EntityModel,
    value::{Value, casefold},
};
use std::collections::BTreeMap;

///
/// IndexRegistry
///
/// Field-index proxy: for registered `(entity, field, lookup)` triples the
/// compiler writes a derived column next to the field and the decoder
/// rewrites matching lookups into plain equality on that column.
///
/// Only `iexact` can be indexed; the derived column holds the lower-cased
/// value.
///

#[derive(Clone, Debug, Default)]
pub struct IndexRegistry {
    entries: BTreeMap<String, BTreeMap<String, Vec<Lookup>>>,
}

impl IndexRegistry {
    pub fn from_config(config: &ToolboxConfig) -> Result<Self, Error> {
        let mut registry = Self::default();
        for (entity, field, lookup) in config.index_entries()? {
            registry.register(entity, field, lookup);
        }

        Ok(registry)
    }

    pub fn register(&mut self, entity: impl Into<String>, field: impl Into<String>, lookup: Lookup) {
        let lookups = self
            .entries
            .entry(entity.into())
            .or_default()
            .entry(field.into())
            .or_default();

        if !lookups.contains(&lookup) {
            lookups.push(lookup);
        }
    }

    #[must_use]
    pub fn is_indexed(&self, entity: &str, field: &str, lookup: Lookup) -> bool {
        self.entries
            .get(entity)
            .and_then(|fields| fields.get(field))
            .is_some_and(|lookups| lookups.contains(&lookup))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Derived column name for an indexed lookup.
    #[must_use]
    pub fn column(column: &str, lookup: Lookup) -> String {
        format!("idxf_{column}_l_{lookup}")
    }

    /// Derived value stored in (and compared against) the index column.
    #[must_use]
    pub fn index_value(lookup: Lookup, value: &Value) -> Value {
        match (lookup, value) {
            (Lookup::IExact, Value::Text(text)) => Value::Text(casefold(text)),
            _ => value.clone(),
        }
    }

    /// Add derived index columns for every registered field present in
    /// `record` (keyed by storage column).
    pub fn augment(&self, model: &EntityModel, record: &mut Record) {
        let Some(fields) = self.entries.get(&model.name) else {
            return;
        };

        for (name, lookups) in fields {
            let Some(field) = model.field(name) else {
                continue;
            };
            let Some(stored) = record.get(&field.column).cloned() else {
                continue;
            };

            for lookup in lookups {
                record.insert(
                    Self::column(&field.column, *lookup),
                    Self::index_value(*lookup, &stored),
                );
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{person, record};

    fn registry() -> IndexRegistry {
        let mut registry = IndexRegistry::default();
        registry.register("Person", "name", Lookup::IExact);
        registry
    }

    #[test]
    fn from_config_registers_iexact_fields() {
        let config = ToolboxConfig::from_toml("[indexes.Person]\nname = [\"iexact\"]")
            .expect("config");
        let registry = IndexRegistry::from_config(&config).expect("registry");

        assert!(registry.is_indexed("Person", "name", Lookup::IExact));
        assert!(!registry.is_indexed("Person", "name", Lookup::Exact));
        assert!(!registry.is_indexed("Pet", "name", Lookup::IExact));
    }

    #[test]
    fn augment_writes_lowercased_column() {
        let mut row = record([("name", "Kakashi"), ("nickname", "Sensei")]);
        registry().augment(&person(), &mut row);

        assert_eq!(
            row.get("idxf_name_l_iexact"),
            Some(&Value::from("kakashi"))
        );
        assert!(!row.contains_key("idxf_nickname_l_iexact"));
    }

    #[test]
    fn augment_keeps_null_as_null() {
        let mut row = record([("name", Value::Null)]);
        registry().augment(&person(), &mut row);

        assert_eq!(row.get("idxf_name_l_iexact"), Some(&Value::Null));
    }

    #[test]
    fn augment_ignores_absent_fields() {
        let mut row = record([("age", 3)]);
        registry().augment(&person(), &mut row);

        assert_eq!(row.len(), 1);
    }
}
