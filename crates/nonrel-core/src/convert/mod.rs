//! Bidirectional value conversion between application values and the
//! storage kinds a driver persists.
//!
//! Scalars pass through unchanged; collections and embedded records are
//! converted element-wise and then laid out in the representation chosen
//! by [`StorageConfig`].
mod collection;
mod embedded;
mod key;

#[cfg(test)]
mod tests;

use crate::{
    config::{ConfigError, Repr, StorageConfig},
    db::predicate::Lookup,
    error::{Error, ErrorOrigin},
    model::{EmbeddedRegistry, FieldModel, StorageKind},
    value::Value,
};
use std::sync::Arc;

// re-exports
pub use embedded::{MODEL_COLUMN, MODULE_COLUMN};
pub use key::KeyCodec;

///
/// ConvertMode
///
/// `Store` converts a value being written; `Lookup` converts a filter
/// argument for the given lookup type.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConvertMode {
    Store,
    Lookup(Lookup),
}

///
/// Conversions
///
/// Stateless after construction; safe to share across threads.
///

#[derive(Clone, Debug, Default)]
pub struct Conversions {
    storage: StorageConfig,
    key_codec: Option<Arc<dyn KeyCodec>>,
    registry: EmbeddedRegistry,
}

impl Conversions {
    #[must_use]
    pub fn new(storage: StorageConfig) -> Self {
        Self {
            storage,
            key_codec: None,
            registry: EmbeddedRegistry::new(),
        }
    }

    #[must_use]
    pub fn with_key_codec(mut self, codec: Arc<dyn KeyCodec>) -> Self {
        self.key_codec = Some(codec);
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: EmbeddedRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub const fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    #[must_use]
    pub const fn registry(&self) -> &EmbeddedRegistry {
        &self.registry
    }

    /// Convert an application value into its storage form.
    pub fn to_storage(
        &self,
        value: &Value,
        field: &FieldModel,
        mode: ConvertMode,
    ) -> Result<Value, Error> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        let field = field.conversion_target();

        if let ConvertMode::Lookup(lookup) = mode {
            return self.lookup_to_storage(value, field, lookup);
        }

        if field.primary_key && field.kind != StorageKind::Key && !field.kind.supports_primary_key()
        {
            return Err(key::unsupported_primary_key(field));
        }

        match field.kind {
            StorageKind::Key => key::encode(self.key_codec.as_deref(), value, field),
            StorageKind::List => collection::list_to_storage(self, value, field),
            StorageKind::Set => collection::set_to_storage(self, value, field),
            StorageKind::Dict => collection::dict_to_storage(self, value, field),
            StorageKind::Embedded => embedded::to_storage(self, value, field),
            StorageKind::String
            | StorageKind::Long
            | StorageKind::Bool
            | StorageKind::Date
            | StorageKind::DateTime
            | StorageKind::Time
            | StorageKind::Decimal
            | StorageKind::Float
            | StorageKind::Integer
            | StorageKind::Raw
            | StorageKind::Bytes => Ok(value.clone()),
        }
    }

    /// Convert a stored value back into its application form.
    pub fn from_storage(&self, value: &Value, field: &FieldModel) -> Result<Value, Error> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        let field = field.conversion_target();

        match field.kind {
            StorageKind::Key => key::decode(self.key_codec.as_deref(), value, field),
            StorageKind::List => collection::list_from_storage(self, value, field),
            StorageKind::Set => collection::set_from_storage(self, value, field),
            StorageKind::Dict => collection::dict_from_storage(self, value, field),
            StorageKind::Embedded => embedded::from_storage(self, value, field),
            StorageKind::String
            | StorageKind::Long
            | StorageKind::Bool
            | StorageKind::Date
            | StorageKind::DateTime
            | StorageKind::Time
            | StorageKind::Decimal
            | StorageKind::Float
            | StorageKind::Integer
            | StorageKind::Raw
            | StorageKind::Bytes => Ok(value.clone()),
        }
    }

    // Filter arguments: null checks and date-part lookups pass through,
    // list-taking lookups convert per element, and lookups on a collection
    // compare against one element of it.
    fn lookup_to_storage(
        &self,
        value: &Value,
        field: &FieldModel,
        lookup: Lookup,
    ) -> Result<Value, Error> {
        if lookup.skips_conversion() {
            return Ok(value.clone());
        }

        if lookup.takes_list()
            && let Some(items) = value.as_elements()
        {
            let items = items
                .iter()
                .map(|item| self.to_storage(item, field, ConvertMode::Lookup(Lookup::Exact)))
                .collect::<Result<Vec<_>, _>>()?;

            return Ok(Value::List(items));
        }

        match field.kind {
            StorageKind::List | StorageKind::Set | StorageKind::Dict => {
                if self.collection_repr(field.kind).is_serialized() {
                    return Err(Error::unsupported_query(
                        ErrorOrigin::Convert,
                        format!("can't filter on serialized collection field {}", field.name),
                    ));
                }

                let item = collection::item_field(field)?;
                self.to_storage(value, item, ConvertMode::Lookup(lookup))
            }
            StorageKind::Embedded => Ok(value.clone()),
            _ => self.to_storage(value, field, ConvertMode::Store),
        }
    }

    const fn collection_repr(&self, kind: StorageKind) -> Repr {
        match kind {
            StorageKind::Set => self.storage.set,
            StorageKind::Dict => self.storage.dict,
            _ => self.storage.list,
        }
    }
}

// Error for a representation the config layer would have rejected.
fn invalid_repr(kind: &'static str, repr: Repr) -> Error {
    Error::storage(
        ErrorOrigin::Convert,
        ConfigError::InvalidRepresentation { kind, repr }.to_string(),
    )
}
