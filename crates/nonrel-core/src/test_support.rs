use crate::{
    config::StorageConfig,
    convert::Conversions,
    db::{
        index::IndexRegistry,
        predicate::{Constraint, Decoder, Lookup, NormalizedTree, WhereNode},
        record::Record,
    },
    model::{EmbeddedRegistry, EntityModel, FieldModel, StorageKind},
    value::Value,
};
use std::sync::Arc;

/// `app.Person`: implicit integer key plus a spread of scalar and
/// collection fields.
pub fn person() -> Arc<EntityModel> {
    Arc::new(EntityModel::new(
        "app",
        "Person",
        [
            FieldModel::new("name", StorageKind::String),
            FieldModel::new("nickname", StorageKind::String).nullable(),
            FieldModel::new("age", StorageKind::Integer).nullable(),
            FieldModel::new("floating_point", StorageKind::Float).nullable(),
            FieldModel::new("birthday", StorageKind::Date).nullable(),
            FieldModel::new("last_seen", StorageKind::DateTime).nullable(),
            FieldModel::list("names", FieldModel::new("name", StorageKind::String)).nullable(),
            FieldModel::set("tags", FieldModel::new("tag", StorageKind::String)).nullable(),
            FieldModel::dict("scores", FieldModel::new("score", StorageKind::Integer)).nullable(),
        ],
    ))
}

/// `app.Address`: embeddable record.
pub fn address() -> Arc<EntityModel> {
    Arc::new(EntityModel::new(
        "app",
        "Address",
        [
            FieldModel::new("street", StorageKind::String),
            FieldModel::new("zip", StorageKind::Integer).column("zip_code"),
        ],
    ))
}

/// `app.Pet`: carries a foreign key to `Person`.
pub fn pet() -> Arc<EntityModel> {
    let owner_pk = FieldModel::new("id", StorageKind::Integer).primary_key();

    Arc::new(EntityModel::new(
        "app",
        "Pet",
        [
            FieldModel::new("name", StorageKind::String),
            FieldModel::foreign_key("owner", "Person", owner_pk).nullable(),
        ],
    ))
}

pub fn field(model: &EntityModel, name: &str) -> FieldModel {
    model
        .field(name)
        .cloned()
        .unwrap_or_else(|| panic!("fixture field {name} missing on {}", model.name))
}

pub fn conversions(storage: StorageConfig) -> Conversions {
    Conversions::new(storage).with_registry(EmbeddedRegistry::new().with(address()))
}

/// Host leaf on a `Person` field.
pub fn leaf(name: &str, lookup: Lookup, value: impl Into<Value>) -> Constraint {
    Constraint::on(&field(&person(), name), lookup, value)
}

/// Decode a host tree against `Person` with native storage and no indexes.
pub fn decode(tree: &WhereNode) -> NormalizedTree {
    let model = person();
    let conversions = Conversions::default();
    let indexes = IndexRegistry::default();

    Decoder::new(&model, &conversions, &indexes)
        .decode(tree)
        .expect("fixture tree decodes")
}

pub fn record<K: Into<String>, V: Into<Value>>(pairs: impl IntoIterator<Item = (K, V)>) -> Record {
    pairs.into_iter().collect()
}
