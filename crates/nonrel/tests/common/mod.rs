#![allow(dead_code)]

use nonrel::prelude::*;
use std::{collections::BTreeMap, sync::Arc};

pub const PERSON_TABLE: &str = "app_person";

pub fn person() -> Arc<EntityModel> {
    Arc::new(EntityModel::new(
        "app",
        "Person",
        [
            FieldModel::new("name", StorageKind::String),
            FieldModel::new("nickname", StorageKind::String).nullable(),
            FieldModel::new("age", StorageKind::Integer).nullable(),
            FieldModel::new("floating_point", StorageKind::Float).nullable(),
            FieldModel::new("last_seen", StorageKind::DateTime).nullable(),
            FieldModel::list("names", FieldModel::new("name", StorageKind::String)).nullable(),
            FieldModel::dict("scores", FieldModel::new("score", StorageKind::Integer)).nullable(),
        ],
    ))
}

pub fn field(name: &str) -> FieldModel {
    person()
        .field(name)
        .cloned()
        .unwrap_or_else(|| panic!("fixture field {name} missing"))
}

pub fn leaf(name: &str, lookup: Lookup, value: impl Into<Value>) -> Constraint {
    Constraint::on(&field(name), lookup, value)
}

pub fn connection(storage: StorageConfig) -> Connection<MemoryDriver> {
    let config = ToolboxConfig {
        storage,
        ..ToolboxConfig::default()
    };

    Connection::new(MemoryDriver::new(), config).expect("connection")
}

pub fn insert(conn: &Connection<MemoryDriver>, pairs: Vec<(&str, Value)>) -> Value {
    let values: BTreeMap<String, Value> = pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    conn.compiler(Query::new(person()))
        .insert(&values, true)
        .expect("insert")
        .expect("generated key")
}

pub fn fetch(conn: &Connection<MemoryDriver>, query: Query) -> Vec<Vec<Value>> {
    conn.compiler(query)
        .results_iter()
        .expect("results")
        .collect::<Result<_, _>>()
        .expect("rows decode")
}

pub fn column(rows: Vec<Vec<Value>>) -> Vec<Value> {
    rows.into_iter()
        .map(|row| row.into_iter().next().unwrap_or(Value::Null))
        .collect()
}

pub fn float(v: f64) -> Value {
    Value::float(v).expect("finite float")
}
