
use crate::{
    config::ToolboxConfig,
    db::{connection::Connection, driver::MemoryDriver, query::Query},
    test_support::person,
    value::Value,
};
use std::collections::BTreeMap;

const PERSON_TABLE: &str = "app_person";

fn connection() -> Connection<MemoryDriver> {
    connection_with(ToolboxConfig::default())
}

fn connection_with(config: ToolboxConfig) -> Connection<MemoryDriver> {
    Connection::new(MemoryDriver::new(), config).expect("connection")
}

fn values<const N: usize>(pairs: [(&str, Value); N]) -> BTreeMap<String, Value> {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Insert a `Person` through the compiler and return its key.
fn insert_person(conn: &Connection<MemoryDriver>, fields: BTreeMap<String, Value>) -> Value {
    conn.compiler(Query::new(person()))
        .insert(&fields, true)
        .expect("insert")
        .expect("generated key")
}

fn named(conn: &Connection<MemoryDriver>, name: &str, age: i64) -> Value {
    insert_person(
        conn,
        values([("name", Value::from(name)), ("age", Value::Int(age))]),
    )
}

/// Fetch every row of `query` as projected values.
fn fetch_all(conn: &Connection<MemoryDriver>, query: Query) -> Vec<Vec<Value>> {
    conn.compiler(query)
        .results_iter()
        .expect("results")
        .collect::<Result<_, _>>()
        .expect("rows decode")
}

/// First projected column of every row.
fn first_column(rows: Vec<Vec<Value>>) -> Vec<Value> {
    rows.into_iter()
        .map(|row| row.into_iter().next().unwrap_or(Value::Null))
        .collect()
}
