use crate::{
    db::{
        driver::{FetchRequest, RecordIter, StorageDriver},
        order::{self, OrderingSpec},
        predicate::{NormalizedTree, matches},
        query::PageWindow,
        record::Record,
    },
    error::{Error, ErrorOrigin},
    value::{Value, values_equal},
};
use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

///
/// MemoryDriver
///
/// Reference driver that keeps every table in memory and answers all query
/// work through the in-memory evaluator and orderer.
/// Natural order is insertion order.
///

#[derive(Debug, Default)]
pub struct MemoryDriver {
    tables: RwLock<BTreeMap<String, Table>>,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Record>,
    next_key: i64,
}

impl MemoryDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a table's records in insertion order.
    pub fn rows(&self, table: &str) -> Result<Vec<Record>, Error> {
        Ok(self
            .read()?
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default())
    }

    pub fn len(&self, table: &str) -> Result<usize, Error> {
        Ok(self.read()?.get(table).map_or(0, |t| t.rows.len()))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Table>>, Error> {
        self.tables.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Table>>, Error> {
        self.tables.write().map_err(|_| poisoned())
    }
}

impl StorageDriver for MemoryDriver {
    fn fetch(&self, request: &FetchRequest<'_>) -> Result<RecordIter<'_>, Error> {
        let tables = self.read()?;
        let Some(table) = tables.get(request.table) else {
            return Ok(Box::new(std::iter::empty()));
        };

        let mut rows = filtered(&table.rows, request.filters)?;
        tracing::trace!(
            table = request.table,
            scanned = table.rows.len(),
            matched = rows.len(),
            "memory fetch"
        );

        match request.ordering {
            OrderingSpec::Natural { reversed: true } => rows.reverse(),
            spec => order::sort(&mut rows, spec),
        }

        let columns = request.columns;
        let page: Vec<Record> = request
            .window
            .apply(rows.into_iter())
            .map(|row| project(row, columns))
            .collect();

        Ok(Box::new(page.into_iter().map(Ok)))
    }

    fn count(
        &self,
        table: &str,
        filters: &NormalizedTree,
        window: PageWindow,
    ) -> Result<usize, Error> {
        let tables = self.read()?;
        let Some(table) = tables.get(table) else {
            return Ok(0);
        };

        let mut total = 0usize;
        for row in &table.rows {
            if matches(row, filters)? {
                total += 1;
            }
        }

        Ok(window.clamp_len(total))
    }

    fn delete(&self, table: &str, filters: &NormalizedTree) -> Result<usize, Error> {
        let mut tables = self.write()?;
        let Some(table) = tables.get_mut(table) else {
            return Ok(0);
        };

        let hits = hit_flags(&table.rows, filters)?;
        let before = table.rows.len();
        let mut flags = hits.into_iter();
        table.rows.retain(|_| !flags.next().unwrap_or(false));

        Ok(before - table.rows.len())
    }

    fn insert(
        &self,
        table: &str,
        pk_column: &str,
        mut record: Record,
    ) -> Result<Option<Value>, Error> {
        let mut tables = self.write()?;
        let table = tables.entry(table.to_string()).or_default();

        let provided = record.get(pk_column).filter(|v| !v.is_null()).cloned();
        let key = match provided {
            Some(key) => {
                if let Value::Int(n) = key {
                    table.next_key = table.next_key.max(n);
                }
                key
            }
            None => {
                table.next_key = table.next_key.saturating_add(1);
                let key = Value::Int(table.next_key);
                record.insert(pk_column.to_string(), key.clone());
                key
            }
        };

        // NOTE: insert doubles as upsert; the backend cannot tell the two apart.
        match table
            .rows
            .iter_mut()
            .find(|row| values_equal(row.get_or_null(pk_column), &key))
        {
            Some(existing) => *existing = record,
            None => table.rows.push(record),
        }

        Ok(Some(key))
    }

    fn update(
        &self,
        table: &str,
        values: &Record,
        filters: &NormalizedTree,
    ) -> Result<usize, Error> {
        let mut tables = self.write()?;
        let Some(table) = tables.get_mut(table) else {
            return Ok(0);
        };

        let hits = hit_flags(&table.rows, filters)?;
        let mut changed = 0;
        for (row, hit) in table.rows.iter_mut().zip(hits) {
            if hit {
                for (column, value) in values.iter() {
                    row.insert(column.clone(), value.clone());
                }
                changed += 1;
            }
        }

        Ok(changed)
    }
}

fn poisoned() -> Error {
    Error::storage(ErrorOrigin::Driver, "memory driver lock poisoned")
}

fn filtered(rows: &[Record], filters: &NormalizedTree) -> Result<Vec<Record>, Error> {
    let mut out = Vec::new();
    for row in rows {
        if matches(row, filters)? {
            out.push(row.clone());
        }
    }

    Ok(out)
}

// Evaluate the filter for every row before mutating anything, so an
// evaluation error leaves the table untouched.
fn hit_flags(rows: &[Record], filters: &NormalizedTree) -> Result<Vec<bool>, Error> {
    rows.iter().map(|row| matches(row, filters)).collect()
}

fn project(row: Record, columns: &[String]) -> Record {
    if columns.is_empty() {
        return row;
    }

    row.into_iter()
        .filter(|(column, _)| columns.contains(column))
        .collect()
}
