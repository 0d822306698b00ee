//! Storage driver boundary.
//!
//! A driver persists records keyed by storage column. It may evaluate the
//! normalized filter and ordering natively, or fetch everything and hand
//! the work to [`matches`](crate::db::predicate::matches) and
//! [`order::sort`](crate::db::order::sort); the compiler cannot tell the
//! difference.

mod memory;


// re-exports
pub use memory::MemoryDriver;

use crate::{
    db::{order::OrderingSpec, predicate::NormalizedTree, query::PageWindow, record::Record},
    error::Error,
    value::Value,
};

/// Lazy stream of fetched records; each pull may perform driver I/O.
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<Record, Error>> + 'a>;

///
/// FetchRequest
///

#[derive(Clone, Copy, Debug)]
pub struct FetchRequest<'a> {
    pub table: &'a str,
    pub pk_column: &'a str,
    /// Storage columns to return; the driver may return more.
    pub columns: &'a [String],
    pub filters: &'a NormalizedTree,
    pub ordering: &'a OrderingSpec,
    pub window: PageWindow,
}

///
/// StorageDriver
///
/// CONTRACT: every method is one synchronous request. Errors are returned
/// as-is to the caller; the compiler never retries.
///

pub trait StorageDriver: Send + Sync {
    /// Matching records in `ordering`, restricted to `window`.
    fn fetch(&self, request: &FetchRequest<'_>) -> Result<RecordIter<'_>, Error>;

    /// Number of matching records inside `window`.
    fn count(
        &self,
        table: &str,
        filters: &NormalizedTree,
        window: PageWindow,
    ) -> Result<usize, Error>;

    /// Remove every matching record; returns how many were removed.
    fn delete(&self, table: &str, filters: &NormalizedTree) -> Result<usize, Error>;

    /// Store one record. Returns the key the record was stored under when
    /// the driver generated or knows it.
    fn insert(&self, table: &str, pk_column: &str, record: Record)
    -> Result<Option<Value>, Error>;

    /// Overwrite `values` on every matching record; returns how many changed.
    fn update(
        &self,
        table: &str,
        values: &Record,
        filters: &NormalizedTree,
    ) -> Result<usize, Error>;
}
