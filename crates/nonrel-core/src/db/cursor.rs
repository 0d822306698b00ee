use crate::{
    db::record::Record,
    error::{Error, ErrorOrigin},
    value::Value,
};

///
/// RawCursor
///
/// Stand-in for a DB-API cursor. Raw SQL has no meaning against a
/// non-relational store, so every call fails immediately.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct RawCursor;

#[expect(clippy::unused_self)]
impl RawCursor {
    pub fn execute(&mut self, _sql: &str, _params: &[Value]) -> Result<(), Error> {
        Err(refused())
    }

    pub fn fetch_one(&mut self) -> Result<Option<Record>, Error> {
        Err(refused())
    }

    pub fn fetch_many(&mut self, _size: usize) -> Result<Vec<Record>, Error> {
        Err(refused())
    }

    pub fn fetch_all(&mut self) -> Result<Vec<Record>, Error> {
        Err(refused())
    }

    pub fn row_count(&self) -> Result<usize, Error> {
        Err(refused())
    }

    pub fn close(&mut self) -> Result<(), Error> {
        Err(refused())
    }
}

fn refused() -> Error {
    Error::not_supported(ErrorOrigin::Cursor, "Cursors are not supported.")
}

///
/// TESTS
///
