use crate::{
    db::query::{Aggregate, AggregateFunction},
    error::{Error, ErrorOrigin},
    model::StorageKind,
    value::Value,
};
use chrono::NaiveDate;

///
/// Features
///
/// Capability flags of a non-relational backend as seen by the host ORM.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[expect(clippy::struct_excessive_bools)]
pub struct Features {
    pub supports_transactions: bool,
    pub can_return_id_from_insert: bool,
    pub supports_joins: bool,
    pub supports_select_related: bool,
    pub supports_deleting_related_objects: bool,
    pub distinguishes_insert_from_update: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            supports_transactions: false,
            can_return_id_from_insert: true,
            supports_joins: false,
            supports_select_related: false,
            supports_deleting_related_objects: false,
            distinguishes_insert_from_update: false,
        }
    }
}

impl Features {
    #[must_use]
    pub const fn supports_primary_key_on(&self, kind: StorageKind) -> bool {
        kind.supports_primary_key()
    }
}

/// Key value a new record starts with; the driver generates the real one.
#[must_use]
pub const fn pk_default_value() -> Value {
    Value::Null
}

/// Half-open bounds `[Jan 1 year, Jan 1 year+1)` for a `year` lookup.
///
/// Dates for date fields, midnight datetimes for everything else.
pub fn year_lookup_bounds(year: i64, kind: StorageKind) -> Result<[Value; 2], Error> {
    let start = jan_first(year)?;
    let end = jan_first(year.saturating_add(1))?;

    if kind == StorageKind::Date {
        return Ok([Value::Date(start), Value::Date(end)]);
    }

    Ok([
        Value::DateTime(start.and_time(chrono::NaiveTime::MIN)),
        Value::DateTime(end.and_time(chrono::NaiveTime::MIN)),
    ])
}

fn jan_first(year: i64) -> Result<NaiveDate, Error> {
    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        .ok_or_else(|| {
            Error::validation(ErrorOrigin::Decode, format!("year {year} is out of range"))
        })
}

/// Only COUNT can be answered by a non-relational backend.
pub fn check_aggregate_support(aggregate: &Aggregate) -> Result<(), Error> {
    match aggregate.function {
        AggregateFunction::Count => Ok(()),
        other => Err(Error::not_implemented(
            ErrorOrigin::Query,
            format!("This database does not support {other} aggregates."),
        )),
    }
}

///
/// TESTS
///
