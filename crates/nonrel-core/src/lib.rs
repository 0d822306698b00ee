//! Core runtime for nonrel: value conversion, constraint decoding,
//! in-memory filtering and ordering, and the query compiler façade that
//! lets a relational-style ORM run against stores without joins,
//! transactions or native filtering.

// public exports are one module level down
pub mod config;
pub mod convert;
pub mod db;
pub mod error;
pub mod model;
pub mod obs;
pub mod serialize;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

// re-exports
pub use error::{Error, ErrorClass, ErrorOrigin};

///
/// Prelude
///
/// Prelude contains only domain vocabulary: models, values and the query
/// description a host builds. Drivers, sinks and converters are imported
/// from their modules.
///

pub mod prelude {
    pub use crate::{
        db::{
            Query,
            predicate::{Constraint, Lookup, WhereNode},
        },
        model::{EntityModel, FieldModel, StorageKind},
        value::Value,
    };
}
