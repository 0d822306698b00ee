//! Query translation: constraint decoding, ordering, the compiler façade
//! and the storage driver boundary.

pub mod compiler;
pub mod connection;
pub mod cursor;
pub mod driver;
pub mod features;
pub mod index;
pub mod order;
pub mod predicate;
pub mod query;
pub mod record;

// re-exports
pub use compiler::{Compiler, CompilerState, Plan, Rows};
pub use connection::Connection;
pub use cursor::RawCursor;
pub use driver::{FetchRequest, MemoryDriver, RecordIter, StorageDriver};
pub use features::Features;
pub use index::IndexRegistry;
pub use order::{OrderKey, OrderingSpec};
pub use query::{Aggregate, AggregateFunction, PageWindow, Query};
pub use record::Record;
