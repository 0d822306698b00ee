//! ## Crate layout
//! - `core`: value conversion, constraint decoding, in-memory filtering and
//!   ordering, the query compiler and the storage driver seam.
//!
//! The `prelude` module carries what a host needs to describe models and
//! queries and to run them against a connection.

pub use nonrel_core as core;

use tracing_subscriber::EnvFilter;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default directive used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "nonrel_core=info";

pub use core::{Error, ErrorClass, ErrorOrigin};

/// Install a formatting subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        config::{StorageConfig, ToolboxConfig},
        db::{
            Compiler, CompilerState, Connection, MemoryDriver, Query, StorageDriver,
            predicate::{Constraint, Lookup, WhereNode},
            query::{Aggregate, AggregateFunction},
        },
        model::{EntityModel, FieldModel, StorageKind},
        obs::{CountingMetricsSink, MetricsSink},
        value::Value,
    };
}
