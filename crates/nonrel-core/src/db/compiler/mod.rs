//! Query compiler façade.
//!
//! One `Compiler` serves one logical query: it validates the query shape,
//! decodes the constraint tree, resolves ordering and then executes exactly
//! one fetch, count, aggregate or write against the storage driver.

mod rows;
mod write;

#[cfg(test)]
mod tests;

// re-exports
pub use rows::Rows;

use crate::{
    db::{
        connection::Connection,
        driver::{FetchRequest, StorageDriver},
        features::check_aggregate_support,
        order::OrderingSpec,
        predicate::{Decoder, NormalizedTree},
        query::Query,
    },
    error::{Error, ErrorOrigin},
    obs::{ExecKind, MetricsEvent, Span},
    value::Value,
};

///
/// CompilerState
///
/// Built -> Validated -> Filtered -> Ordered -> Executed.
/// `Executed` is terminal.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum CompilerState {
    Built,
    Validated,
    Filtered,
    Ordered,
    Executed,
}

///
/// Plan
///
/// Backend-ready form of the query: decoded filters plus resolved ordering.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plan {
    pub filters: NormalizedTree,
    pub ordering: OrderingSpec,
}

///
/// Compiler
///

pub struct Compiler<'c, D: StorageDriver> {
    conn: &'c Connection<D>,
    query: Query,
    state: CompilerState,
}

impl<'c, D: StorageDriver> Compiler<'c, D> {
    #[must_use]
    pub const fn new(conn: &'c Connection<D>, query: Query) -> Self {
        Self {
            conn,
            query,
            state: CompilerState::Built,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CompilerState {
        self.state
    }

    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Fail fast on query shapes the backend cannot represent.
    pub fn check_query(&mut self) -> Result<(), Error> {
        self.ensure_fresh()?;

        if let Err(err) = self.query.validate() {
            self.reject(&err);
            return Err(err);
        }
        self.state = self.state.max(CompilerState::Validated);

        Ok(())
    }

    /// Validate, decode the filter and resolve ordering.
    pub fn build_plan(&mut self) -> Result<Plan, Error> {
        self.check_query()?;

        let model = &self.query.model;
        let decoded = Decoder::new(model, self.conn.conversions(), self.conn.indexes())
            .decode(&self.query.filter);
        let filters = match decoded {
            Ok(filters) => filters,
            Err(err) => {
                self.reject(&err);
                return Err(err);
            }
        };
        self.state = CompilerState::Filtered;

        let ordering = match OrderingSpec::resolve(&self.query) {
            Ok(ordering) => ordering,
            Err(err) => {
                self.reject(&err);
                return Err(err);
            }
        };
        self.state = CompilerState::Ordered;

        let plan = Plan { filters, ordering };
        if self.conn.config().debug {
            tracing::debug!(
                entity = %self.query.model.name,
                table = %self.query.model.table,
                filters = ?plan.filters,
                ordering = ?plan.ordering,
                low_mark = self.query.low_mark,
                high_mark = ?self.query.high_mark,
                "nonrel query"
            );
        }

        Ok(plan)
    }

    /// Lazily fetch and decode the projected rows.
    pub fn results_iter(&mut self) -> Result<Rows<'c>, Error> {
        let plan = self.build_plan()?;
        let window = self.query.window()?;
        let fields: Vec<_> = self.query.fields()?.into_iter().cloned().collect();
        let columns: Vec<String> = fields.iter().map(|f| f.column.clone()).collect();

        self.state = CompilerState::Executed;
        let conn = self.conn;
        let model = &self.query.model;
        let span = Span::new(conn.sink(), ExecKind::Load, &model.name);

        let request = FetchRequest {
            table: &model.table,
            pk_column: &model.primary_key().column,
            columns: &columns,
            filters: &plan.filters,
            ordering: &plan.ordering,
            window,
        };
        let records = conn.driver().fetch(&request)?;

        Ok(Rows::new(
            records,
            fields,
            conn.conversions(),
            conn.sink(),
            &model.name,
            span,
        ))
    }

    /// Whether at least one row matches.
    pub fn has_results(&mut self) -> Result<bool, Error> {
        Ok(self.get_count(true)? > 0)
    }

    /// Count matching rows inside the query's window. With `check_exists`
    /// the window is capped at one row.
    pub fn get_count(&mut self, check_exists: bool) -> Result<usize, Error> {
        let plan = self.build_plan()?;
        let window = self.query.window()?;
        let window = if check_exists {
            window.capped(1)
        } else {
            window
        };

        self.state = CompilerState::Executed;
        let model = &self.query.model;
        let mut span = Span::new(self.conn.sink(), ExecKind::Count, &model.name);
        let count = self
            .conn
            .driver()
            .count(&model.table, &plan.filters, window)?;
        let rows = u64::try_from(count).unwrap_or(u64::MAX);
        span.set_rows(rows);
        self.conn.sink().record(MetricsEvent::RowsScanned {
            entity: &model.name,
            rows,
        });

        Ok(count)
    }

    /// Answer the query's aggregate requests. Only `COUNT(*)` (or a count
    /// over the primary key) can be answered.
    pub fn execute_aggregate(&mut self) -> Result<Vec<Value>, Error> {
        if self.query.aggregates.is_empty() {
            return Err(Error::not_implemented(
                ErrorOrigin::Compiler,
                "The database backend only supports count() queries",
            ));
        }

        let pk = self.query.model.primary_key();
        for aggregate in &self.query.aggregates {
            check_aggregate_support(aggregate)?;

            let target = aggregate.field.as_str();
            if target != "*" && target != pk.name && target != pk.column {
                return Err(Error::unsupported_query(
                    ErrorOrigin::Compiler,
                    format!("COUNT over '{target}' isn't supported; only COUNT(*) is"),
                ));
            }
        }

        let aggregates = self.query.aggregates.len();
        let count = i64::try_from(self.get_count(false)?).unwrap_or(i64::MAX);

        Ok(vec![Value::Int(count); aggregates])
    }

    fn ensure_fresh(&self) -> Result<(), Error> {
        if self.state == CompilerState::Executed {
            return Err(Error::compiler_invariant(
                "compiler already executed; build a new compiler for every query",
            ));
        }

        Ok(())
    }

    fn reject(&self, err: &Error) {
        tracing::debug!(entity = %self.query.model.name, error = %err, "query rejected");
        self.conn.sink().record(MetricsEvent::QueryRejected {
            entity: &self.query.model.name,
        });
    }
}
