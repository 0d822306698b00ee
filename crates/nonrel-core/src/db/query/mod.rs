//! Host query description and the pre-flight checks that run before any
//! storage I/O.

mod aggregate;
mod window;

// re-exports
pub use aggregate::{Aggregate, AggregateFunction};
pub use window::PageWindow;

use crate::{
    db::predicate::{WhereChild, WhereNode},
    error::{Error, ErrorOrigin},
    model::{EntityModel, FieldModel},
};
use std::sync::Arc;

/// Separator the host uses for related-field paths (`owner__name`).
pub const LOOKUP_SEP: &str = "__";

///
/// Query
///
/// Everything the host ORM resolved for one logical query. The compiler
/// owns a `Query` for its whole lifetime and never hands it back mutated.
///

#[derive(Clone, Debug)]
pub struct Query {
    pub model: Arc<EntityModel>,
    /// Table aliases other than the model's own table that the host
    /// activated (joins, inherited parents).
    pub joins: Vec<String>,
    pub distinct: bool,
    pub having: bool,
    /// Raw SQL fragments from `extra()`.
    pub extra: Vec<String>,
    pub filter: WhereNode,
    pub order_by: Vec<String>,
    pub default_ordering: bool,
    pub standard_ordering: bool,
    /// Projected field names; `None` loads every field of the model.
    pub select: Option<Vec<String>>,
    pub low_mark: usize,
    pub high_mark: Option<usize>,
    pub aggregates: Vec<Aggregate>,
}

impl Query {
    #[must_use]
    pub fn new(model: Arc<EntityModel>) -> Self {
        Self {
            model,
            joins: Vec::new(),
            distinct: false,
            having: false,
            extra: Vec::new(),
            filter: WhereNode::empty(),
            order_by: Vec::new(),
            default_ordering: true,
            standard_ordering: true,
            select: None,
            low_mark: 0,
            high_mark: None,
            aggregates: Vec::new(),
        }
    }

    /// AND another child into the top-level filter.
    #[must_use]
    pub fn filter(mut self, child: impl Into<WhereChild>) -> Self {
        self.filter.push(child);
        self
    }

    /// Replace the whole constraint tree.
    #[must_use]
    pub fn where_node(mut self, node: WhereNode) -> Self {
        self.filter = node;
        self
    }

    #[must_use]
    pub fn order_by<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.order_by = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn clear_default_ordering(mut self) -> Self {
        self.default_ordering = false;
        self
    }

    /// Flip every resolved ordering direction (`QuerySet.reverse()`).
    #[must_use]
    pub const fn reverse(mut self) -> Self {
        self.standard_ordering = !self.standard_ordering;
        self
    }

    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    #[must_use]
    pub const fn having(mut self) -> Self {
        self.having = true;
        self
    }

    #[must_use]
    pub fn extra(mut self, fragment: impl Into<String>) -> Self {
        self.extra.push(fragment.into());
        self
    }

    #[must_use]
    pub fn join(mut self, alias: impl Into<String>) -> Self {
        self.joins.push(alias.into());
        self
    }

    #[must_use]
    pub fn select<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn slice(mut self, low: usize, high: Option<usize>) -> Self {
        self.low_mark = low;
        self.high_mark = high;
        self
    }

    #[must_use]
    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregates.push(aggregate);
        self
    }

    /// Reject query shapes that need a relational engine.
    pub fn validate(&self) -> Result<(), Error> {
        let own_table = self.model.table.as_str();
        if self.joins.iter().any(|alias| alias != own_table) {
            return Err(Error::unsupported_query(
                ErrorOrigin::Query,
                "This database doesn't support JOINs and multi-table inheritance.",
            ));
        }

        let refused = if self.distinct {
            Some("DISTINCT")
        } else if self.having {
            Some("HAVING")
        } else if !self.extra.is_empty() {
            Some("extra()")
        } else {
            None
        };

        match refused {
            Some(construct) => Err(Error::unsupported_query(
                ErrorOrigin::Query,
                format!("This query is not supported by the database ({construct})."),
            )),
            None => Ok(()),
        }
    }

    pub fn window(&self) -> Result<PageWindow, Error> {
        PageWindow::new(self.low_mark, self.high_mark)
    }

    /// Fields to load, in projection order.
    pub fn fields(&self) -> Result<Vec<&FieldModel>, Error> {
        let Some(select) = &self.select else {
            return Ok(self.model.fields.iter().collect());
        };

        select
            .iter()
            .map(|name| {
                if name.contains(LOOKUP_SEP) {
                    return Err(Error::unsupported_query(
                        ErrorOrigin::Query,
                        "Multi-table inheritance is not supported by non-relational DBs.",
                    ));
                }

                self.model.field(name).ok_or_else(|| {
                    Error::validation(
                        ErrorOrigin::Query,
                        format!("unknown field '{name}' on {}", self.model.name),
                    )
                })
            })
            .collect()
    }
}

///
/// TESTS
///
