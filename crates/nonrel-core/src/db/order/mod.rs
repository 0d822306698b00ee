//! Ordering resolution and the in-memory record comparator.


use crate::{
    db::{
        query::{LOOKUP_SEP, Query},
        record::Record,
    },
    error::{Error, ErrorOrigin},
    value::canonical_cmp,
};
use std::cmp::Ordering;

///
/// OrderingSpec
///
/// Resolved ordering of one query. `Natural` asks the driver for its own
/// intrinsic order (or the reverse of it); the in-memory comparator treats
/// it as "all rows tie".
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OrderingSpec {
    Natural { reversed: bool },
    Fields(Vec<OrderKey>),
}

impl OrderingSpec {
    #[must_use]
    pub const fn natural() -> Self {
        Self::Natural { reversed: false }
    }

    #[must_use]
    pub const fn is_natural(&self) -> bool {
        matches!(self, Self::Natural { .. })
    }

    /// Resolve the host's requested ordering against the query's model.
    ///
    /// Explicit `order_by` wins; the model's default ordering applies only
    /// while default ordering is enabled. `pk` names the concrete key field
    /// and `standard_ordering == false` flips every direction.
    pub fn resolve(query: &Query) -> Result<Self, Error> {
        let model = &query.model;
        let requested = if query.order_by.is_empty() && query.default_ordering {
            &model.ordering
        } else {
            &query.order_by
        };

        if requested.is_empty() {
            return Ok(Self::Natural {
                reversed: !query.standard_ordering,
            });
        }

        let mut keys = Vec::with_capacity(requested.len());
        for raw in requested {
            if raw.contains(LOOKUP_SEP) || raw.contains('.') {
                return Err(Error::unsupported_query(
                    ErrorOrigin::Order,
                    format!("Ordering can't span tables on non-relational backends ({raw})"),
                ));
            }
            if raw == "?" {
                return Err(Error::unsupported_query(
                    ErrorOrigin::Order,
                    "Randomized ordering isn't supported by the backend",
                ));
            }

            let key = raw.trim_start_matches('+');
            let descending = key.starts_with('-');
            let name = match key.trim_start_matches('-') {
                "pk" => model.primary_key().name.as_str(),
                other => other,
            };

            let field = model.field(name).ok_or_else(|| {
                Error::validation(
                    ErrorOrigin::Order,
                    format!("Cannot resolve keyword '{name}' into field of {}", model.name),
                )
            })?;

            keys.push(OrderKey {
                field: field.name.clone(),
                column: field.column.clone(),
                ascending: descending != query.standard_ordering,
            });
        }

        Ok(Self::Fields(keys))
    }
}

impl Default for OrderingSpec {
    fn default() -> Self {
        Self::natural()
    }
}

///
/// OrderKey
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderKey {
    pub field: String,
    pub column: String,
    pub ascending: bool,
}

impl OrderKey {
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        let column = column.into();

        Self {
            field: column.clone(),
            column,
            ascending: true,
        }
    }

    #[must_use]
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            ascending: false,
            ..Self::asc(column)
        }
    }
}

/// Compare two records under `spec`; the first non-equal key decides.
///
/// A total preorder: every key uses the canonical value order, and rows
/// equal on all keys tie so a stable sort keeps fetch order.
#[must_use]
pub fn compare(left: &Record, right: &Record, spec: &OrderingSpec) -> Ordering {
    let OrderingSpec::Fields(keys) = spec else {
        return Ordering::Equal;
    };

    for key in keys {
        let ordering = canonical_cmp(left.get_or_null(&key.column), right.get_or_null(&key.column));
        let ordering = if key.ascending {
            ordering
        } else {
            ordering.reverse()
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

/// Stable in-place sort by `spec`. Natural ordering leaves rows as fetched.
pub fn sort(records: &mut [Record], spec: &OrderingSpec) {
    if spec.is_natural() {
        return;
    }

    records.sort_by(|left, right| compare(left, right, spec));
}
