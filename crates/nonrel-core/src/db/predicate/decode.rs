use crate::{
    convert::{ConvertMode, Conversions},
    db::{
        features::year_lookup_bounds,
        index::IndexRegistry,
        predicate::{
            Connector, Constraint, FilterChild, FilterLeaf, FilterNode, Lookup, NormalizedTree,
            WhereChild, WhereNode,
        },
    },
    error::{Error, ErrorOrigin},
    model::{EntityModel, FieldModel, StorageKind},
    value::Value,
};
use std::borrow::Cow;

///
/// Decoder
///
/// Turns a host constraint tree into a [`NormalizedTree`] for one entity.
///
/// Non-relational backends only support AND-connected filters. An OR group
/// is accepted only under a negation, where `not (a OR b)` can be expressed
/// as `(not a) AND (not b)`. Anything else is rejected before storage I/O.
///

pub struct Decoder<'a> {
    model: &'a EntityModel,
    conversions: &'a Conversions,
    indexes: &'a IndexRegistry,
}

impl<'a> Decoder<'a> {
    #[must_use]
    pub const fn new(
        model: &'a EntityModel,
        conversions: &'a Conversions,
        indexes: &'a IndexRegistry,
    ) -> Self {
        Self {
            model,
            conversions,
            indexes,
        }
    }

    pub fn decode(&self, tree: &WhereNode) -> Result<NormalizedTree, Error> {
        let root = self.decode_node(tree, false)?;

        Ok(NormalizedTree::new(root))
    }

    fn decode_node(&self, node: &WhereNode, outer_negated: bool) -> Result<FilterNode, Error> {
        let negated = outer_negated ^ node.negated;

        if !negated && node.connector != Connector::And {
            return Err(unsupported("Only AND filters are supported."));
        }

        let children: Vec<&WhereChild> = node
            .children
            .iter()
            .filter(|child| !is_bookkeeping(child))
            .collect();

        if negated && node.connector != Connector::Or && children.len() > 1 {
            return Err(unsupported(
                "When negating a whole filter subgroup (e.g. a Q object) the subgroup filters \
                 must be connected via OR, so the non-relational backend can convert them like \
                 this: 'not (a OR b) => (not a) AND (not b)'.",
            ));
        }

        let mut out = Vec::with_capacity(children.len());
        for child in children {
            match child {
                WhereChild::Node(inner) => {
                    let inner = self.decode_node(inner, negated)?;
                    if !inner.children.is_empty() {
                        out.push(FilterChild::Node(inner));
                    }
                }
                WhereChild::Leaf(leaf) => out.push(FilterChild::Leaf(self.decode_leaf(leaf)?)),
            }
        }

        Ok(FilterNode {
            connector: node.connector,
            negated: node.negated,
            children: out,
        })
    }

    fn decode_leaf(&self, leaf: &Constraint) -> Result<FilterLeaf, Error> {
        if let Some(alias) = &leaf.alias
            && alias != &self.model.table
        {
            return Err(unsupported(
                "This database doesn't support JOINs and multi-table inheritance.",
            ));
        }

        let field = self.resolve_field(leaf)?;
        let value = unwrap_argument(leaf, &field)?;

        if self.indexes.is_indexed(&self.model.name, &field.name, leaf.lookup) {
            let column = IndexRegistry::column(&field.column, leaf.lookup);
            let value = IndexRegistry::index_value(leaf.lookup, &value);

            return Ok(FilterLeaf::new(
                column,
                StorageKind::String,
                Lookup::Exact,
                value,
            ));
        }

        let value = self
            .conversions
            .to_storage(&value, &field, ConvertMode::Lookup(leaf.lookup))?;

        Ok(FilterLeaf::new(
            field.column.clone(),
            field.kind,
            leaf.lookup,
            value,
        ))
    }

    // For `parent.child_set` filters the host hands over the parent's key
    // while the column is the child's foreign key.
    fn resolve_field<'c>(&self, leaf: &'c Constraint) -> Result<Cow<'c, FieldModel>, Error>
    where
        'a: 'c,
    {
        let Some(field) = &leaf.field else {
            return Err(unsupported(format!(
                "filter on column '{}' carries no field reference",
                leaf.column
            )));
        };

        if field.column == leaf.column {
            return Ok(Cow::Borrowed(field));
        }

        if !field.primary_key {
            return Err(unsupported(
                "This database doesn't support filtering on non-primary key ForeignKey fields.",
            ));
        }

        self.model
            .field_by_column(&leaf.column)
            .filter(|f| f.relation.is_some())
            .map(Cow::Borrowed)
            .ok_or_else(|| {
                unsupported(format!(
                    "column '{}' is not a relation on {}",
                    leaf.column, self.model.name
                ))
            })
    }
}

// `isnull` leaves without a field are join/negation artifacts of the host.
fn is_bookkeeping(child: &WhereChild) -> bool {
    matches!(
        child,
        WhereChild::Leaf(Constraint {
            field: None,
            lookup: Lookup::IsNull,
            ..
        })
    )
}

// Undo host argument packaging and decoration.
fn unwrap_argument(leaf: &Constraint, field: &FieldModel) -> Result<Value, Error> {
    let lookup = leaf.lookup;

    if lookup == Lookup::IsNull {
        return Ok(Value::Bool(leaf.annotation));
    }

    let value = match &leaf.value {
        Value::List(items) if !lookup.takes_list() && items.len() == 1 => items[0].clone(),
        other => other.clone(),
    };

    match lookup {
        Lookup::Year => return year_bounds(value, field),
        Lookup::Range => return range_bounds(value),
        Lookup::In => {
            return match value {
                Value::List(items) | Value::Set(items) => Ok(Value::List(items)),
                other => Err(unsupported(format!(
                    "'in' filters need a list argument, got {}",
                    other.type_label()
                ))),
            };
        }
        _ => {}
    }

    if value.is_collection() {
        return Err(unsupported("only 'in' filters accept a list argument"));
    }

    Ok(match value {
        Value::Text(text) => Value::Text(lookup.wildcards().strip(&text)),
        other => other,
    })
}

fn year_bounds(value: Value, field: &FieldModel) -> Result<Value, Error> {
    match value {
        Value::Int(year) => Ok(Value::List(year_lookup_bounds(year, field.kind)?.to_vec())),
        Value::List(items) if items.len() == 1 => year_bounds(items[0].clone(), field),
        Value::List(items) if items.len() == 2 => Ok(Value::List(items)),
        other => Err(unsupported(format!(
            "'year' filters need a year or two bounds, got {}",
            other.type_label()
        ))),
    }
}

fn range_bounds(value: Value) -> Result<Value, Error> {
    match value {
        Value::List(items) if items.len() == 2 => Ok(Value::List(items)),
        _ => Err(unsupported("'range' filters need exactly two bounds")),
    }
}

fn unsupported(message: impl Into<String>) -> Error {
    Error::unsupported_query(ErrorOrigin::Decode, message)
}
