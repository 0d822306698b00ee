use crate::{db::predicate::Lookup, model::FieldModel, value::Value};

///
/// Connector
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Connector {
    And,
    Or,
}

///
/// WhereNode
///
/// Boolean constraint tree as built by the host query layer.
/// The decoder reads it and never mutates it.
///

#[derive(Clone, Debug)]
pub struct WhereNode {
    pub connector: Connector,
    pub negated: bool,
    pub children: Vec<WhereChild>,
}

impl WhereNode {
    #[must_use]
    pub const fn and(children: Vec<WhereChild>) -> Self {
        Self {
            connector: Connector::And,
            negated: false,
            children,
        }
    }

    #[must_use]
    pub const fn or(children: Vec<WhereChild>) -> Self {
        Self {
            connector: Connector::Or,
            negated: false,
            children,
        }
    }

    /// Empty AND node; matches everything.
    #[must_use]
    pub const fn empty() -> Self {
        Self::and(Vec::new())
    }

    #[must_use]
    pub const fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    #[must_use]
    pub fn with(mut self, child: impl Into<WhereChild>) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: impl Into<WhereChild>) {
        self.children.push(child.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for WhereNode {
    fn default() -> Self {
        Self::empty()
    }
}

///
/// WhereChild
///

#[derive(Clone, Debug)]
pub enum WhereChild {
    Node(WhereNode),
    Leaf(Constraint),
}

impl From<WhereNode> for WhereChild {
    fn from(node: WhereNode) -> Self {
        Self::Node(node)
    }
}

impl From<Constraint> for WhereChild {
    fn from(leaf: Constraint) -> Self {
        Self::Leaf(leaf)
    }
}

///
/// Constraint
///
/// One host-side filter leaf.
///
/// `value` arrives in host packaging: usually a one-element list wrapping
/// the real argument. `annotation` carries the requested truth for `isnull`.
/// `field` is `None` for the host's own join/negation bookkeeping leaves.
///

#[derive(Clone, Debug)]
pub struct Constraint {
    /// Table alias the column belongs to; `None` means the query's own table.
    pub alias: Option<String>,
    /// Column the host resolved the lookup to.
    pub column: String,
    /// Field descriptor the host attached to the constraint.
    pub field: Option<FieldModel>,
    pub lookup: Lookup,
    pub annotation: bool,
    pub value: Value,
}

impl Constraint {
    /// Leaf on `field`'s own column with a host-wrapped argument.
    #[must_use]
    pub fn on(field: &FieldModel, lookup: Lookup, value: impl Into<Value>) -> Self {
        let value = value.into();
        let wrapped = if lookup.takes_list() {
            value
        } else {
            Value::List(vec![value])
        };

        Self {
            alias: None,
            column: field.column.clone(),
            field: Some(field.clone()),
            lookup,
            annotation: false,
            value: wrapped,
        }
    }

    /// `isnull` leaf; the requested truth travels in the annotation.
    #[must_use]
    pub fn is_null(field: &FieldModel, is_null: bool) -> Self {
        Self {
            annotation: is_null,
            ..Self::on(field, Lookup::IsNull, is_null)
        }
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }
}
