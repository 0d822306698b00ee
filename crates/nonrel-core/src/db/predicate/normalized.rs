use crate::{
    db::predicate::{Connector, Lookup},
    model::StorageKind,
    value::Value,
};

///
/// NormalizedTree
///
/// Decoder output: a separately owned copy of the host tree with every leaf
/// rewritten into backend-ready form. The AND/OR/negation shape is kept so
/// the in-memory evaluator can walk it; drivers that prefer a flat filter
/// list use [`NormalizedTree::conjuncts`].
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NormalizedTree {
    root: FilterNode,
}

impl NormalizedTree {
    #[must_use]
    pub const fn new(root: FilterNode) -> Self {
        Self { root }
    }

    /// Tree without constraints; matches every record.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(FilterNode::and(Vec::new()))
    }

    #[must_use]
    pub const fn root(&self) -> &FilterNode {
        &self.root
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Flatten into `(leaf, negated)` pairs joined by AND.
    ///
    /// CONTRACT: only valid for decoder output, whose shape guarantees that
    /// every OR group sits under a negation (`not (a OR b) => not a AND not b`).
    #[must_use]
    pub fn conjuncts(&self) -> Vec<(&FilterLeaf, bool)> {
        let mut out = Vec::new();
        collect_conjuncts(&self.root, false, &mut out);
        out
    }

    /// Number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.conjuncts().len()
    }
}

impl Default for NormalizedTree {
    fn default() -> Self {
        Self::empty()
    }
}

fn collect_conjuncts<'a>(node: &'a FilterNode, negated: bool, out: &mut Vec<(&'a FilterLeaf, bool)>) {
    let negated = negated ^ node.negated;

    for child in &node.children {
        match child {
            FilterChild::Node(inner) => collect_conjuncts(inner, negated, out),
            FilterChild::Leaf(leaf) => out.push((leaf, negated)),
        }
    }
}

///
/// FilterNode
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterNode {
    pub connector: Connector,
    pub negated: bool,
    pub children: Vec<FilterChild>,
}

impl FilterNode {
    #[must_use]
    pub const fn and(children: Vec<FilterChild>) -> Self {
        Self {
            connector: Connector::And,
            negated: false,
            children,
        }
    }

    #[must_use]
    pub const fn or(children: Vec<FilterChild>) -> Self {
        Self {
            connector: Connector::Or,
            negated: false,
            children,
        }
    }

    #[must_use]
    pub const fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

///
/// FilterChild
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FilterChild {
    Node(FilterNode),
    Leaf(FilterLeaf),
}

impl From<FilterNode> for FilterChild {
    fn from(node: FilterNode) -> Self {
        Self::Node(node)
    }
}

impl From<FilterLeaf> for FilterChild {
    fn from(leaf: FilterLeaf) -> Self {
        Self::Leaf(leaf)
    }
}

///
/// FilterLeaf
///
/// `kind` is the storage kind of the addressed column, for drivers that
/// dispatch on it when building native filters.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterLeaf {
    pub column: String,
    pub kind: StorageKind,
    pub lookup: Lookup,
    pub value: Value,
}

impl FilterLeaf {
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        kind: StorageKind,
        lookup: Lookup,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            column: column.into(),
            kind,
            lookup,
            value: value.into(),
        }
    }

    /// Leaf on a raw-kind column.
    #[must_use]
    pub fn raw(column: impl Into<String>, lookup: Lookup, value: impl Into<Value>) -> Self {
        Self::new(column, StorageKind::Raw, lookup, value)
    }
}
