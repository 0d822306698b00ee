use crate::{
    model::{entity::EntityModel, kind::StorageKind},
    value::Value,
};
use std::sync::Arc;

///
/// FieldModel
///
/// Descriptor for one attribute of a record.
///
/// Invariant: collection kinds always carry an `item` descriptor; embedded
/// kinds always carry an `embedded` target.
///

#[derive(Clone, Debug)]
pub struct FieldModel {
    /// Logical attribute name used by the host ORM.
    pub name: String,
    /// Storage column / document key.
    pub column: String,
    pub kind: StorageKind,
    pub nullable: bool,
    pub primary_key: bool,
    /// Value used when a fetched record lacks the column.
    pub default: Option<Value>,
    /// Element descriptor for list/set items and dict values.
    pub item: Option<Box<Self>>,
    /// Referenced primary key for relation (key-kind) fields.
    pub relation: Option<Relation>,
    pub embedded: Option<EmbeddedTarget>,
}

impl FieldModel {
    /// Scalar field with `column == name`.
    ///
    /// Collection kinds get an untyped (raw) element descriptor and embedded
    /// kinds an untyped target, so the descriptor invariant always holds.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: StorageKind) -> Self {
        let name = name.into();
        let item = kind
            .is_collection()
            .then(|| Box::new(Self::new("value", StorageKind::Raw)));
        let embedded = (kind == StorageKind::Embedded).then_some(EmbeddedTarget::Untyped);

        Self {
            column: name.clone(),
            name,
            kind,
            nullable: false,
            primary_key: false,
            default: None,
            item,
            relation: None,
            embedded,
        }
    }

    #[must_use]
    pub fn list(name: impl Into<String>, item: Self) -> Self {
        Self::collection(name, StorageKind::List, item)
    }

    #[must_use]
    pub fn set(name: impl Into<String>, item: Self) -> Self {
        Self::collection(name, StorageKind::Set, item)
    }

    #[must_use]
    pub fn dict(name: impl Into<String>, item: Self) -> Self {
        Self::collection(name, StorageKind::Dict, item)
    }

    fn collection(name: impl Into<String>, kind: StorageKind, item: Self) -> Self {
        let mut field = Self::new(name, kind);
        field.item = Some(Box::new(item));
        field
    }

    /// Relation field pointing at `target` (the related model's primary key).
    /// The column follows the host convention `<name>_id`.
    #[must_use]
    pub fn foreign_key(name: impl Into<String>, model: impl Into<String>, target: Self) -> Self {
        let name = name.into();
        let mut field = Self::new(name.clone(), StorageKind::Key);
        field.column = format!("{name}_id");
        field.relation = Some(Relation {
            model: model.into(),
            target: Box::new(target),
        });
        field
    }

    /// Embedded field storing instances of one statically known entity.
    #[must_use]
    pub fn embedded(name: impl Into<String>, model: Arc<EntityModel>) -> Self {
        let mut field = Self::new(name, StorageKind::Embedded);
        field.embedded = Some(EmbeddedTarget::Typed(model));
        field
    }

    /// Embedded field whose concrete type is recorded next to the data.
    #[must_use]
    pub fn embedded_untyped(name: impl Into<String>) -> Self {
        Self::new(name, StorageKind::Embedded)
    }

    ///
    /// BUILDER
    ///

    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    ///
    /// ACCESS
    ///

    /// Descriptor whose rules govern conversion: relation fields convert
    /// with the referenced primary key's descriptor.
    #[must_use]
    pub fn conversion_target(&self) -> &Self {
        match &self.relation {
            Some(relation) => relation.target.conversion_target(),
            None => self,
        }
    }

    /// Default for a missing column; NULL when none is declared.
    #[must_use]
    pub fn default_or_null(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }
}

///
/// Relation
///

#[derive(Clone, Debug)]
pub struct Relation {
    /// Name of the related entity.
    pub model: String,
    /// The related entity's primary key descriptor.
    pub target: Box<FieldModel>,
}

///
/// EmbeddedTarget
///

#[derive(Clone, Debug)]
pub enum EmbeddedTarget {
    Typed(Arc<EntityModel>),
    /// Concrete type resolved through the embedded registry.
    Untyped,
}
