use crate::model::{field::FieldModel, kind::StorageKind};

///
/// EntityModel
///
/// Runtime model for one entity (table / collection).
///

#[derive(Clone, Debug)]
pub struct EntityModel {
    /// Module path component of the discriminator tag.
    pub module: String,
    /// Entity name; also the embedded discriminator type name.
    pub name: String,
    /// Storage table / collection name.
    pub table: String,
    /// Ordered field list; the primary key is one of them.
    pub fields: Vec<FieldModel>,
    /// Default ordering (`"-name"` for descending).
    pub ordering: Vec<String>,
    primary_key: usize,
}

impl EntityModel {
    /// Build an entity model. When no field is flagged as primary key, an
    /// integer `id` key is prepended, mirroring the host's implicit key.
    #[must_use]
    pub fn new(
        module: impl Into<String>,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldModel>,
    ) -> Self {
        let module = module.into();
        let name = name.into();
        let mut fields: Vec<FieldModel> = fields.into_iter().collect();

        let primary_key = if let Some(index) = fields.iter().position(|f| f.primary_key) {
            index
        } else {
            fields.insert(0, FieldModel::new("id", StorageKind::Integer).primary_key());
            0
        };

        Self {
            table: format!("{}_{}", module, name.to_lowercase()),
            module,
            name,
            fields,
            ordering: Vec::new(),
            primary_key,
        }
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn ordering<S: Into<String>>(mut self, ordering: impl IntoIterator<Item = S>) -> Self {
        self.ordering = ordering.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn primary_key(&self) -> &FieldModel {
        &self.fields[self.primary_key]
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn field_by_column(&self, column: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.column == column)
    }

    /// Discriminator tag stored with untyped embedded instances.
    #[must_use]
    pub fn type_tag(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }
}

///
/// TESTS
///
