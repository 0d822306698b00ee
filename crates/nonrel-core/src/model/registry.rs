use crate::{
    error::{Error, ErrorOrigin},
    model::entity::EntityModel,
};
use std::{collections::BTreeMap, sync::Arc};

///
/// EmbeddedRegistry
///
/// Maps discriminator tags (`module.Name`) to the entity models that untyped
/// embedded fields may hold. Populated once at startup; lookups of unknown
/// tags fail instead of guessing.
///

#[derive(Clone, Debug, Default)]
pub struct EmbeddedRegistry {
    models: BTreeMap<String, Arc<EntityModel>>,
}

impl EmbeddedRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its own discriminator tag.
    #[must_use]
    pub fn with(mut self, model: Arc<EntityModel>) -> Self {
        self.register(model);
        self
    }

    pub fn register(&mut self, model: Arc<EntityModel>) {
        self.models.insert(model.type_tag(), model);
    }

    pub fn resolve(&self, tag: &str) -> Result<Arc<EntityModel>, Error> {
        self.models.get(tag).cloned().ok_or_else(|| {
            Error::storage(
                ErrorOrigin::Convert,
                format!("unregistered embedded type '{tag}'"),
            )
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
