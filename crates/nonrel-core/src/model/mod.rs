//! Runtime schema descriptors.
//!
//! Field and entity descriptors are owned by the host model layer; this crate
//! only reads them. They are immutable once built and cheap to clone.
pub mod entity;
pub mod field;
pub mod kind;
pub mod registry;

pub use entity::EntityModel;
pub use field::{EmbeddedTarget, FieldModel, Relation};
pub use kind::StorageKind;
pub use registry::EmbeddedRegistry;
