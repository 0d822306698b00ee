use crate::{
    convert::{
        ConvertMode, Conversions,
        collection::{layout_mapping, read_mapping},
    },
    error::{Error, ErrorOrigin},
    model::{EmbeddedTarget, EntityModel, FieldModel},
    value::{EmbeddedValue, Value},
};
use std::{collections::BTreeMap, sync::Arc};

/// Column holding the module half of an untyped instance's tag.
pub const MODULE_COLUMN: &str = "_module";

/// Column holding the entity-name half of an untyped instance's tag.
pub const MODEL_COLUMN: &str = "_model";

pub(super) fn to_storage(
    conv: &Conversions,
    value: &Value,
    field: &FieldModel,
) -> Result<Value, Error> {
    let Value::Embedded(instance) = value else {
        return Err(Error::validation(
            ErrorOrigin::Convert,
            format!(
                "Expected an embedded instance for field {}, got {}",
                field.name,
                value.type_label()
            ),
        ));
    };

    let (model, untyped) = match &field.embedded {
        Some(EmbeddedTarget::Typed(model)) => {
            check_instance_type(instance, model, field)?;
            (Arc::clone(model), false)
        }
        Some(EmbeddedTarget::Untyped) | None => {
            let tag = instance.type_tag.as_deref().ok_or_else(|| {
                Error::validation(
                    ErrorOrigin::Convert,
                    format!(
                        "untyped embedded field {} requires an instance with a type tag",
                        field.name
                    ),
                )
            })?;
            (conv.registry().resolve(tag)?, true)
        }
    };

    let mut columns = BTreeMap::new();
    for inner in &model.fields {
        let app_value = instance
            .fields
            .get(&inner.name)
            .cloned()
            .unwrap_or_else(|| inner.default_or_null());

        // an unset key of an embedded instance is not stored
        if inner.primary_key && app_value.is_null() {
            continue;
        }

        let stored = conv.to_storage(&app_value, inner, ConvertMode::Store)?;
        columns.insert(inner.column.clone(), stored);
    }

    if untyped {
        columns.insert(MODULE_COLUMN.to_string(), Value::Text(model.module.clone()));
        columns.insert(MODEL_COLUMN.to_string(), Value::Text(model.name.clone()));
    }

    layout_mapping(columns, conv.storage().embedded, "embedded")
}

pub(super) fn from_storage(
    conv: &Conversions,
    value: &Value,
    field: &FieldModel,
) -> Result<Value, Error> {
    let mut columns = read_mapping(value, conv.storage().embedded, "embedded")?;

    let model = match &field.embedded {
        Some(EmbeddedTarget::Typed(model)) => Arc::clone(model),
        Some(EmbeddedTarget::Untyped) | None => {
            let module = take_tag_part(&mut columns, MODULE_COLUMN, field)?;
            let name = take_tag_part(&mut columns, MODEL_COLUMN, field)?;
            conv.registry().resolve(&format!("{module}.{name}"))?
        }
    };

    let mut fields = BTreeMap::new();
    for inner in &model.fields {
        let app_value = match columns.remove(&inner.column) {
            Some(stored) => conv.from_storage(&stored, inner)?,
            None if inner.primary_key => continue,
            None => inner.default_or_null(),
        };
        fields.insert(inner.name.clone(), app_value);
    }

    Ok(Value::Embedded(EmbeddedValue::new(
        Some(model.type_tag()),
        fields,
    )))
}

fn check_instance_type(
    instance: &EmbeddedValue,
    model: &EntityModel,
    field: &FieldModel,
) -> Result<(), Error> {
    let expected = model.type_tag();

    match instance.type_tag.as_deref() {
        Some(tag) if tag == expected => Ok(()),
        Some(tag) => Err(Error::validation(
            ErrorOrigin::Convert,
            format!("Expected instance of type {expected}, not {tag} (field {})", field.name),
        )),
        None => Err(Error::validation(
            ErrorOrigin::Convert,
            format!(
                "Expected instance of type {expected}, not an untagged instance (field {})",
                field.name
            ),
        )),
    }
}

fn take_tag_part(
    columns: &mut BTreeMap<String, Value>,
    column: &str,
    field: &FieldModel,
) -> Result<String, Error> {
    match columns.remove(column) {
        Some(Value::Text(part)) => Ok(part),
        _ => Err(Error::storage(
            ErrorOrigin::Convert,
            format!(
                "stored untyped embedded value for field {} lacks a text '{column}' column",
                field.name
            ),
        )),
    }
}
