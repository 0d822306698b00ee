use crate::{
    config::Repr,
    convert::{ConvertMode, Conversions, invalid_repr},
    error::{Error, ErrorOrigin},
    model::FieldModel,
    serialize,
    value::{Value, canonical_cmp},
};
use std::collections::BTreeMap;

pub(super) fn item_field(field: &FieldModel) -> Result<&FieldModel, Error> {
    field.item.as_deref().ok_or_else(|| {
        Error::storage(
            ErrorOrigin::Convert,
            format!("collection field {} has no item descriptor", field.name),
        )
    })
}

fn elements<'a>(value: &'a Value, field: &FieldModel) -> Result<&'a [Value], Error> {
    value.as_elements().ok_or_else(|| {
        Error::validation(
            ErrorOrigin::Convert,
            format!(
                "Value of type {} is not iterable (field {})",
                value.type_label(),
                field.name
            ),
        )
    })
}

fn store_each(conv: &Conversions, items: &[Value], item: &FieldModel) -> Result<Vec<Value>, Error> {
    items
        .iter()
        .map(|v| conv.to_storage(v, item, ConvertMode::Store))
        .collect()
}

fn load_each(conv: &Conversions, items: &[Value], item: &FieldModel) -> Result<Vec<Value>, Error> {
    items
        .iter()
        .map(|v| conv.from_storage(v, item))
        .collect()
}

///
/// LIST
///

pub(super) fn list_to_storage(
    conv: &Conversions,
    value: &Value,
    field: &FieldModel,
) -> Result<Value, Error> {
    let items = store_each(conv, elements(value, field)?, item_field(field)?)?;

    match conv.storage().list {
        Repr::List => Ok(Value::List(items)),
        repr @ (Repr::Bytes | Repr::String) => serialized(&Value::List(items), repr),
        repr => Err(invalid_repr("list", repr)),
    }
}

pub(super) fn list_from_storage(
    conv: &Conversions,
    value: &Value,
    field: &FieldModel,
) -> Result<Value, Error> {
    let stored = unpack(value, conv.storage().list, "list")?;
    let items = load_each(conv, stored_elements(&stored, field)?, item_field(field)?)?;

    Ok(Value::List(items))
}

///
/// SET
///

pub(super) fn set_to_storage(
    conv: &Conversions,
    value: &Value,
    field: &FieldModel,
) -> Result<Value, Error> {
    let mut canonical = store_each(conv, elements(value, field)?, item_field(field)?)?;
    canonical.sort_by(canonical_cmp);
    canonical.dedup();

    match conv.storage().set {
        Repr::Set => Ok(Value::Set(canonical)),
        Repr::List => Ok(Value::List(canonical)),
        repr @ (Repr::Bytes | Repr::String) => serialized(&Value::Set(canonical), repr),
        repr => Err(invalid_repr("set", repr)),
    }
}

pub(super) fn set_from_storage(
    conv: &Conversions,
    value: &Value,
    field: &FieldModel,
) -> Result<Value, Error> {
    let stored = unpack(value, conv.storage().set, "set")?;
    let items = load_each(conv, stored_elements(&stored, field)?, item_field(field)?)?;

    Ok(Value::from_set(items))
}

///
/// DICT
///
/// Keys are never converted; values convert with the item descriptor.
///

pub(super) fn dict_to_storage(
    conv: &Conversions,
    value: &Value,
    field: &FieldModel,
) -> Result<Value, Error> {
    let Value::Map(entries) = value else {
        return Err(Error::validation(
            ErrorOrigin::Convert,
            format!(
                "Wrong type for dict field {}: expected a mapping, got {}",
                field.name,
                value.type_label()
            ),
        ));
    };

    let item = item_field(field)?;
    let entries = entries
        .iter()
        .map(|(k, v)| Ok((k.clone(), conv.to_storage(v, item, ConvertMode::Store)?)))
        .collect::<Result<BTreeMap<_, _>, Error>>()?;

    layout_mapping(entries, conv.storage().dict, "dict")
}

pub(super) fn dict_from_storage(
    conv: &Conversions,
    value: &Value,
    field: &FieldModel,
) -> Result<Value, Error> {
    let entries = read_mapping(value, conv.storage().dict, "dict")?;
    let item = item_field(field)?;

    let entries = entries
        .into_iter()
        .map(|(k, v)| Ok((k, conv.from_storage(&v, item)?)))
        .collect::<Result<BTreeMap<_, _>, Error>>()?;

    Ok(Value::Map(entries))
}

///
/// MAPPING LAYOUT
///
/// Shared by dict fields and embedded records.
///

pub(super) fn layout_mapping(
    entries: BTreeMap<String, Value>,
    repr: Repr,
    kind: &'static str,
) -> Result<Value, Error> {
    match repr {
        Repr::Dict => Ok(Value::Map(entries)),
        Repr::List => Ok(Value::List(
            entries
                .into_iter()
                .flat_map(|(k, v)| [Value::Text(k), v])
                .collect(),
        )),
        Repr::Bytes | Repr::String => serialized(&Value::Map(entries), repr),
        Repr::Set => Err(invalid_repr(kind, repr)),
    }
}

pub(super) fn read_mapping(
    value: &Value,
    repr: Repr,
    kind: &'static str,
) -> Result<BTreeMap<String, Value>, Error> {
    match unpack(value, repr, kind)? {
        Value::Map(entries) => Ok(entries),
        Value::List(flat) if repr == Repr::List => interleaved_pairs(flat),
        other => Err(Error::storage(
            ErrorOrigin::Convert,
            format!(
                "stored {kind} value has unexpected shape {}",
                other.type_label()
            ),
        )),
    }
}

fn interleaved_pairs(flat: Vec<Value>) -> Result<BTreeMap<String, Value>, Error> {
    if flat.len() % 2 != 0 {
        return Err(Error::storage(
            ErrorOrigin::Convert,
            format!("interleaved mapping has odd length {}", flat.len()),
        ));
    }

    let mut out = BTreeMap::new();
    let mut iter = flat.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        let Value::Text(key) = key else {
            return Err(Error::storage(
                ErrorOrigin::Convert,
                format!("interleaved mapping key is {}, not text", key.type_label()),
            ));
        };
        out.insert(key, value);
    }

    Ok(out)
}

///
/// SERIALIZED FORMS
///

fn serialized(value: &Value, repr: Repr) -> Result<Value, Error> {
    match repr {
        Repr::Bytes => Ok(Value::Bytes(serialize::to_bytes(value)?)),
        _ => Ok(Value::Text(serialize::to_text(value)?)),
    }
}

// Undo the serialized representation; native forms pass through.
fn unpack(value: &Value, repr: Repr, kind: &'static str) -> Result<Value, Error> {
    match (repr, value) {
        (Repr::Bytes, Value::Bytes(bytes)) => Ok(serialize::from_bytes(bytes)?),
        (Repr::String, Value::Text(text)) => Ok(serialize::from_text(text)?),
        (Repr::Bytes | Repr::String, other) => Err(Error::storage(
            ErrorOrigin::Convert,
            format!(
                "stored {kind} value should be serialized as {repr}, found {}",
                other.type_label()
            ),
        )),
        _ => Ok(value.clone()),
    }
}

fn stored_elements<'a>(value: &'a Value, field: &FieldModel) -> Result<&'a [Value], Error> {
    value.as_elements().ok_or_else(|| {
        Error::storage(
            ErrorOrigin::Convert,
            format!(
                "stored value for collection field {} is {}, not a list",
                field.name,
                value.type_label()
            ),
        )
    })
}
