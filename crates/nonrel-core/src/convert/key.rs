use crate::{
    error::{Error, ErrorOrigin},
    model::FieldModel,
    value::Value,
};
use std::fmt;

///
/// KeyCodec
///
/// Driver-supplied encoding for key-kind values. Without one, key fields
/// cannot be stored at all.
///

pub trait KeyCodec: fmt::Debug + Send + Sync {
    fn encode(&self, value: &Value, field: &FieldModel) -> Result<Value, Error>;

    fn decode(&self, value: &Value, field: &FieldModel) -> Result<Value, Error>;
}

pub(super) fn encode(
    codec: Option<&dyn KeyCodec>,
    value: &Value,
    field: &FieldModel,
) -> Result<Value, Error> {
    codec.map_or_else(
        || Err(unsupported_key(field)),
        |codec| codec.encode(value, field),
    )
}

pub(super) fn decode(
    codec: Option<&dyn KeyCodec>,
    value: &Value,
    field: &FieldModel,
) -> Result<Value, Error> {
    codec.map_or_else(
        || Err(unsupported_key(field)),
        |codec| codec.decode(value, field),
    )
}

fn unsupported_key(field: &FieldModel) -> Error {
    Error::storage(
        ErrorOrigin::Convert,
        format!(
            "unsupported key type: no key codec registered for field {}",
            field.name
        ),
    )
}

pub(super) fn unsupported_primary_key(field: &FieldModel) -> Error {
    Error::storage(
        ErrorOrigin::Convert,
        format!("{} may not be used as primary key field.", field.kind),
    )
}
