mod cbor;
mod json;

use crate::{
    error::{Error, ErrorOrigin},
    value::Value,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Versioned serialization for collections and embedded records that a
/// backend cannot store natively.
///
/// The whole value is the serialization unit. Two encodings exist:
/// - binary: CBOR (`bytes` representation)
/// - textual: JSON (`string` representation)
///
/// Both wrap the payload in an envelope `{ "v": <version>, "value": ... }`
/// so stored blobs can be migrated when the layout changes.

/// Current envelope version.
pub const SERIALIZATION_VERSION: u8 = 1;

/// Upper bound on accepted serialized payload size.
pub const MAX_SERIALIZED_BYTES: usize = 16 * 1024 * 1024;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("deserialize size limit exceeded: {len} bytes (limit {max_bytes})")]
    DeserializeSizeLimitExceeded { len: usize, max_bytes: usize },

    #[error("unsupported serialization version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },
}

impl From<SerializeError> for Error {
    fn from(err: SerializeError) -> Self {
        Self::storage(ErrorOrigin::Serialize, err.to_string())
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    v: u8,
    value: &'a Value,
}

#[derive(Deserialize)]
struct Envelope {
    v: u8,
    value: Value,
}

impl Envelope {
    fn into_value(self) -> Result<Value, SerializeError> {
        if self.v != SERIALIZATION_VERSION {
            return Err(SerializeError::UnsupportedVersion {
                found: self.v,
                expected: SERIALIZATION_VERSION,
            });
        }

        Ok(self.value)
    }
}

const fn envelope(value: &Value) -> EnvelopeRef<'_> {
    EnvelopeRef {
        v: SERIALIZATION_VERSION,
        value,
    }
}

// Checked before any decoder sees the payload.
const fn within_limit(len: usize) -> Result<(), SerializeError> {
    if len > MAX_SERIALIZED_BYTES {
        return Err(SerializeError::DeserializeSizeLimitExceeded {
            len,
            max_bytes: MAX_SERIALIZED_BYTES,
        });
    }

    Ok(())
}

/// Serialize a value into a versioned CBOR blob.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>, SerializeError> {
    cbor::encode(&envelope(value))
}

/// Deserialize a blob produced by [`to_bytes`].
pub fn from_bytes(bytes: &[u8]) -> Result<Value, SerializeError> {
    within_limit(bytes.len())?;

    cbor::decode::<Envelope>(bytes)?.into_value()
}

/// Serialize a value into a versioned JSON string.
pub fn to_text(value: &Value) -> Result<String, SerializeError> {
    json::encode(&envelope(value))
}

/// Deserialize a string produced by [`to_text`].
pub fn from_text(text: &str) -> Result<Value, SerializeError> {
    within_limit(text.len())?;

    json::decode::<Envelope>(text)?.into_value()
}

///
/// TESTS
///
