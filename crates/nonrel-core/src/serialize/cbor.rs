use crate::serialize::SerializeError;
use serde::{Serialize, de::DeserializeOwned};
use std::panic::{AssertUnwindSafe, catch_unwind};

pub(super) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializeError> {
    serde_cbor::to_vec(value).map_err(|e| SerializeError::Serialize(e.to_string()))
}

// serde_cbor can panic on some malformed nesting; a stored blob is
// untrusted input, so the panic is turned into a decode error.
pub(super) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializeError> {
    match catch_unwind(AssertUnwindSafe(|| serde_cbor::from_slice::<T>(bytes))) {
        Ok(decoded) => decoded.map_err(|e| SerializeError::Deserialize(e.to_string())),
        Err(_) => Err(SerializeError::Deserialize(
            "CBOR decoder panicked on stored blob".to_string(),
        )),
    }
}
