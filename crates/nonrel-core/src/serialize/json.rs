use crate::serialize::SerializeError;
use serde::{Serialize, de::DeserializeOwned};

pub(super) fn encode<T: Serialize>(value: &T) -> Result<String, SerializeError> {
    serde_json::to_string(value).map_err(|e| SerializeError::Serialize(e.to_string()))
}

pub(super) fn decode<T: DeserializeOwned>(text: &str) -> Result<T, SerializeError> {
    serde_json::from_str(text).map_err(|e| SerializeError::Deserialize(e.to_string()))
}
