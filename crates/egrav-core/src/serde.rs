use ::serde::{Deserialize, Serialize};

use crate::errors::{EgravError, ErrorInfo};

fn serde_error(code: &str, err: serde_json::Error) -> EgravError {
    EgravError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Serializes a value into JSON bytes with object keys in sorted order.
///
/// Keys are sorted by the round trip through [`serde_json::Value`], whose map
/// is ordered as long as serde_json's `preserve_order` feature stays off.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, EgravError> {
    let tree = serde_json::to_value(value).map_err(|err| serde_error("json-encode", err))?;
    serde_json::to_vec(&tree).map_err(|err| serde_error("json-write", err))
}

/// Restores a value from JSON bytes.
pub fn from_json_slice<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, EgravError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json-read", err))
}
