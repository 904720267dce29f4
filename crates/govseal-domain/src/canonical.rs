//! Canonical JSON bytes and SHA-256 digests.

use crate::error::SealError;
use serde::Serialize;
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};

/// Render `value` with recursively sorted object keys and no insignificant whitespace.
/// Arrays keep their order.
pub fn canonical_json(value: &JsonValue) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &JsonValue, out: &mut String) {
    match value {
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_) => {
            out.push_str(&value.to_string());
        }
        JsonValue::Array(entries) => {
            out.push('[');
            for (index, entry) in entries.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(entry, out);
            }
            out.push(']');
        }
        JsonValue::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (index, key) in keys.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&JsonValue::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
    }
}

/// Serialize then canonicalize. `context` names the document in error messages.
pub fn to_canonical<T: Serialize>(value: &T, context: &'static str) -> Result<String, SealError> {
    let json = serde_json::to_value(value).map_err(|e| SealError::Serialize {
        context,
        message: e.to_string(),
    })?;
    Ok(canonical_json(&json))
}

/// Lowercase hex SHA-256.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
