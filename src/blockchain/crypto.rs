use serde_json::Value;
use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of `data` as a lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Content addressing for ledger values
///
/// Implementors project themselves onto a tree of JSON primitives. The
/// projection never touches `self`, and nested values must already be
/// reduced to plain objects and arrays before they are hashed.
pub trait ContentHash {
    /// Returns the wire representation of this value
    fn to_wire_format(&self) -> Value;

    /// Calculates the hash of this value
    ///
    /// # Returns
    ///
    /// The SHA-256 hash of the canonical JSON rendering as a hexadecimal string
    fn content_hash(&self) -> String {
        sha256_hex(canonical_json(&self.to_wire_format()).as_bytes())
    }
}

/// Renders a value as compact JSON with object keys in sorted order
pub fn canonical_json(value: &Value) -> String {
    sort_keys(value).to_string()
}

// Rebuilds objects in key order so the output holds even with serde_json's
// `preserve_order` feature enabled somewhere in the dependency graph.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
