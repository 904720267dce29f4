//! Fuzz target for canonical JSON encoding.
//!
//! Goal: canonicalization should never panic and must always emit valid JSON
//! with the same shape as its input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_canonical
//! ```

#![no_main]

use govseal_domain::canonical::canonical_json;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let once = canonical_json(&value);
    let reparsed: serde_json::Value =
        serde_json::from_str(&once).expect("canonical output must be valid JSON");
    assert_eq!(shape(&reparsed), shape(&value));
});

/// Structure of a value with numbers erased (float text may not round-trip exactly).
fn shape(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Number(_) => serde_json::Value::Null,
        serde_json::Value::Array(items) => items.iter().map(shape).collect(),
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), shape(v)))
            .collect::<serde_json::Map<_, _>>()
            .into(),
        other => other.clone(),
    }
}
