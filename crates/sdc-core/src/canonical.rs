//! # Canonical Serialization — Key-Sorted Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in commitment and digest computation.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which canonicalizes the
//! value before compact serialization. Any function that needs hashable
//! bytes accepts `&CanonicalBytes`, so the "hashed the insertion-ordered
//! record" defect class cannot be written.
//!
//! ## Canonicalization Rules
//!
//! 1. **Mappings** — keys sorted ascending (byte-wise string order), values
//!    canonicalized recursively.
//! 2. **Arrays** — passed through unchanged. Element order is data, and
//!    mappings nested inside arrays are not re-sorted.
//! 3. **Scalars and `null`** — passed through unchanged.
//!
//! Serialization is compact (`,` and `:` separators, no whitespace) and
//! keeps non-ASCII characters as UTF-8.
//!
//! The workspace builds `serde_json` with `preserve_order`, so a `Value`
//! remembers insertion order until it is canonicalized.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by canonical, compact JSON serialization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Every mapping reachable without passing through an array has sorted keys.
/// - Serialization uses compact separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (e.g. a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let bytes = serde_json::to_vec(&canonicalize(&value))?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Return a copy of `value` with every mapping level's keys sorted.
///
/// Recursion follows mapping values only; arrays are cloned as-is.
/// Pure and idempotent: `canonicalize(&canonicalize(v)) == canonicalize(v)`
/// byte-for-byte once serialized.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (k, v) in entries {
                sorted.insert(k.clone(), canonicalize(v));
            }
            Value::Object(sorted)
        }
        other => other.clone(),
    }
}
