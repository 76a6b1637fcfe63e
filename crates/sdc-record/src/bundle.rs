//! # Disclosure Bundle
//!
//! The payload exchanged between an owner and a verifier:
//!
//! ```json
//! {
//!   "content":      { "email": "a@x.com" },
//!   "parts":        [ { "path": "email", "salt": "<64 hex>" } ],
//!   "missed_parts": [ { "path": "name",  "hash": "<64 hex>" }, ... ]
//! }
//! ```
//!
//! `content` is canonicalized: keys are sorted at every mapping level.
//!
//! ## Validation
//!
//! A bundle from another party is untrusted. [`DisclosureBundle::validate`]
//! rejects anything that could let a forged digest through:
//!
//! - a path outside the field universe,
//! - a path listed twice in one list,
//! - a path listed as both disclosed and hidden,
//! - content that is not a mapping, or content for a field with no salt.
//!
//! Missing or malformed salts and hashes never get this far: they fail
//! deserialization.

use std::collections::BTreeSet;

use sdc_core::ContentDigest;
use sdc_crypto::Salt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BundleError;
use crate::universe::FieldUniverse;

/// A disclosed field and the salt its commitment was computed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosedPart {
    /// Top-level field name.
    pub path: String,
    /// The field's salt.
    pub salt: Salt,
}

/// A hidden field and its commitment hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedPart {
    /// Top-level field name.
    pub path: String,
    /// The field's commitment hash.
    pub hash: ContentDigest,
}

/// Disclosed content plus everything needed to recompute the root digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisclosureBundle {
    /// Canonicalized content of the disclosed fields.
    pub content: Value,
    /// Disclosed fields with their salts.
    pub parts: Vec<DisclosedPart>,
    /// Hidden fields with their commitment hashes.
    pub missed_parts: Vec<MissedPart>,
}

impl DisclosureBundle {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, BundleError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON. Does not validate against a universe.
    pub fn from_json(json: &str) -> Result<Self, BundleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Names of the disclosed fields, in list order.
    pub fn disclosed_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.parts.iter().map(|p| p.path.as_str())
    }

    /// Names of the hidden fields, in list order.
    pub fn hidden_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.missed_parts.iter().map(|p| p.path.as_str())
    }

    /// Check the bundle's structure against `universe`.
    pub fn validate(&self, universe: &FieldUniverse) -> Result<(), BundleError> {
        let mut disclosed = BTreeSet::new();
        for path in self.disclosed_fields() {
            if !universe.contains(path) {
                return Err(BundleError::UnknownField(path.to_owned()));
            }
            if !disclosed.insert(path) {
                return Err(BundleError::DuplicateField(path.to_owned()));
            }
        }

        let mut hidden = BTreeSet::new();
        for path in self.hidden_fields() {
            if !universe.contains(path) {
                return Err(BundleError::UnknownField(path.to_owned()));
            }
            if disclosed.contains(path) {
                return Err(BundleError::ConflictingState(path.to_owned()));
            }
            if !hidden.insert(path) {
                return Err(BundleError::DuplicateField(path.to_owned()));
            }
        }

        let Value::Object(content) = &self.content else {
            return Err(BundleError::ContentNotAMapping);
        };
        if let Some(key) = content.keys().find(|k| !disclosed.contains(k.as_str())) {
            return Err(BundleError::UndeclaredContent(key.clone()));
        }
        Ok(())
    }
}
