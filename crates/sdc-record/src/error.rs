//! # Record Error Types
//!
//! Structured errors for universe configuration, bundle validation, and
//! disclosure controller operations.

use sdc_core::{CanonicalizationError, ContentDigest, CryptoError, PathError};
use thiserror::Error;

/// Error building a field universe.
#[derive(Error, Debug)]
pub enum UniverseError {
    /// A universe must define at least one field.
    #[error("field universe is empty")]
    Empty,

    /// Field names are non-empty and contain no `.`.
    #[error("invalid field name {0:?}: names must be non-empty and contain no '.'")]
    InvalidFieldName(String),

    /// The same field name was declared twice.
    #[error("field {0:?} declared more than once")]
    DuplicateField(String),

    /// YAML configuration could not be parsed.
    #[error("invalid universe YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON configuration could not be parsed.
    #[error("invalid universe JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A disclosure bundle that must not be reconstructed.
#[derive(Error, Debug)]
pub enum BundleError {
    /// A part names a field outside the universe.
    #[error("bundle references field {0:?} outside the field universe")]
    UnknownField(String),

    /// A field is listed twice in the same part list.
    #[error("bundle lists field {0:?} more than once")]
    DuplicateField(String),

    /// A field is listed as both disclosed and hidden.
    #[error("bundle lists field {0:?} as both disclosed and hidden")]
    ConflictingState(String),

    /// The bundle content is not a mapping.
    #[error("bundle content must be a mapping")]
    ContentNotAMapping,

    /// Content is present for a field with no disclosed part carrying its salt.
    #[error("bundle content carries field {0:?} without a salt")]
    UndeclaredContent(String),

    /// The bundle is not valid JSON or lacks a required salt or hash.
    #[error("bundle decode failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error from a disclosure controller operation.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The field is not part of the universe.
    #[error("field {0:?} is not part of the field universe")]
    UnknownField(String),

    /// The operation needs content, but the field is hidden or unknown here.
    #[error("field {field:?} is {state}, not disclosed")]
    FieldNotDisclosed {
        /// Field name.
        field: String,
        /// Current state name.
        state: &'static str,
    },

    /// Writes are only accepted by the owner-side instance.
    #[error("{origin} record is read-only")]
    ReadOnly {
        /// How the instance was created.
        origin: &'static str,
    },

    /// Malformed path or impossible write.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Canonical serialization failed.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// Salt generation failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The bundle was rejected before reconstruction.
    #[error("malformed disclosure bundle: {0}")]
    MalformedBundle(#[from] BundleError),

    /// The reconstructed record does not match the published digest.
    #[error("root digest mismatch: expected {expected}, computed {actual}")]
    DigestMismatch {
        /// Digest the verifier was given.
        expected: ContentDigest,
        /// Digest recomputed from the bundle.
        actual: ContentDigest,
    },
}
