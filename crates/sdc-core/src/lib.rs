//! # sdc-core — Foundational Types for Selective-Disclosure Commitments
//!
//! This crate is the leaf of the workspace DAG. It defines the primitives
//! every commitment computation flows through: canonical serialization,
//! SHA-256 content digests, and dotted field-path addressing into a nested
//! JSON record.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests.
//!    Two records with the same content but different key insertion order
//!    always produce the same bytes.
//!
//! 2. **`sha256_digest()` accepts only `&CanonicalBytes`.** A digest over
//!    non-canonical bytes is a compile error, not a review finding.
//!
//! 3. **Path resolution never panics.** A path that walks through a scalar,
//!    `null`, or an array resolves to `None`, which hashing code maps to
//!    `null`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sdc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod path;

// Re-export primary types for ergonomic imports.
pub use canonical::{canonicalize, CanonicalBytes};
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, CryptoError, PathError};
pub use path::{assign, resolve, resolve_or_null, FieldPath};
