//! # sdc-crypto — Commitment Primitives
//!
//! Provides the cryptographic building blocks the disclosure controller
//! composes:
//!
//! - **Salts** drawn from a pluggable [`SaltSource`]. The default
//!   [`OsSaltSource`] reads the operating-system CSPRNG; a failure there is
//!   surfaced as `CryptoError::EntropyUnavailable`, never papered over.
//!   The deterministic `SeededSaltSource` exists only under `cfg(test)` or
//!   the `test-utils` feature.
//! - **Field commitments**: SHA-256 over a field's salt and its canonical
//!   JSON serialization.
//! - **Root commitments**: SHA-256 over every field commitment, in field
//!   path order.
//!
//! ## Crate Policy
//!
//! - Depends only on `sdc-core` internally.
//! - No mocking of hashing in tests: every test hashes real `CanonicalBytes`
//!   with real SHA-256.

pub mod commitment;
pub mod salt;

pub use commitment::{field_commitment, root_commitment, FIELD_SEPARATOR, SALT_SEPARATOR};
pub use salt::{OsSaltSource, Salt, SaltSource, SALT_LEN};
#[cfg(any(test, feature = "test-utils"))]
pub use salt::SeededSaltSource;
