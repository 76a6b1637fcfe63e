//! # Field and Root Commitments
//!
//! ```text
//! field_commitment = SHA256( hex(salt) || ":" || canonical_json(value) )
//! root_commitment  = SHA256( hex(c_1) || "," || hex(c_2) || ... || hex(c_n) )
//! ```
//!
//! The root preimage lists field commitments in ascending field-path order.
//! Ordering is the caller's job: `root_commitment` hashes what it is given,
//! in the order it is given.
//!
//! A hidden field contributes the commitment a previous holder computed; a
//! disclosed field contributes a commitment recomputed from its salt and
//! current content. Either way the root digest is the same, which is what
//! lets a verifier check a partial disclosure against the owner's digest.

use sdc_core::{CanonicalBytes, ContentDigest};
use sha2::{Digest, Sha256};

use crate::salt::Salt;

/// Separator between the hex salt and the canonical content.
pub const SALT_SEPARATOR: &[u8] = b":";

/// Separator between field commitments in the root preimage.
pub const FIELD_SEPARATOR: &[u8] = b",";

/// Commit to one field's canonical content under its salt.
pub fn field_commitment(salt: &Salt, content: &CanonicalBytes) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(salt.to_hex().as_bytes());
    hasher.update(SALT_SEPARATOR);
    hasher.update(content.as_bytes());
    finish(hasher)
}

/// Bind a sequence of field commitments into one root digest.
///
/// An empty sequence hashes the empty string.
pub fn root_commitment<'a, I>(field_commitments: I) -> ContentDigest
where
    I: IntoIterator<Item = &'a ContentDigest>,
{
    let mut hasher = Sha256::new();
    for (i, commitment) in field_commitments.into_iter().enumerate() {
        if i > 0 {
            hasher.update(FIELD_SEPARATOR);
        }
        hasher.update(commitment.to_hex().as_bytes());
    }
    finish(hasher)
}

fn finish(hasher: Sha256) -> ContentDigest {
    let hash = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::from_bytes(bytes)
}
