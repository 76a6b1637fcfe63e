//! # Error Types
//!
//! Leaf error types shared across the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Path resolution failures on *read* are not errors: they resolve to
//!   `None` / `null`. `PathError` covers malformed paths and writes that
//!   cannot be applied.
//! - Entropy failures are fatal to the operation that needed a salt and
//!   always propagate.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error parsing a field path or writing through one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path contains an empty segment (`a..b`, leading or trailing dot).
    #[error("field path {0:?} contains an empty segment")]
    EmptySegment(String),

    /// A write had to descend through a value that is not a mapping.
    #[error("cannot assign through non-mapping value at segment {segment:?} of {path:?}")]
    NotAMapping {
        /// The full path being written.
        path: String,
        /// The segment whose current value is not a mapping.
        segment: String,
    },

    /// The root of a record can only be replaced by a mapping.
    #[error("record root must be a mapping")]
    RootNotAMapping,
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The secure random source could not supply bytes.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// Hex decoding failed.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// Decoded value had the wrong length.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required byte length.
        expected: usize,
        /// Length actually decoded.
        actual: usize,
    },
}
