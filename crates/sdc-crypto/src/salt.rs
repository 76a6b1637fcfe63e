//! # Field Salts
//!
//! One salt per disclosed field, generated on first use and cached by the
//! record for its lifetime. Salts are never derived from content: their
//! only job is to stop a verifier from brute-forcing a low-entropy hidden
//! value (a phone number, an empty string) from its commitment hash.
//!
//! ## Serde
//!
//! Salts serialize as 64-character lowercase hex strings.

#[cfg(any(test, feature = "test-utils"))]
use std::sync::Mutex;

use rand::rngs::OsRng;
#[cfg(any(test, feature = "test-utils"))]
use rand::rngs::StdRng;
use rand::RngCore;
#[cfg(any(test, feature = "test-utils"))]
use rand::SeedableRng;
use sdc_core::digest::{hex_decode_fixed, hex_encode};
use sdc_core::CryptoError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Salt length in bytes.
pub const SALT_LEN: usize = 32;

/// A per-field random salt.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Wrap raw salt bytes.
    pub fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Return the raw salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }

    /// Render the salt as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }

    /// Parse a salt from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        hex_decode_fixed::<SALT_LEN>(hex).map(Self)
    }
}

impl Serialize for Salt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Salt({}...)", hex_encode(&self.0[..4]))
    }
}

/// A cryptographically secure source of fresh salts.
///
/// Implementations must never fall back to weak randomness: if bytes are
/// unavailable, return `CryptoError::EntropyUnavailable`.
pub trait SaltSource: Send + Sync + std::fmt::Debug {
    /// Produce a fresh, independent salt.
    fn generate(&self) -> Result<Salt, CryptoError>;
}

/// Salts from the operating-system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSaltSource;

impl SaltSource for OsSaltSource {
    fn generate(&self) -> Result<Salt, CryptoError> {
        let mut bytes = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::EntropyUnavailable(e.to_string()))?;
        Ok(Salt(bytes))
    }
}

/// Deterministic salts from a seeded ChaCha generator.
///
/// Two sources built from the same seed yield the same salt sequence, so the
/// salts are guessable. Only compiled for tests or with the `test-utils`
/// feature; owners committing real data use [`OsSaltSource`].
#[cfg(any(test, feature = "test-utils"))]
pub struct SeededSaltSource {
    rng: Mutex<StdRng>,
}

#[cfg(any(test, feature = "test-utils"))]
impl SeededSaltSource {
    /// Create a source from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl SaltSource for SeededSaltSource {
    fn generate(&self) -> Result<Salt, CryptoError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| CryptoError::EntropyUnavailable("seeded salt source lock poisoned".into()))?;
        let mut bytes = [0u8; SALT_LEN];
        rng.fill_bytes(&mut bytes);
        Ok(Salt(bytes))
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl std::fmt::Debug for SeededSaltSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SeededSaltSource(<seeded>)")
    }
}
