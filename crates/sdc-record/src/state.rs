//! # Per-Field Disclosure State
//!
//! ```text
//!                 narrow (field not selected)
//!   Disclosed ───────────────────────────────▶ Hidden
//!       ▲                                        ▲
//!       │ bundle.parts          bundle.missed_parts
//!       └────────── from_bundle ─────────────────┘
//!
//!   Unknown: field absent from both lists of the bundle it came from.
//! ```
//!
//! There is no transition out of `Hidden`: once a field's content has been
//! replaced by its commitment, no operation can bring the content back.

use sdc_core::ContentDigest;
use sdc_crypto::Salt;

/// What an instance knows about one field of the universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    /// Not carried by this instance. Contributes nothing to the root digest.
    Unknown,
    /// Content present. The salt is generated on first use when `None`.
    Disclosed {
        /// The field's salt, once generated or received.
        salt: Option<Salt>,
    },
    /// Content absent; only its commitment hash is known.
    Hidden {
        /// The field's commitment hash.
        commitment: ContentDigest,
    },
}

impl FieldState {
    /// Whether the instance carries disclosed content or a commitment.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Whether content and salt are available.
    pub fn is_disclosed(&self) -> bool {
        matches!(self, Self::Disclosed { .. })
    }

    /// Whether only a commitment hash is available.
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden { .. })
    }

    /// The salt, if disclosed and already generated.
    pub fn salt(&self) -> Option<&Salt> {
        match self {
            Self::Disclosed { salt } => salt.as_ref(),
            _ => None,
        }
    }

    /// Stable lowercase state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Disclosed { .. } => "disclosed",
            Self::Hidden { .. } => "hidden",
        }
    }
}

impl std::fmt::Display for FieldState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
