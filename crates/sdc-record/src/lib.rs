//! # sdc-record — Selective-Disclosure Personal-Data Records
//!
//! A data owner commits to a structured record with one root digest, then
//! discloses any subset of its top-level fields. The verifier receives a
//! [`DisclosureBundle`], rebuilds a [`PersonalData`] from it, and recomputes
//! the same root digest without ever seeing the hidden fields.
//!
//! ## Flow
//!
//! ```text
//! owner:    PersonalData::new ─▶ set(..) ─▶ root_digest()  ──────────────┐
//!                                   │                                     │ publish
//!                                   └─▶ narrow(S) ─▶ disclosure_bundle()  │
//!                                                          │              │
//! verifier:             PersonalData::from_bundle ◀────────┘              │
//!                                   └─▶ root_digest() ══ compare ═════════┘
//! ```
//!
//! ## Field State
//!
//! Every field of the fixed [`FieldUniverse`] is in exactly one
//! [`FieldState`]: `Disclosed` (content and salt), `Hidden` (commitment
//! hash only), or `Unknown` (never carried by this instance). States live in
//! a fixed arena indexed by universe position.
//!
//! ## Concurrency
//!
//! A `PersonalData` is `Send + Sync` but is not internally synchronized;
//! every operation that may generate a salt takes `&mut self`, so shared
//! owners serialize access with their own lock.

pub mod bundle;
pub mod error;
pub mod record;
pub mod state;
pub mod universe;

pub use bundle::{DisclosedPart, DisclosureBundle, MissedPart};
pub use error::{BundleError, RecordError, UniverseError};
pub use record::{Origin, PersonalData};
pub use state::FieldState;
pub use universe::{FieldSpec, FieldUniverse, UniverseConfig};
