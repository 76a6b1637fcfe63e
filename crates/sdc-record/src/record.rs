//! # Disclosure Controller
//!
//! `PersonalData` owns one record, its per-field state arena, and the salt
//! source it draws from. It computes root digests, narrows itself into a
//! partial disclosure, and is rebuilt from a received bundle.
//!
//! ## Invariants
//!
//! - `states.len() == universe.len()`; `states[i]` describes
//!   `universe.name(i)`.
//! - A salt, once generated for a field, is never replaced for the life of
//!   the instance. Narrowing generates any missing salts on the source too,
//!   so the source and the narrowed instance agree on every commitment.
//! - Content of a hidden field is never present in `content`.
//! - Only the owner-side instance accepts writes. Narrowed and reconstructed
//!   instances carry salts already committed to by the owner; editing them
//!   would commit new content under a used salt.
//! - The root digest depends only on the sorted field list and each field's
//!   commitment, never on key insertion order.

use std::sync::Arc;

use sdc_core::{
    assign, canonicalize, resolve, resolve_or_null, CanonicalBytes, ContentDigest, FieldPath,
    PathError,
};
use sdc_crypto::{field_commitment, root_commitment, OsSaltSource, Salt, SaltSource};
use serde_json::{Map, Value};

use crate::bundle::{DisclosedPart, DisclosureBundle, MissedPart};
use crate::error::RecordError;
use crate::state::FieldState;
use crate::universe::FieldUniverse;

/// How an instance came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Built by the data owner; the only writable kind.
    Owner,
    /// Produced by [`PersonalData::narrow`].
    Narrowed,
    /// Rebuilt from a received bundle by [`PersonalData::from_bundle`].
    Reconstructed,
}

impl Origin {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Narrowed => "narrowed",
            Self::Reconstructed => "reconstructed",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A personal-data record under a selective-disclosure commitment.
///
/// Not `Clone`: two copies of an owner record would share cached salts and
/// could commit different content under the same salt.
#[derive(Debug)]
pub struct PersonalData {
    universe: Arc<FieldUniverse>,
    content: Value,
    states: Vec<FieldState>,
    salts: Arc<dyn SaltSource>,
    origin: Origin,
}

impl PersonalData {
    /// A fresh owner-side record: every field disclosed, holding its default,
    /// salts drawn from the operating-system CSPRNG.
    pub fn new(universe: Arc<FieldUniverse>) -> Self {
        Self::with_salt_source(universe, Arc::new(OsSaltSource))
    }

    /// A fresh owner-side record drawing salts from `salts`.
    pub fn with_salt_source(universe: Arc<FieldUniverse>, salts: Arc<dyn SaltSource>) -> Self {
        let content = universe.default_content();
        let states = vec![FieldState::Disclosed { salt: None }; universe.len()];
        Self {
            universe,
            content,
            states,
            salts,
            origin: Origin::Owner,
        }
    }

    /// Rebuild an instance from a bundle produced by [`disclosure_bundle`].
    ///
    /// The bundle is validated first; any structural problem is rejected as
    /// `RecordError::MalformedBundle`. Fields in neither part list are
    /// `Unknown` in the result.
    ///
    /// [`disclosure_bundle`]: Self::disclosure_bundle
    pub fn from_bundle(
        universe: Arc<FieldUniverse>,
        bundle: &DisclosureBundle,
    ) -> Result<Self, RecordError> {
        if let Err(e) = bundle.validate(&universe) {
            tracing::warn!(error = %e, "rejected disclosure bundle");
            return Err(e.into());
        }

        let mut states = vec![FieldState::Unknown; universe.len()];
        for part in &bundle.parts {
            let idx = index_in(&universe, &part.path)?;
            states[idx] = FieldState::Disclosed {
                salt: Some(part.salt.clone()),
            };
        }
        for part in &bundle.missed_parts {
            let idx = index_in(&universe, &part.path)?;
            states[idx] = FieldState::Hidden {
                commitment: part.hash,
            };
        }

        tracing::debug!(
            disclosed = bundle.parts.len(),
            hidden = bundle.missed_parts.len(),
            "reconstructed record from disclosure bundle"
        );

        Ok(Self {
            universe,
            content: bundle.content.clone(),
            states,
            salts: Arc::new(OsSaltSource),
            origin: Origin::Reconstructed,
        })
    }

    /// Reconstruct `bundle` and check it against a published root digest.
    pub fn verify_bundle(
        universe: Arc<FieldUniverse>,
        bundle: &DisclosureBundle,
        expected: &ContentDigest,
    ) -> Result<Self, RecordError> {
        let mut record = Self::from_bundle(universe, bundle)?;
        let actual = record.root_digest()?;
        if actual != *expected {
            tracing::warn!(%expected, %actual, "disclosure bundle does not match root digest");
            return Err(RecordError::DigestMismatch {
                expected: *expected,
                actual,
            });
        }
        Ok(record)
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// The universe this record is defined over.
    pub fn universe(&self) -> &Arc<FieldUniverse> {
        &self.universe
    }

    /// How this instance was created.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The record content, in insertion order.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// State of `field`, or `None` outside the universe.
    pub fn state(&self, field: &str) -> Option<&FieldState> {
        self.universe.index_of(field).map(|idx| &self.states[idx])
    }

    /// True iff `field` is in the universe and not hidden.
    pub fn is_available(&self, field: &str) -> bool {
        self.state(field).is_some_and(|s| !s.is_hidden())
    }

    /// Fields this instance carries content or a commitment for, sorted.
    pub fn known_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields_where(FieldState::is_known)
    }

    /// Fields this instance knows nothing about, sorted.
    pub fn unknown_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields_where(|s| !s.is_known())
    }

    fn fields_where<'a>(
        &'a self,
        pred: impl Fn(&FieldState) -> bool + 'a,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.universe
            .names()
            .zip(&self.states)
            .filter(move |(_, state)| pred(*state))
            .map(|(name, _)| name)
    }

    // ── Content ─────────────────────────────────────────────────────

    /// Value at a dotted `path`; `Ok(None)` when it does not resolve.
    pub fn get(&self, path: &str) -> Result<Option<&Value>, RecordError> {
        let path = FieldPath::parse(path)?;
        Ok(resolve(&self.content, &path))
    }

    /// Assign `value` at a dotted `path`.
    ///
    /// Only owner-side instances are writable. The top-level field must be
    /// disclosed. The empty path replaces the whole content, which requires
    /// every field to be disclosed and every incoming key to belong to the
    /// universe.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), RecordError> {
        if self.origin != Origin::Owner {
            return Err(RecordError::ReadOnly {
                origin: self.origin.as_str(),
            });
        }
        let path = FieldPath::parse(path)?;
        match path.field() {
            Some(field) => {
                self.disclosed_index(field)?;
            }
            None => {
                let Value::Object(incoming) = &value else {
                    return Err(PathError::RootNotAMapping.into());
                };
                if let Some(key) = incoming.keys().find(|k| !self.universe.contains(k.as_str())) {
                    return Err(RecordError::UnknownField(key.clone()));
                }
                for name in self.universe.names() {
                    self.disclosed_index(name)?;
                }
            }
        }
        assign(&mut self.content, &path, value)?;
        Ok(())
    }

    // ── Commitments ─────────────────────────────────────────────────

    /// Commitment hash of one field.
    ///
    /// Disclosed fields are hashed from their salt and current canonical
    /// content (generating the salt if needed); hidden fields return their
    /// stored commitment.
    pub fn field_commitment(&mut self, field: &str) -> Result<ContentDigest, RecordError> {
        let idx = self.index_of(field)?;
        match self.states[idx] {
            FieldState::Unknown => Err(RecordError::FieldNotDisclosed {
                field: field.to_owned(),
                state: FieldState::Unknown.as_str(),
            }),
            FieldState::Hidden { commitment } => Ok(commitment),
            FieldState::Disclosed { .. } => {
                let canonical = canonicalize(&self.content);
                self.disclosed_commitment(idx, &canonical)
            }
        }
    }

    /// Build the bundle carrying every known field: disclosed content with
    /// its salts, and commitments for hidden fields.
    pub fn disclosure_bundle(&mut self) -> Result<DisclosureBundle, RecordError> {
        let canonical = canonicalize(&self.content);
        let mut content = Value::Object(Map::new());
        let mut parts = Vec::new();
        let mut missed_parts = Vec::new();

        for idx in 0..self.states.len() {
            match self.states[idx] {
                FieldState::Unknown => {}
                FieldState::Hidden { commitment } => missed_parts.push(MissedPart {
                    path: self.universe.name(idx).to_owned(),
                    hash: commitment,
                }),
                FieldState::Disclosed { .. } => {
                    let salt = self.ensure_salt(idx)?;
                    let path = self.field_path(idx)?;
                    assign(&mut content, &path, resolve_or_null(&canonical, &path))?;
                    parts.push(DisclosedPart {
                        path: path.as_str().to_owned(),
                        salt,
                    });
                }
            }
        }

        Ok(DisclosureBundle {
            content,
            parts,
            missed_parts,
        })
    }

    /// The root digest binding every known field.
    pub fn root_digest(&mut self) -> Result<ContentDigest, RecordError> {
        let bundle = self.disclosure_bundle()?;

        let mut entries: Vec<(&str, ContentDigest)> =
            Vec::with_capacity(bundle.parts.len() + bundle.missed_parts.len());
        for part in &bundle.parts {
            let path = FieldPath::parse(&part.path)?;
            let value = CanonicalBytes::new(&resolve_or_null(&bundle.content, &path))?;
            entries.push((part.path.as_str(), field_commitment(&part.salt, &value)));
        }
        for part in &bundle.missed_parts {
            entries.push((part.path.as_str(), part.hash));
        }
        entries.sort_by(|a, b| a.0.cmp(b.0));

        if self.states.iter().any(|s| !s.is_known()) {
            let unknown: Vec<&str> = self.unknown_fields().collect();
            tracing::warn!(?unknown, "root digest omits fields unknown to this record");
        }

        Ok(root_commitment(entries.iter().map(|(_, digest)| digest)))
    }

    /// [`root_digest`](Self::root_digest) as a lowercase hex string.
    pub fn root_digest_hex(&mut self) -> Result<String, RecordError> {
        Ok(self.root_digest()?.to_hex())
    }

    // ── Narrowing ───────────────────────────────────────────────────

    /// A new instance disclosing only `fields`.
    ///
    /// Selected disclosed fields keep their content and salt. Every other
    /// disclosed field is frozen into its commitment and its content dropped.
    /// Hidden and unknown fields stay as they are: narrowing never expands
    /// what an instance can disclose. Names outside the universe are ignored.
    ///
    /// The result has the same root digest as `self`.
    pub fn narrow<I, S>(&mut self, fields: I) -> Result<PersonalData, RecordError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = vec![false; self.universe.len()];
        for field in fields {
            let field = field.as_ref();
            match self.universe.index_of(field) {
                Some(idx) => selected[idx] = true,
                None => tracing::debug!(field, "ignoring field outside the universe"),
            }
        }

        let canonical = canonicalize(&self.content);
        let mut content = Value::Object(Map::new());
        let mut states = Vec::with_capacity(self.states.len());

        for (idx, &keep) in selected.iter().enumerate() {
            let state = match self.states[idx] {
                FieldState::Unknown => FieldState::Unknown,
                FieldState::Hidden { commitment } => FieldState::Hidden { commitment },
                FieldState::Disclosed { .. } if keep => {
                    let salt = self.ensure_salt(idx)?;
                    let path = self.field_path(idx)?;
                    if let Some(value) = resolve(&self.content, &path) {
                        assign(&mut content, &path, value.clone())?;
                    }
                    FieldState::Disclosed { salt: Some(salt) }
                }
                FieldState::Disclosed { .. } => FieldState::Hidden {
                    commitment: self.disclosed_commitment(idx, &canonical)?,
                },
            };
            states.push(state);
        }

        tracing::debug!(
            disclosed = states.iter().filter(|s| s.is_disclosed()).count(),
            hidden = states.iter().filter(|s| s.is_hidden()).count(),
            "narrowed record"
        );

        Ok(PersonalData {
            universe: Arc::clone(&self.universe),
            content,
            states,
            salts: Arc::clone(&self.salts),
            origin: Origin::Narrowed,
        })
    }

    // ── Internals ───────────────────────────────────────────────────

    fn index_of(&self, field: &str) -> Result<usize, RecordError> {
        index_in(&self.universe, field)
    }

    fn disclosed_index(&self, field: &str) -> Result<usize, RecordError> {
        let idx = self.index_of(field)?;
        match &self.states[idx] {
            FieldState::Disclosed { .. } => Ok(idx),
            other => Err(RecordError::FieldNotDisclosed {
                field: field.to_owned(),
                state: other.as_str(),
            }),
        }
    }

    fn field_path(&self, idx: usize) -> Result<FieldPath, RecordError> {
        Ok(FieldPath::parse(self.universe.name(idx))?)
    }

    /// The field's salt, generating and caching one on first use.
    fn ensure_salt(&mut self, idx: usize) -> Result<Salt, RecordError> {
        match &mut self.states[idx] {
            FieldState::Disclosed { salt } => {
                if let Some(existing) = salt {
                    return Ok(existing.clone());
                }
                let fresh = self.salts.generate()?;
                tracing::debug!(field = self.universe.name(idx), "generated field salt");
                *salt = Some(fresh.clone());
                Ok(fresh)
            }
            other => Err(RecordError::FieldNotDisclosed {
                field: self.universe.name(idx).to_owned(),
                state: other.as_str(),
            }),
        }
    }

    fn disclosed_commitment(
        &mut self,
        idx: usize,
        canonical: &Value,
    ) -> Result<ContentDigest, RecordError> {
        let salt = self.ensure_salt(idx)?;
        let path = self.field_path(idx)?;
        let value = CanonicalBytes::new(&resolve_or_null(canonical, &path))?;
        Ok(field_commitment(&salt, &value))
    }
}

fn index_in(universe: &FieldUniverse, field: &str) -> Result<usize, RecordError> {
    universe
        .index_of(field)
        .ok_or_else(|| RecordError::UnknownField(field.to_owned()))
}
