//! # Owner ↔ Verifier Disclosure Flow
//!
//! End-to-end checks of the commitment scheme: an owner builds a record and
//! publishes its root digest, narrows it to a subset of fields, ships the
//! bundle as JSON, and a verifier reconstructs it and recomputes the same
//! digest without learning the hidden fields.

use std::sync::Arc;

use proptest::prelude::*;
use sdc_core::CanonicalBytes;
use sdc_crypto::SeededSaltSource;
use sdc_record::{
    BundleError, DisclosureBundle, FieldState, FieldUniverse, Origin, PersonalData, RecordError,
};
use serde_json::{json, Value};

fn universe() -> Arc<FieldUniverse> {
    Arc::new(FieldUniverse::personal_data())
}

fn owner(seed: u64, first: &str) -> PersonalData {
    let mut record =
        PersonalData::with_salt_source(universe(), Arc::new(SeededSaltSource::new(seed)));
    record
        .set("name", json!({"first": first, "last": "Lee"}))
        .unwrap();
    record.set("email", json!("a@x.com")).unwrap();
    record.set("phone", json!("")).unwrap();
    record.set("photo", Value::Null).unwrap();
    record
}

/// Ship a bundle through its JSON wire form, as a counterparty would see it.
fn over_the_wire(bundle: &DisclosureBundle) -> DisclosureBundle {
    DisclosureBundle::from_json(&bundle.to_json().unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Reference scenario
// ---------------------------------------------------------------------------

#[test]
fn test_disclose_email_only() {
    let mut record = PersonalData::new(universe());
    record
        .set("name", json!({"first": "Ann", "last": "Lee"}))
        .unwrap();
    record.set("email", json!("a@x.com")).unwrap();
    record.set("phone", json!("")).unwrap();
    record.set("photo", Value::Null).unwrap();

    let published = record.root_digest_hex().unwrap();
    assert_eq!(published.len(), 64);

    let bundle = record.narrow(["email"]).unwrap().disclosure_bundle().unwrap();
    let mut verifier = PersonalData::from_bundle(universe(), &over_the_wire(&bundle)).unwrap();

    assert_eq!(verifier.root_digest_hex().unwrap(), published);
    assert!(!verifier.is_available("name"));
    assert!(verifier.is_available("email"));
    assert_eq!(verifier.get("name").unwrap(), None);
    assert_eq!(verifier.get("email").unwrap(), Some(&json!("a@x.com")));
    assert!(matches!(verifier.state("name"), Some(FieldState::Hidden { .. })));
}

#[test]
fn test_verify_bundle_against_published_digest() {
    let mut record = owner(1, "Ann");
    let published = record.root_digest().unwrap();
    let bundle = record.narrow(["email", "phone"]).unwrap().disclosure_bundle().unwrap();

    let verified = PersonalData::verify_bundle(universe(), &bundle, &published).unwrap();
    assert_eq!(verified.known_fields().count(), 4);
}

#[test]
fn test_tampered_content_fails_verification() {
    let mut record = owner(2, "Ann");
    let published = record.root_digest().unwrap();
    let mut bundle = record.narrow(["email"]).unwrap().disclosure_bundle().unwrap();
    bundle.content["email"] = json!("eve@x.com");

    assert!(matches!(
        PersonalData::verify_bundle(universe(), &bundle, &published),
        Err(RecordError::DigestMismatch { expected, .. }) if expected == published
    ));
}

#[test]
fn test_tampered_commitment_fails_verification() {
    let mut record = owner(3, "Ann");
    let published = record.root_digest().unwrap();
    let mut bundle = record.narrow(["email"]).unwrap().disclosure_bundle().unwrap();
    let (a, b) = (bundle.missed_parts[0].hash, bundle.missed_parts[1].hash);
    bundle.missed_parts[0].hash = b;
    bundle.missed_parts[1].hash = a;

    assert!(matches!(
        PersonalData::verify_bundle(universe(), &bundle, &published),
        Err(RecordError::DigestMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Full and empty disclosure
// ---------------------------------------------------------------------------

#[test]
fn test_full_disclosure_round_trip() {
    let mut record = owner(4, "Ann");
    let digest = record.root_digest().unwrap();
    let all: Vec<String> = universe().names().map(str::to_owned).collect();

    let bundle = record.narrow(&all).unwrap().disclosure_bundle().unwrap();
    assert!(bundle.missed_parts.is_empty());

    let mut verifier = PersonalData::from_bundle(universe(), &over_the_wire(&bundle)).unwrap();
    let expected = CanonicalBytes::new(record.content()).unwrap();
    assert_eq!(
        serde_json::to_vec(verifier.content()).unwrap(),
        expected.as_bytes()
    );
    assert_eq!(verifier.root_digest().unwrap(), digest);
}

#[test]
fn test_empty_disclosure_keeps_digest() {
    let mut record = owner(5, "Ann");
    let digest = record.root_digest().unwrap();

    let bundle = record
        .narrow(std::iter::empty::<&str>())
        .unwrap()
        .disclosure_bundle()
        .unwrap();
    assert_eq!(bundle.content, json!({}));
    assert!(bundle.parts.is_empty());
    let hidden: Vec<&str> = bundle.hidden_fields().collect();
    assert_eq!(hidden, ["email", "name", "phone", "photo"]);

    let mut verifier = PersonalData::from_bundle(universe(), &bundle).unwrap();
    assert_eq!(verifier.root_digest().unwrap(), digest);
}

// ---------------------------------------------------------------------------
// Hiding
// ---------------------------------------------------------------------------

#[test]
fn test_hidden_field_does_not_leak() {
    let mut ann = owner(6, "Ann");
    let mut bob = owner(6, "Bob");

    let ann_bundle = ann.narrow(["email"]).unwrap().disclosure_bundle().unwrap();
    let bob_bundle = bob.narrow(["email"]).unwrap().disclosure_bundle().unwrap();

    assert_eq!(ann_bundle.content, bob_bundle.content);
    assert_eq!(ann_bundle.parts, bob_bundle.parts);
    assert_ne!(ann.root_digest().unwrap(), bob.root_digest().unwrap());

    let wire = ann_bundle.to_json().unwrap();
    assert!(!wire.contains("Ann"));
    assert!(!wire.contains("Lee"));
}

// ---------------------------------------------------------------------------
// Malformed bundles
// ---------------------------------------------------------------------------

#[test]
fn test_conflicting_bundle_rejected() {
    let mut record = owner(7, "Ann");
    let mut bundle = record.narrow(["email"]).unwrap().disclosure_bundle().unwrap();
    bundle.missed_parts[0].path = "email".into();

    assert!(matches!(
        PersonalData::from_bundle(universe(), &bundle),
        Err(RecordError::MalformedBundle(BundleError::ConflictingState(f))) if f == "email"
    ));
}

#[test]
fn test_unknown_field_bundle_rejected() {
    let raw = format!(
        r#"{{"content":{{}},"parts":[],"missed_parts":[{{"path":"ssn","hash":"{}"}}]}}"#,
        "00".repeat(32)
    );
    let bundle = DisclosureBundle::from_json(&raw).unwrap();
    assert!(matches!(
        PersonalData::from_bundle(universe(), &bundle),
        Err(RecordError::MalformedBundle(BundleError::UnknownField(_)))
    ));
}

#[test]
fn test_partial_bundle_leaves_fields_unknown() {
    let mut record = owner(8, "Ann");
    let published = record.root_digest().unwrap();
    let mut bundle = record.narrow(["email"]).unwrap().disclosure_bundle().unwrap();
    bundle.missed_parts.retain(|p| p.path != "photo");

    let mut verifier = PersonalData::from_bundle(universe(), &bundle).unwrap();
    let unknown: Vec<&str> = verifier.unknown_fields().collect();
    assert_eq!(unknown, ["photo"]);
    assert!(verifier.is_available("photo"));
    assert_eq!(verifier.state("photo"), Some(&FieldState::Unknown));

    // A digest over a strict subset of fields must never match the published one.
    assert_ne!(verifier.root_digest().unwrap(), published);
    assert!(matches!(
        PersonalData::verify_bundle(universe(), &bundle, &published),
        Err(RecordError::DigestMismatch { expected, .. }) if expected == published
    ));
}

// ---------------------------------------------------------------------------
// Write access
// ---------------------------------------------------------------------------

#[test]
fn test_only_owner_can_write() {
    let mut record = owner(10, "Ann");
    let published = record.root_digest().unwrap();

    let mut narrowed = record.narrow(["email"]).unwrap();
    assert_eq!(narrowed.origin(), Origin::Narrowed);
    assert!(matches!(
        narrowed.set("email", json!("eve@x.com")),
        Err(RecordError::ReadOnly { .. })
    ));

    let bundle = over_the_wire(&narrowed.disclosure_bundle().unwrap());
    let mut verifier = PersonalData::verify_bundle(universe(), &bundle, &published).unwrap();
    assert_eq!(verifier.origin(), Origin::Reconstructed);
    assert!(matches!(
        verifier.set("email", json!("eve@x.com")),
        Err(RecordError::ReadOnly { .. })
    ));
    assert_eq!(verifier.root_digest().unwrap(), published);

    record.set("email", json!("b@x.com")).unwrap();
    assert_ne!(record.root_digest().unwrap(), published);
}

// ---------------------------------------------------------------------------
// Concurrency contract
// ---------------------------------------------------------------------------

#[test]
fn test_record_can_move_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PersonalData>();

    let mut record = owner(9, "Ann");
    let digest = record.root_digest().unwrap();
    let handle = std::thread::spawn(move || record.root_digest().unwrap());
    assert_eq!(handle.join().unwrap(), digest);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn narrow_then_reconstruct_preserves_digest(
        email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
        first in "[A-Za-z]{0,12}",
        last in "[A-Za-z]{0,12}",
        phone in "[0-9]{0,10}",
        mask in prop::collection::vec(any::<bool>(), 4),
    ) {
        let mut record = PersonalData::new(universe());
        record.set("email", json!(email)).unwrap();
        record.set("name.last", json!(last)).unwrap();
        record.set("name.first", json!(first)).unwrap();
        record.set("phone", json!(phone)).unwrap();

        let digest = record.root_digest().unwrap();
        let selected: Vec<String> = universe()
            .names()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|(name, _)| name.to_owned())
            .collect();

        let bundle = record.narrow(&selected).unwrap().disclosure_bundle().unwrap();
        let mut verifier = PersonalData::from_bundle(universe(), &over_the_wire(&bundle)).unwrap();

        prop_assert_eq!(verifier.root_digest().unwrap(), digest);
        prop_assert_eq!(record.root_digest().unwrap(), digest);
        for (name, keep) in universe().names().zip(&mask) {
            prop_assert_eq!(verifier.is_available(name), *keep);
        }
    }
}
