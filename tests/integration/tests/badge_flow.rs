//! Integration test: issuance and display across crates.
//!
//! Drives badgekit-core detection and badgekit-credentials templates,
//! validation, normalization and drafts together.

use badgekit_core::{detect, CredentialKind, CredentialVariant, IssuerRef};
use serde_json::Value;
use badgekit_credentials::{
    create_assertion_template, create_badge_class_template, normalize, normalize_value, validate,
    validate_value, IssuanceDraft,
};
use serde_json::json;

// =========================================================================
// Template → validate → assertion → detect / normalize
// =========================================================================

#[test]
fn test_template_to_assertion_flow() {
    let mut class = create_badge_class_template();
    class.name = "Rust Fundamentals".into();
    class.description = "Completed the ownership and borrowing track.".into();
    assert!(validate(&class).is_empty());

    let assertion = create_assertion_template(class.clone(), "learner@example.org");
    let json = serde_json::to_value(&assertion).expect("serialize assertion");

    assert_eq!(detect(&json), Some(CredentialKind::LegacyAssertion));

    let canonical = normalize_value(&json).expect("normalize assertion");
    assert_eq!(canonical.name, "Rust Fundamentals");
    assert_eq!(canonical.description, "Completed the ownership and borrowing track.");
    assert_eq!(canonical.issuer.name, "Issuer Name");
    assert_eq!(canonical.id, assertion.id.clone().unwrap_or_default());
    assert!(!canonical.issued_on.is_empty());
    assert!(canonical.expiry_date.is_empty());
    assert!(canonical.tags.is_empty());
}

#[test]
fn test_badge_class_template_survives_json() {
    let class = create_badge_class_template();
    let json = serde_json::to_value(&class).expect("serialize badge class");

    assert_eq!(detect(&json), Some(CredentialKind::LegacyBadgeClass));
    assert!(validate_value(&json).is_empty());

    let parsed = CredentialVariant::parse(&json).expect("parse badge class");
    assert_eq!(parsed.kind(), CredentialKind::LegacyBadgeClass);
    assert_eq!(parsed.to_value().unwrap(), json);
}

#[test]
fn test_unknown_fields_round_trip() {
    let raw = json!({
        "@context": "https://w3id.org/openbadges/v2",
        "type": "Assertion",
        "id": "https://badges.example/a/1",
        "recipient": {"type": "email", "identity": "x@y.org", "hashed": false},
        "badge": "https://badges.example/classes/1",
        "verification": {"type": "hosted"},
        "issuedOn": "2024-02-01T00:00:00Z",
        "x-issuer-note": {"cohort": 7}
    });

    let variant = CredentialVariant::parse(&raw).expect("parse assertion");
    assert_eq!(variant.to_value().unwrap()["x-issuer-note"], json!({"cohort": 7}));
}

// =========================================================================
// Normalization across formats
// =========================================================================

#[test]
fn test_normalize_each_format() {
    let display = json!({"name": "Quick Badge", "tags": ["a", "b"]});
    let credential = json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "type": ["VerifiableCredential", "OpenBadgeCredential"],
        "id": "urn:uuid:vc-1",
        "issuer": {"id": "did:example:issuer", "name": "Example University"},
        "issuanceDate": "2024-01-01T00:00:00Z",
        "credentialSubject": {
            "id": "did:example:learner",
            "achievement": {"name": "Data Science", "description": "Completed the program"}
        }
    });

    let display_badge = normalize_value(&display).expect("display");
    assert_eq!(display_badge.name, "Quick Badge");
    assert_eq!(display_badge.tags, vec!["a", "b"]);
    assert_eq!(display_badge.issuer.name, "");

    let vc_badge = normalize_value(&credential).expect("credential");
    assert_eq!(vc_badge.id, "urn:uuid:vc-1");
    assert_eq!(vc_badge.name, "Data Science");
    assert_eq!(vc_badge.issuer.name, "Example University");
    assert_eq!(vc_badge.issued_on, "2024-01-01T00:00:00Z");
}

/// Every canonical field is present and of its display type.
fn assert_fully_filled(canonical: &Value) {
    for key in ["id", "name", "description", "image", "issuedOn", "expiryDate"] {
        assert!(canonical[key].is_string(), "{} missing in {}", key, canonical);
    }
    for key in ["name", "url", "image"] {
        assert!(canonical["issuer"][key].is_string(), "issuer.{} missing", key);
    }
    assert!(canonical["tags"].is_array());
}

#[test]
fn test_every_detected_badge_normalizes() {
    let vc_context = json!(["https://www.w3.org/2018/credentials/v1"]);
    let inputs = vec![
        // Subject given as a list
        json!({
            "@context": vc_context,
            "type": ["VerifiableCredential"],
            "issuer": {"name": "Example University"},
            "issuanceDate": "2024-01-01T00:00:00Z",
            "credentialSubject": [{"id": "did:example:a", "achievement": {"name": "Listed"}}]
        }),
        // Issuer given as an IRI
        json!({
            "@context": vc_context,
            "type": ["VerifiableCredential"],
            "issuer": "did:example:issuer",
            "issuanceDate": "2024-01-01",
            "credentialSubject": {"id": "did:example:a"}
        }),
        // Image object without an id
        json!({
            "type": "Assertion",
            "recipient": {"identity": "x@y.org"},
            "badge": {
                "type": "BadgeClass",
                "name": "Captioned",
                "description": "d",
                "image": {"type": "Image", "caption": "logo"},
                "issuer": {"name": "Issuer"}
            },
            "verification": {"type": "hosted"},
            "issuedOn": "2024-01-01T00:00:00Z"
        }),
        // Numeric dates and a badge referenced by IRI
        json!({
            "type": "Assertion",
            "recipient": {"identity": "x@y.org"},
            "badge": "https://badges.example/classes/1",
            "verification": {"type": "signed"},
            "issuedOn": 1_700_000_000,
            "expires": 1_800_000_000
        }),
        json!({
            "type": "BadgeClass",
            "name": "Definition",
            "description": "d",
            "image": {"id": "https://badges.example/d.png"},
            "issuer": "https://badges.example/issuer"
        }),
        json!({"name": "Display", "issuer": {"name": "Someone"}}),
    ];

    for input in &inputs {
        let kind = detect(input).unwrap_or_else(|| panic!("not detected: {}", input));
        let canonical = normalize_value(input)
            .unwrap_or_else(|e| panic!("{} detected as {} failed to normalize: {}", input, kind, e));
        assert_fully_filled(&serde_json::to_value(&canonical).unwrap());
    }
}

#[test]
fn test_normalize_rejects_unrecognized() {
    assert!(normalize_value(&json!({"foo": "bar"})).is_err());
    assert!(normalize_value(&json!("just a string")).is_err());
}

#[test]
fn test_normalize_typed_matches_untyped() {
    let assertion = create_assertion_template(create_badge_class_template(), "a@b.com");
    let typed = normalize(&CredentialVariant::from(assertion.clone()));
    let untyped = normalize_value(&serde_json::to_value(&assertion).unwrap()).unwrap();
    assert_eq!(typed, untyped);
}

// =========================================================================
// Issuance drafts
// =========================================================================

#[test]
fn test_draft_edit_cycle_then_issue() {
    let mut draft = IssuanceDraft::new();
    assert!(draft.is_ready());

    draft.edit(|class| class.name.clear());
    assert!(!draft.is_ready());
    assert_eq!(draft.preview().name, "");

    draft.edit(|class| {
        class.name = "Community Mentor".into();
        class.issuer = Some(IssuerRef::Iri("https://issuer.example".into()));
    });
    assert_eq!(draft.errors(), ["Issuer name is required".to_string()]);
    assert_eq!(draft.preview().name, "Community Mentor");

    draft.edit(|class| class.issuer = create_badge_class_template().issuer);
    assert!(draft.is_ready());
    assert_eq!(draft.revision(), 3);

    let assertion = draft.into_assertion("mentor@example.org").expect("draft is ready");
    let json = serde_json::to_value(&assertion).unwrap();
    assert_eq!(detect(&json), Some(CredentialKind::LegacyAssertion));
    assert_eq!(normalize_value(&json).unwrap().name, "Community Mentor");
}
