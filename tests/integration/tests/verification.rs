//! Integration test: the trust pipeline over every badge format, with
//! revocation lists, fixed clocks and verification policies.

use std::sync::Arc;

use badgekit_core::VerificationPolicy;
use badgekit_credentials::{
    create_assertion_template, create_badge_class_template, BadgeVerifier, ExpirationStatus,
    FixedClock, RevocationStatus, StaticRevocationList,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

fn hosted_assertion(id: &str, expires: Option<&str>) -> Value {
    let mut assertion = json!({
        "@context": "https://w3id.org/openbadges/v2",
        "type": "Assertion",
        "id": id,
        "recipient": {"type": "email", "identity": "learner@example.org", "hashed": false},
        "badge": {
            "type": "BadgeClass",
            "name": "Rust Fundamentals",
            "description": "Completed the ownership track",
            "image": "https://badges.example/rust.png",
            "issuer": {"name": "Ferris Academy", "url": "https://ferris.example"}
        },
        "verification": {"type": "hosted"},
        "issuedOn": "2024-01-15T00:00:00Z"
    });
    if let Some(expires) = expires {
        assertion["expires"] = json!(expires);
    }
    assertion
}

fn signed_credential(id: &str) -> Value {
    json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "type": ["VerifiableCredential", "OpenBadgeCredential"],
        "id": id,
        "issuer": {"id": "did:example:issuer", "name": "Example University"},
        "issuanceDate": "2024-01-01T00:00:00Z",
        "credentialSubject": {
            "id": "did:example:learner",
            "achievement": {"name": "Data Science"}
        },
        "proof": {"type": "Ed25519Signature2020"}
    })
}

fn clock_at(year: i32) -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap()))
}

// =========================================================================
// Revocation list flow
// =========================================================================

#[tokio::test]
async fn test_revocation_list_drives_status() {
    let list = Arc::new(StaticRevocationList::authoritative());
    list.revoke("urn:uuid:revoked");

    let verifier = BadgeVerifier::new()
        .with_revocation_provider(list.clone())
        .with_clock(clock_at(2024));

    let good = verifier.verify(&hosted_assertion("urn:uuid:good", None)).await;
    assert!(good.is_valid);
    assert_eq!(good.revocation_status, Some(RevocationStatus::Valid));
    assert_eq!(good.verification_method.as_deref(), Some("hosted"));
    assert_eq!(good.expiration_status, Some(ExpirationStatus::NoExpiry));

    let revoked = verifier.verify(&hosted_assertion("urn:uuid:revoked", None)).await;
    assert_eq!(revoked.revocation_status, Some(RevocationStatus::Revoked));
    // Lenient policy: revocation is reported but does not invalidate.
    assert!(revoked.is_valid);
    assert!(revoked.warnings.iter().any(|w| w.contains("revoked")));

    // Un-revoking is picked up by the next verification.
    list.mark_valid("urn:uuid:revoked");
    let restored = verifier.verify(&hosted_assertion("urn:uuid:revoked", None)).await;
    assert_eq!(restored.revocation_status, Some(RevocationStatus::Valid));
}

#[tokio::test]
async fn test_strict_policy_rejects_revoked_and_expired() {
    let list = Arc::new(StaticRevocationList::from_revoked(["urn:uuid:vc-revoked"], true));
    let verifier = BadgeVerifier::new()
        .with_revocation_provider(list)
        .with_clock(clock_at(2026))
        .with_policy(VerificationPolicy::strict());

    let revoked = verifier.verify(&signed_credential("urn:uuid:vc-revoked")).await;
    assert!(!revoked.is_valid);
    assert!(revoked.errors.iter().any(|e| e == "credential has been revoked"));

    let expired = verifier
        .verify(&hosted_assertion("urn:uuid:old", Some("2025-01-01T00:00:00Z")))
        .await;
    assert!(!expired.is_valid);
    assert_eq!(expired.expiration_status, Some(ExpirationStatus::Expired));
    assert!(expired.errors.iter().any(|e| e == "credential has expired"));

    let fine = verifier.verify(&signed_credential("urn:uuid:vc-ok")).await;
    assert!(fine.is_valid, "errors: {:?}", fine.errors);
    assert_eq!(fine.verification_method.as_deref(), Some("Ed25519Signature2020"));
}

// =========================================================================
// Issued templates and non-credential input
// =========================================================================

#[tokio::test]
async fn test_issued_template_verifies() {
    let assertion = create_assertion_template(create_badge_class_template(), "a@b.com");
    let json = serde_json::to_value(&assertion).unwrap();

    let result = BadgeVerifier::new().verify(&json).await;
    assert!(result.is_valid, "errors: {:?}", result.errors);
    assert!(result.structure_validation.is_valid);
    assert!(result.content_validation.is_valid);
    assert_eq!(result.revocation_status, Some(RevocationStatus::Unknown));
}

#[tokio::test]
async fn test_display_only_and_garbage_fail_structure() {
    let verifier = BadgeVerifier::new();

    for input in [json!({"name": "Quick Achievement"}), json!({"foo": 1}), json!(null)] {
        let result = verifier.verify(&input).await;
        assert!(!result.is_valid);
        assert!(!result.structure_validation.is_valid);
        assert!(!result.content_validation.is_valid);
        assert!(result.verification_method.is_none());
        assert!(result.expiration_status.is_none());
        assert!(result.revocation_status.is_none());
        assert!(!result.errors.is_empty());
    }
}

#[tokio::test]
async fn test_result_json_shape() {
    let result = BadgeVerifier::new()
        .with_clock(clock_at(2024))
        .verify(&hosted_assertion("urn:uuid:shape", None))
        .await;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["isValid"], true);
    assert_eq!(json["verificationMethod"], "hosted");
    assert_eq!(json["expirationStatus"], "none");
    assert_eq!(json["revocationStatus"], "unknown");
    assert_eq!(json["structureValidation"]["isValid"], true);
    assert_eq!(json["contentValidation"]["isValid"], true);
}

// =========================================================================
// Batch verification
// =========================================================================

#[tokio::test]
async fn test_verify_many_keeps_order() {
    let list = Arc::new(StaticRevocationList::from_revoked(["urn:uuid:2"], true));
    let verifier = BadgeVerifier::new()
        .with_revocation_provider(list)
        .with_policy(VerificationPolicy::strict())
        .with_clock(clock_at(2024));

    let badges = vec![
        hosted_assertion("urn:uuid:1", None),
        hosted_assertion("urn:uuid:2", None),
        json!({"name": "display only"}),
        signed_credential("urn:uuid:3"),
    ];
    let results = verifier.verify_many(&badges).await;

    let validity: Vec<bool> = results.iter().map(|r| r.is_valid).collect();
    assert_eq!(validity, vec![true, false, false, true]);
    assert_eq!(results[1].revocation_status, Some(RevocationStatus::Revoked));
}
