use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use badgekit_core::types::{ASSERTION_TYPE, BADGE_CLASS_TYPE, OPEN_BADGES_V2_CONTEXT};
use badgekit_core::{
    BadgeRef, Criteria, CriteriaRef, DateValue, ImageRef, IssuerProfile, IssuerRef,
    LegacyAssertion, LegacyBadgeClass, OneOrMany, Recipient, Verification,
};

/// Placeholder image for new badge classes.
pub const PLACEHOLDER_IMAGE: &str = "https://example.org/badges/placeholder.png";
/// Placeholder issuer homepage for new badge classes.
pub const PLACEHOLDER_ISSUER_URL: &str = "https://example.org";

fn fresh_id() -> String {
    format!("urn:uuid:{}", Uuid::now_v7())
}

/// A new badge class pre-filled with placeholder values.
///
/// The template passes [`crate::validate`] as-is, so an issuance form can
/// start from it without tripping validation.
pub fn create_badge_class_template() -> LegacyBadgeClass {
    LegacyBadgeClass {
        context: Some(Value::String(OPEN_BADGES_V2_CONTEXT.into())),
        id: Some(fresh_id()),
        kind: BADGE_CLASS_TYPE.into(),
        name: "New Badge".into(),
        description: "Describe the achievement this badge recognizes.".into(),
        image: Some(ImageRef::Iri(PLACEHOLDER_IMAGE.into())),
        criteria: Some(CriteriaRef::Object(Criteria {
            id: None,
            narrative: Some("Describe what a recipient must do to earn this badge.".into()),
            extra: Map::new(),
        })),
        issuer: Some(IssuerRef::Profile(IssuerProfile {
            kind: Some(OneOrMany::One("Profile".into())),
            name: Some("Issuer Name".into()),
            url: Some(PLACEHOLDER_ISSUER_URL.into()),
            ..Default::default()
        })),
        tags: None,
        extra: Map::new(),
    }
}

/// A hosted assertion awarding `badge_class` to `recipient_email`, issued now.
pub fn create_assertion_template(
    badge_class: LegacyBadgeClass,
    recipient_email: &str,
) -> LegacyAssertion {
    let assertion = LegacyAssertion {
        context: Some(Value::String(OPEN_BADGES_V2_CONTEXT.into())),
        id: Some(fresh_id()),
        kind: ASSERTION_TYPE.into(),
        recipient: Recipient {
            kind: "email".into(),
            identity: recipient_email.to_string(),
            hashed: false,
            salt: None,
        },
        badge: BadgeRef::Embedded(Box::new(badge_class)),
        verification: Verification {
            kind: "hosted".into(),
            creator: None,
            extra: Map::new(),
        },
        issued_on: DateValue::from(Utc::now()),
        expires: None,
        image: None,
        evidence: None,
        narrative: None,
        revoked: None,
        revocation_reason: None,
        extra: Map::new(),
    };

    tracing::debug!(
        assertion_id = assertion.id.as_deref().unwrap_or_default(),
        "assertion template created"
    );

    assertion
}
