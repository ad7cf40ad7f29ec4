//! Projection of every badge shape into the [`CanonicalBadge`] display view.
//!
//! Every canonical field is always filled: a source field that is missing,
//! or that lives behind an IRI reference, maps to its empty default.

use serde_json::Value;

use badgekit_core::{
    CanonicalBadge, CanonicalIssuer, CoreError, CredentialVariant, DateValue, FlexibleDisplay,
    ImageRef, IssuerRef, LegacyAssertion, LegacyBadgeClass, VerifiableCredential,
};

/// Project a classified badge into its canonical display form. Total.
pub fn normalize(variant: &CredentialVariant) -> CanonicalBadge {
    match variant {
        CredentialVariant::LegacyAssertion(assertion) => from_assertion(assertion),
        CredentialVariant::LegacyBadgeClass(class) => normalize_badge_class(class),
        CredentialVariant::VerifiableCredential(vc) => from_credential(vc),
        CredentialVariant::FlexibleDisplay(display) => from_display(display),
    }
}

/// Classify `value` and normalize it.
///
/// Unrecognized or malformed input is rejected with the classification
/// error rather than producing an empty badge.
pub fn normalize_value(value: &Value) -> Result<CanonicalBadge, CoreError> {
    let variant = CredentialVariant::parse(value)?;
    Ok(normalize(&variant))
}

/// Normalize a badge class used as a preview (no assertion wrapper).
pub fn normalize_badge_class(class: &LegacyBadgeClass) -> CanonicalBadge {
    CanonicalBadge {
        id: text(class.id.as_deref()),
        name: class.name.clone(),
        description: class.description.clone(),
        image: image(class.image.as_ref()),
        issuer: issuer(class.issuer.as_ref()),
        issued_on: String::new(),
        expiry_date: String::new(),
        tags: Vec::new(),
    }
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn image(value: Option<&ImageRef>) -> String {
    text(value.map(ImageRef::uri))
}

fn date(value: Option<&DateValue>) -> String {
    value.map(DateValue::to_display_string).unwrap_or_default()
}

fn issuer(value: Option<&IssuerRef>) -> CanonicalIssuer {
    match value {
        Some(issuer) => CanonicalIssuer {
            name: text(issuer.name()),
            url: text(issuer.url()),
            image: text(issuer.image()),
        },
        None => CanonicalIssuer::default(),
    }
}

fn from_assertion(assertion: &LegacyAssertion) -> CanonicalBadge {
    let class = assertion.badge.embedded();
    // The baked assertion image stands in when the badge class has none.
    let badge_image = class
        .and_then(|c| c.image.as_ref())
        .filter(|img| !img.uri().is_empty())
        .or(assertion.image.as_ref());

    CanonicalBadge {
        id: text(assertion.id.as_deref()),
        name: class.map(|c| c.name.clone()).unwrap_or_default(),
        description: class.map(|c| c.description.clone()).unwrap_or_default(),
        image: image(badge_image),
        issuer: issuer(class.and_then(|c| c.issuer.as_ref())),
        issued_on: assertion.issued_on.to_display_string(),
        expiry_date: date(assertion.expires.as_ref()),
        tags: Vec::new(),
    }
}

fn from_credential(vc: &VerifiableCredential) -> CanonicalBadge {
    let achievement = vc
        .primary_subject()
        .and_then(|subject| subject.achievement.as_ref());

    CanonicalBadge {
        id: text(vc.id.as_deref()),
        name: text(achievement.and_then(|a| a.name.as_deref())),
        description: text(achievement.and_then(|a| a.description.as_deref())),
        image: image(achievement.and_then(|a| a.image.as_ref())),
        issuer: issuer(Some(&vc.issuer)),
        issued_on: vc.issuance_date.to_display_string(),
        expiry_date: date(vc.expiration_date.as_ref()),
        tags: Vec::new(),
    }
}

fn from_display(display: &FlexibleDisplay) -> CanonicalBadge {
    let display_issuer = display.issuer.as_ref();

    CanonicalBadge {
        id: text(display.id.as_deref()),
        name: display.name.clone(),
        description: text(display.description.as_deref()),
        image: text(display.image.as_deref()),
        issuer: CanonicalIssuer {
            name: text(display_issuer.and_then(|i| i.name.as_deref())),
            url: text(display_issuer.and_then(|i| i.url.as_deref())),
            image: text(display_issuer.and_then(|i| i.image.as_deref())),
        },
        issued_on: text(display.issued_date.as_deref()),
        expiry_date: text(display.expiry_date.as_deref()),
        tags: display.tags.clone().unwrap_or_default(),
    }
}
