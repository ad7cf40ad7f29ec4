use serde_json::Value;
use url::Url;

use badgekit_core::types::BADGE_CLASS_TYPE;
use badgekit_core::{ImageRef, IssuerRef, LegacyBadgeClass};

pub const NAME_REQUIRED: &str = "Badge name is required";
pub const DESCRIPTION_REQUIRED: &str = "Badge description is required";
pub const IMAGE_REQUIRED: &str = "Badge image is required";
pub const ISSUER_NAME_REQUIRED: &str = "Issuer name is required";

/// Check a badge class against the issuance rules.
///
/// Every rule runs; the returned messages are in rule order and an empty
/// list means the badge class is valid.
pub fn validate(badge_class: &LegacyBadgeClass) -> Vec<String> {
    let mut errors = Vec::new();

    if badge_class.name.trim().is_empty() {
        errors.push(NAME_REQUIRED.to_string());
    }

    if badge_class.description.trim().is_empty() {
        errors.push(DESCRIPTION_REQUIRED.to_string());
    }

    match badge_class.image.as_ref().map(ImageRef::uri) {
        None | Some("") => errors.push(IMAGE_REQUIRED.to_string()),
        Some(uri) if !is_valid_uri(uri) => {
            errors.push(format!("Badge image must be a valid URI, got '{}'", uri))
        }
        Some(_) => {}
    }

    let issuer_named = badge_class
        .issuer
        .as_ref()
        .and_then(IssuerRef::name)
        .is_some_and(|name| !name.trim().is_empty());
    if !issuer_named {
        errors.push(ISSUER_NAME_REQUIRED.to_string());
    }

    errors
}

/// Validate untyped JSON as a badge class. Never fails: anything that is not
/// a badge class comes back as a single explanatory message.
pub fn validate_value(value: &Value) -> Vec<String> {
    let Some(obj) = value.as_object() else {
        return vec!["Badge class must be a JSON object".to_string()];
    };

    match obj.get("type") {
        None => {}
        Some(Value::String(t)) if t == BADGE_CLASS_TYPE => {}
        Some(other) => return vec![format!("Expected type '{}', got {}", BADGE_CLASS_TYPE, other)],
    }

    match serde_json::from_value::<LegacyBadgeClass>(value.clone()) {
        Ok(class) => validate(&class),
        Err(e) => vec![format!("Malformed badge class: {}", e)],
    }
}

/// Whether `candidate` is a valid absolute URI.
///
/// The URL parser repairs some input (it percent-encodes spaces and strips
/// surrounding whitespace), so whitespace is rejected up front.
pub fn is_valid_uri(candidate: &str) -> bool {
    !candidate.chars().any(char::is_whitespace) && Url::parse(candidate).is_ok()
}
