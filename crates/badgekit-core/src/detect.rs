//! Format detection over untyped JSON.
//!
//! Each predicate checks the required fields of one format and then the
//! typed parse, so a predicate returning `true` means
//! [`CredentialVariant::parse`] yields that variant. Detectors are tried
//! credential-first so that a minimal credential is never mistaken for
//! display-only data.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::{
    CredentialKind, CredentialVariant, ASSERTION_TYPE, BADGE_CLASS_TYPE,
    VERIFIABLE_CREDENTIAL_TYPE,
};

const CREDENTIAL_MARKERS: [&str; 3] = [ASSERTION_TYPE, BADGE_CLASS_TYPE, VERIFIABLE_CREDENTIAL_TYPE];

/// Present and not `null`.
fn has(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(|v| !v.is_null())
}

/// Absent, `null`, or satisfying `check`.
fn optional(obj: &Map<String, Value>, key: &str, check: impl Fn(&Value) -> bool) -> bool {
    match obj.get(key) {
        None | Some(Value::Null) => true,
        Some(value) => check(value),
    }
}

fn type_is(obj: &Map<String, Value>, marker: &str) -> bool {
    obj.get("type").and_then(Value::as_str) == Some(marker)
}

fn type_list_contains(obj: &Map<String, Value>, marker: &str) -> bool {
    obj.get("type")
        .and_then(Value::as_array)
        .is_some_and(|types| types.iter().any(|t| t.as_str() == Some(marker)))
}

/// Whether `type` names any credential marker, as a string or inside a list.
fn carries_credential_marker(obj: &Map<String, Value>) -> bool {
    CREDENTIAL_MARKERS
        .iter()
        .any(|marker| type_is(obj, marker) || type_list_contains(obj, marker))
}

const DETECTION_ORDER: [CredentialKind; 4] = [
    CredentialKind::LegacyAssertion,
    CredentialKind::LegacyBadgeClass,
    CredentialKind::VerifiableCredential,
    CredentialKind::FlexibleDisplay,
];

fn assertion_shape(obj: &Map<String, Value>) -> bool {
    type_is(obj, ASSERTION_TYPE)
        && ["recipient", "badge", "verification", "issuedOn"]
            .iter()
            .all(|key| has(obj, key))
}

fn badge_class_shape(obj: &Map<String, Value>) -> bool {
    type_is(obj, BADGE_CLASS_TYPE)
        && ["name", "description", "image", "issuer"]
            .iter()
            .all(|key| has(obj, key))
}

fn credential_shape(obj: &Map<String, Value>) -> bool {
    has(obj, "@context")
        && type_list_contains(obj, VERIFIABLE_CREDENTIAL_TYPE)
        && ["issuer", "issuanceDate", "credentialSubject"]
            .iter()
            .all(|key| has(obj, key))
}

fn display_shape(obj: &Map<String, Value>) -> bool {
    if carries_credential_marker(obj) {
        return false;
    }

    let name_ok = obj
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty());
    if !name_ok {
        return false;
    }

    let strings_ok = ["id", "description", "image", "issuedDate", "expiryDate"]
        .iter()
        .all(|key| optional(obj, key, Value::is_string));
    let tags_ok = optional(obj, "tags", |tags| {
        tags.as_array()
            .is_some_and(|items| items.iter().all(Value::is_string))
    });
    let issuer_ok = optional(obj, "issuer", |issuer| {
        issuer.as_object().is_some_and(|issuer| {
            ["name", "url", "image"]
                .iter()
                .all(|key| optional(issuer, key, Value::is_string))
        })
    });

    strings_ok && tags_ok && issuer_ok
}

fn has_shape(kind: CredentialKind, value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    match kind {
        CredentialKind::LegacyAssertion => assertion_shape(obj),
        CredentialKind::LegacyBadgeClass => badge_class_shape(obj),
        CredentialKind::VerifiableCredential => credential_shape(obj),
        CredentialKind::FlexibleDisplay => display_shape(obj),
    }
}

fn parse_as(kind: CredentialKind, value: &Value) -> Result<CredentialVariant, serde_json::Error> {
    let value = value.clone();
    match kind {
        CredentialKind::LegacyAssertion => {
            serde_json::from_value(value).map(CredentialVariant::LegacyAssertion)
        }
        CredentialKind::LegacyBadgeClass => {
            serde_json::from_value(value).map(CredentialVariant::LegacyBadgeClass)
        }
        CredentialKind::VerifiableCredential => {
            serde_json::from_value(value).map(CredentialVariant::VerifiableCredential)
        }
        CredentialKind::FlexibleDisplay => {
            serde_json::from_value(value).map(CredentialVariant::FlexibleDisplay)
        }
    }
}

/// Shape check plus typed parse: `true` only when `value` will parse as `kind`.
fn is_kind(kind: CredentialKind, value: &Value) -> bool {
    has_shape(kind, value) && parse_as(kind, value).is_ok()
}

/// Open Badges 2.0 assertion: `type == "Assertion"` with `recipient`,
/// `badge`, `verification` and `issuedOn`, each of the expected type.
pub fn is_legacy_assertion(value: &Value) -> bool {
    is_kind(CredentialKind::LegacyAssertion, value)
}

/// Open Badges 2.0 badge class: `type == "BadgeClass"` with `name`,
/// `description`, `image` and `issuer`, each of the expected type.
pub fn is_legacy_badge_class(value: &Value) -> bool {
    is_kind(CredentialKind::LegacyBadgeClass, value)
}

/// Verifiable credential: `@context`, a `type` list containing
/// `"VerifiableCredential"`, and `issuer`, `issuanceDate`, `credentialSubject`
/// (one subject or a list).
pub fn is_verifiable_credential(value: &Value) -> bool {
    is_kind(CredentialKind::VerifiableCredential, value)
}

/// Display-only data: a non-empty `name`, no credential marker, and every
/// optional field of the right primitive type when present.
pub fn is_flexible_display(value: &Value) -> bool {
    is_kind(CredentialKind::FlexibleDisplay, value)
}

/// Classify `value`, trying credential shapes before display data.
pub fn detect(value: &Value) -> Option<CredentialKind> {
    DETECTION_ORDER
        .into_iter()
        .find(|kind| is_kind(*kind, value))
}

fn describe_unrecognized(value: &Value) -> String {
    match value {
        Value::Null => "expected a JSON object, got null".into(),
        Value::Bool(_) => "expected a JSON object, got a boolean".into(),
        Value::Number(_) => "expected a JSON object, got a number".into(),
        Value::String(_) => "expected a JSON object, got a string".into(),
        Value::Array(_) => "expected a JSON object, got an array".into(),
        Value::Object(obj) if obj.is_empty() => "empty object".into(),
        Value::Object(obj) => match obj.get("type") {
            Some(Value::String(t)) => format!("type '{}' with missing required fields", t),
            Some(_) if carries_credential_marker(obj) => {
                "credential type with missing required fields".into()
            }
            _ => "object matches no known badge format".into(),
        },
    }
}

impl CredentialVariant {
    /// Classify and parse `value` into a typed variant.
    ///
    /// Succeeds exactly when [`detect`] returns a kind, and yields that kind.
    /// Fails with [`CoreError::Malformed`] when some format's required fields
    /// are present but one has the wrong type, and with
    /// [`CoreError::UnrecognizedFormat`] otherwise.
    pub fn parse(value: &Value) -> Result<Self, CoreError> {
        let mut malformed = None;

        for kind in DETECTION_ORDER {
            if !has_shape(kind, value) {
                continue;
            }
            match parse_as(kind, value) {
                Ok(variant) => return Ok(variant),
                Err(e) => {
                    tracing::debug!(
                        kind = %kind,
                        error = %e,
                        "required fields present but badge failed to parse"
                    );
                    if malformed.is_none() {
                        malformed = Some(CoreError::Malformed {
                            kind,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        Err(malformed
            .unwrap_or_else(|| CoreError::UnrecognizedFormat(describe_unrecognized(value))))
    }
}
