use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::CoreError;

/// `type` marker of an Open Badges 2.0 assertion.
pub const ASSERTION_TYPE: &str = "Assertion";
/// `type` marker of an Open Badges 2.0 badge class.
pub const BADGE_CLASS_TYPE: &str = "BadgeClass";
/// `type` list entry every verifiable credential carries.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";
/// JSON-LD context of Open Badges 2.0 records.
pub const OPEN_BADGES_V2_CONTEXT: &str = "https://w3id.org/openbadges/v2";

/// The four badge shapes Badgekit understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialKind {
    /// Open Badges 2.0 assertion (an awarded badge).
    LegacyAssertion,
    /// Open Badges 2.0 badge class (a badge definition).
    LegacyBadgeClass,
    /// Verifiable credential wrapping an achievement.
    VerifiableCredential,
    /// Display-only preview data.
    FlexibleDisplay,
}

impl CredentialKind {
    /// Whether this kind carries trust information (everything but display data).
    pub fn is_credential(&self) -> bool {
        !matches!(self, Self::FlexibleDisplay)
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyAssertion => write!(f, "legacy-assertion"),
            Self::LegacyBadgeClass => write!(f, "legacy-badge-class"),
            Self::VerifiableCredential => write!(f, "verifiable-credential"),
            Self::FlexibleDisplay => write!(f, "flexible-display"),
        }
    }
}

/// A JSON value that may be given once or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// View the value(s) as a slice.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    /// The first value, if any.
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }
}

/// A date as found in badge records.
///
/// Open Badges 2.0 allows unix timestamps (seconds) as well as ISO 8601
/// strings; verifiable credentials always use strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Timestamp(i64),
    Text(String),
}

impl DateValue {
    /// Parse into a UTC instant. Accepts RFC 3339 and bare `YYYY-MM-DD` dates.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(secs) => DateTime::from_timestamp(*secs, 0),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                        .map(|naive| naive.and_utc())
                }),
        }
    }

    /// Display form: strings verbatim, timestamps as RFC 3339.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Timestamp(secs) => DateTime::from_timestamp(*secs, 0)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| secs.to_string()),
        }
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Text(dt.to_rfc3339())
    }
}

/// An image given as an IRI or as an image object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Iri(String),
    Object(ImageObject),
}

impl ImageRef {
    /// The image location (the IRI itself, or the object's `id`).
    pub fn uri(&self) -> &str {
        match self {
            Self::Iri(iri) => iri,
            Self::Object(obj) => &obj.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    /// Empty when the object only carries a caption or type.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Issuer profile, as embedded in badge classes and credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An issuer given by IRI or as an embedded profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssuerRef {
    Iri(String),
    Profile(IssuerProfile),
}

impl IssuerRef {
    /// The embedded profile, if the issuer is not a bare IRI.
    pub fn profile(&self) -> Option<&IssuerProfile> {
        match self {
            Self::Iri(_) => None,
            Self::Profile(profile) => Some(profile),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.profile().and_then(|p| p.name.as_deref())
    }

    pub fn url(&self) -> Option<&str> {
        self.profile().and_then(|p| p.url.as_deref())
    }

    pub fn image(&self) -> Option<&str> {
        self.profile()
            .and_then(|p| p.image.as_ref())
            .map(ImageRef::uri)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Award criteria given by IRI or as a criteria object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriteriaRef {
    Iri(String),
    Object(Criteria),
}

/// Open Badges 2.0 badge class.
///
/// Fields default when absent so that a partially embedded badge class
/// inside an assertion still parses; [`crate::detect::is_legacy_badge_class`]
/// enforces the required fields on standalone records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBadgeClass {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default = "badge_class_type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<CriteriaRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<IssuerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn badge_class_type() -> String {
    BADGE_CLASS_TYPE.to_string()
}

/// The badge an assertion awards: embedded, or referenced by IRI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BadgeRef {
    Iri(String),
    Embedded(Box<LegacyBadgeClass>),
}

impl BadgeRef {
    pub fn embedded(&self) -> Option<&LegacyBadgeClass> {
        match self {
            Self::Iri(_) => None,
            Self::Embedded(class) => Some(class),
        }
    }
}

/// Recipient of an Open Badges 2.0 assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(rename = "type", default = "email_identity_type")]
    pub kind: String,
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub hashed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

fn email_identity_type() -> String {
    "email".to_string()
}

/// Declared verification mechanism of an assertion (`hosted` or `signed`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Open Badges 2.0 assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAssertion {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub recipient: Recipient,
    pub badge: BadgeRef,
    pub verification: Verification,
    pub issued_on: DateValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Achievement claimed by a verifiable credential's subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<CriteriaRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievement: Option<Achievement>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Embedded proof. Only the declared suite is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Verifiable credential carrying an achievement claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    #[serde(rename = "@context")]
    pub context: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub issuer: IssuerRef,
    pub issuance_date: DateValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateValue>,
    pub credential_subject: OneOrMany<CredentialSubject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<OneOrMany<Proof>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerifiableCredential {
    /// The subject the credential is about: the first one carrying an
    /// achievement, else the first one listed.
    pub fn primary_subject(&self) -> Option<&CredentialSubject> {
        let subjects = self.credential_subject.as_slice();
        subjects
            .iter()
            .find(|subject| subject.achievement.is_some())
            .or_else(|| subjects.first())
    }
}

/// Issuer block of display-only data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayIssuer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Permissive display-only badge data used for previews.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleDisplay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<DisplayIssuer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A badge record classified into exactly one of the known shapes.
///
/// Built once at the boundary by [`CredentialVariant::parse`]; everything
/// downstream matches on the variant instead of probing fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CredentialVariant {
    LegacyAssertion(LegacyAssertion),
    LegacyBadgeClass(LegacyBadgeClass),
    VerifiableCredential(VerifiableCredential),
    FlexibleDisplay(FlexibleDisplay),
}

impl CredentialVariant {
    pub fn kind(&self) -> CredentialKind {
        match self {
            Self::LegacyAssertion(_) => CredentialKind::LegacyAssertion,
            Self::LegacyBadgeClass(_) => CredentialKind::LegacyBadgeClass,
            Self::VerifiableCredential(_) => CredentialKind::VerifiableCredential,
            Self::FlexibleDisplay(_) => CredentialKind::FlexibleDisplay,
        }
    }

    /// Top-level `id` of the record, if it has one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::LegacyAssertion(a) => a.id.as_deref(),
            Self::LegacyBadgeClass(c) => c.id.as_deref(),
            Self::VerifiableCredential(vc) => vc.id.as_deref(),
            Self::FlexibleDisplay(d) => d.id.as_deref(),
        }
    }

    /// Serialize back to JSON, preserving unknown fields.
    pub fn to_value(&self) -> Result<Value, CoreError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<LegacyAssertion> for CredentialVariant {
    fn from(assertion: LegacyAssertion) -> Self {
        Self::LegacyAssertion(assertion)
    }
}

impl From<LegacyBadgeClass> for CredentialVariant {
    fn from(class: LegacyBadgeClass) -> Self {
        Self::LegacyBadgeClass(class)
    }
}
