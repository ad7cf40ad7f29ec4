//! Badgekit Core — Badge schema records, format detection, and the
//! canonical display view shared by every Badgekit crate.
//!
//! Two schema generations are understood:
//! - Open Badges 2.0 `Assertion` / `BadgeClass` records
//! - Verifiable Credentials wrapping an `Achievement`
//!
//! plus a permissive display-only shape used for previews.

pub mod canonical;
pub mod config;
pub mod detect;
pub mod error;
pub mod types;

pub use canonical::{CanonicalBadge, CanonicalIssuer};
pub use config::VerificationPolicy;
pub use detect::{
    detect, is_flexible_display, is_legacy_assertion, is_legacy_badge_class,
    is_verifiable_credential,
};
pub use error::CoreError;
pub use types::{
    Achievement, BadgeRef, CredentialKind, CredentialSubject, CredentialVariant, Criteria,
    CriteriaRef, DateValue, DisplayIssuer, FlexibleDisplay, ImageObject, ImageRef, IssuerProfile,
    IssuerRef, LegacyAssertion, LegacyBadgeClass, OneOrMany, Proof, Recipient, Verification,
    VerifiableCredential,
};
