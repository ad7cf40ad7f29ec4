//! Badgekit Credentials — Normalizer, template factory, badge class
//! validator, verification pipeline, and revocation providers.

pub mod clock;
pub mod draft;
pub mod error;
pub mod normalize;
pub mod revocation;
pub mod template;
pub mod validator;
pub mod verifier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use draft::{EditDebouncer, IssuanceDraft};
pub use error::{CredentialError, RevocationError};
pub use normalize::{normalize, normalize_badge_class, normalize_value};
pub use revocation::{RevocationProvider, RevocationStatus, StaticRevocationList};
pub use template::{create_assertion_template, create_badge_class_template};
pub use validator::{is_valid_uri, validate, validate_value};
pub use verifier::{BadgeVerifier, ExpirationStatus, ValidationReport, VerificationResult};
