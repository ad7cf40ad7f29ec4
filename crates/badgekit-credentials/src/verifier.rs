//! Multi-stage badge trust pipeline.
//!
//! Stages run in order: structure, content, verification method,
//! expiration, revocation. [`BadgeVerifier::verify`] always produces a
//! [`VerificationResult`]; failures inside the pipeline are folded into the
//! fallback shape returned by [`VerificationResult::internal_failure`].

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use badgekit_core::{
    BadgeRef, CredentialVariant, LegacyAssertion, LegacyBadgeClass, VerifiableCredential,
    VerificationPolicy,
};

use crate::clock::{Clock, SystemClock};
use crate::error::CredentialError;
use crate::revocation::{RevocationProvider, RevocationStatus};
use crate::validator::{validate, ISSUER_NAME_REQUIRED};

const CONTENT_SKIPPED: &str = "content not checked: structure validation failed";

/// Outcome of one validation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// A passing report with no findings.
    pub fn passed() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// A failed report carrying a single error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            errors: vec![message.into()],
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Expiration of a credential relative to the verifier's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpirationStatus {
    Valid,
    Expired,
    /// The credential declares no (usable) expiration date.
    #[serde(rename = "none")]
    NoExpiry,
}

impl fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Expired => write!(f, "expired"),
            Self::NoExpiry => write!(f, "none"),
        }
    }
}

/// Composite verdict of the trust pipeline.
///
/// `structure_validation` and `content_validation` are always populated,
/// whichever stage the pipeline stopped at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_status: Option<ExpirationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_status: Option<RevocationStatus>,
    pub structure_validation: ValidationReport,
    pub content_validation: ValidationReport,
}

impl VerificationResult {
    /// The result reported when the pipeline itself fails: the message is
    /// the only error, and both stage reports carry it too.
    pub fn internal_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            is_valid: false,
            errors: vec![message.clone()],
            warnings: Vec::new(),
            verification_method: None,
            expiration_status: None,
            revocation_status: None,
            structure_validation: ValidationReport::failed(message.clone()),
            content_validation: ValidationReport::failed(message),
        }
    }

    fn structure_failure(structure: ValidationReport) -> Self {
        let content = ValidationReport::failed(CONTENT_SKIPPED);
        Self {
            is_valid: false,
            errors: structure.errors.clone(),
            warnings: structure.warnings.clone(),
            verification_method: None,
            expiration_status: None,
            revocation_status: None,
            structure_validation: structure,
            content_validation: content,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs the badge trust pipeline.
pub struct BadgeVerifier {
    revocation: Option<Arc<dyn RevocationProvider>>,
    clock: Arc<dyn Clock>,
    policy: VerificationPolicy,
}

impl BadgeVerifier {
    /// A verifier on the system clock with no revocation provider and the
    /// default (lenient) policy.
    pub fn new() -> Self {
        Self {
            revocation: None,
            clock: Arc::new(SystemClock),
            policy: VerificationPolicy::default(),
        }
    }

    pub fn with_revocation_provider(mut self, provider: Arc<dyn RevocationProvider>) -> Self {
        self.revocation = Some(provider);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: VerificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> VerificationPolicy {
        self.policy
    }

    /// Verify an untyped badge. Never fails.
    ///
    /// Panics raised inside the pipeline (including in a revocation
    /// provider) become the internal-failure result. The process panic hook
    /// still runs first, so the default hook prints the panic message to
    /// stderr; embedders that want it silenced install their own hook.
    pub async fn verify(&self, badge: &Value) -> VerificationResult {
        let outcome = AssertUnwindSafe(self.run_pipeline(badge))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "verification pipeline failed");
                VerificationResult::internal_failure(e.to_string())
            }
            Err(payload) => {
                let err = CredentialError::Internal(panic_message(payload.as_ref()));
                tracing::warn!(error = %err, "verification pipeline panicked");
                VerificationResult::internal_failure(err.to_string())
            }
        };

        tracing::info!(
            valid = result.is_valid,
            method = result.verification_method.as_deref().unwrap_or("none"),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "badge verified"
        );

        result
    }

    /// Verify several badges concurrently. Results keep the input order.
    pub async fn verify_many(&self, badges: &[Value]) -> Vec<VerificationResult> {
        futures::future::join_all(badges.iter().map(|badge| self.verify(badge))).await
    }

    async fn run_pipeline(&self, badge: &Value) -> Result<VerificationResult, CredentialError> {
        // Stage 1: structure
        let (structure, variant) = check_structure(badge);
        let Some(variant) = variant else {
            tracing::debug!(errors = ?structure.errors, "structure validation failed");
            return Ok(VerificationResult::structure_failure(structure));
        };

        // Stage 2: content
        let content = check_content(&variant);

        let mut warnings = structure.warnings.clone();
        warnings.extend(content.warnings.iter().cloned());

        // Stage 3: verification method
        let verification_method = declared_method(&variant);
        if verification_method.is_none() {
            warnings.push("no verification method declared".to_string());
        }

        // Stage 4: expiration
        let expiration = self.check_expiration(&variant, &mut warnings);

        // Stage 5: revocation
        let revocation = self.check_revocation(&variant, &mut warnings).await?;

        let mut errors = structure.errors.clone();
        errors.extend(content.errors.iter().cloned());
        let mut is_valid = structure.is_valid && content.is_valid;

        if self.policy.reject_expired && expiration == ExpirationStatus::Expired {
            is_valid = false;
            errors.push("credential has expired".to_string());
        }
        if self.policy.reject_revoked && revocation == RevocationStatus::Revoked {
            is_valid = false;
            errors.push("credential has been revoked".to_string());
        }

        tracing::debug!(
            kind = %variant.kind(),
            expiration = %expiration,
            revocation = %revocation,
            "verification stages complete"
        );

        Ok(VerificationResult {
            is_valid,
            errors,
            warnings,
            verification_method,
            expiration_status: Some(expiration),
            revocation_status: Some(revocation),
            structure_validation: structure,
            content_validation: content,
        })
    }

    fn check_expiration(
        &self,
        variant: &CredentialVariant,
        warnings: &mut Vec<String>,
    ) -> ExpirationStatus {
        let expiry = match variant {
            CredentialVariant::LegacyAssertion(a) => a.expires.as_ref(),
            CredentialVariant::VerifiableCredential(vc) => vc.expiration_date.as_ref(),
            CredentialVariant::LegacyBadgeClass(_) | CredentialVariant::FlexibleDisplay(_) => None,
        };
        let Some(expiry) = expiry else {
            return ExpirationStatus::NoExpiry;
        };

        match expiry.to_datetime() {
            Some(at) if self.clock.now() > at => {
                warnings.push(format!(
                    "credential expired on {}",
                    expiry.to_display_string()
                ));
                ExpirationStatus::Expired
            }
            Some(_) => ExpirationStatus::Valid,
            None => {
                warnings.push(format!(
                    "could not parse expiration date '{}'",
                    expiry.to_display_string()
                ));
                ExpirationStatus::NoExpiry
            }
        }
    }

    async fn check_revocation(
        &self,
        variant: &CredentialVariant,
        warnings: &mut Vec<String>,
    ) -> Result<RevocationStatus, CredentialError> {
        if let CredentialVariant::LegacyAssertion(LegacyAssertion {
            revoked: Some(true),
            revocation_reason,
            ..
        }) = variant
        {
            warnings.push(match revocation_reason {
                Some(reason) => format!("credential has been revoked: {}", reason),
                None => "credential has been revoked".to_string(),
            });
            return Ok(RevocationStatus::Revoked);
        }

        let Some(provider) = &self.revocation else {
            warnings.push("revocation status unknown: no revocation provider configured".into());
            return Ok(RevocationStatus::Unknown);
        };
        let Some(credential_id) = variant.id() else {
            warnings.push("revocation status unknown: credential has no id".into());
            return Ok(RevocationStatus::Unknown);
        };

        let status = provider.check_revocation(credential_id).await?;
        match status {
            RevocationStatus::Revoked => warnings.push("credential has been revoked".into()),
            RevocationStatus::Unknown => warnings.push("revocation status unknown".into()),
            RevocationStatus::Valid => {}
        }
        Ok(status)
    }
}

impl Default for BadgeVerifier {
    fn default() -> Self {
        Self::new()
    }
}

fn check_structure(badge: &Value) -> (ValidationReport, Option<CredentialVariant>) {
    match CredentialVariant::parse(badge) {
        Ok(variant) if variant.kind().is_credential() => {
            let mut report = ValidationReport::passed();
            if variant.id().is_none() {
                report.warn("credential has no id");
            }
            (report, Some(variant))
        }
        Ok(_) => (
            ValidationReport::failed(
                "display-only badge data cannot be verified; expected an assertion, \
                 badge class, or verifiable credential",
            ),
            None,
        ),
        Err(e) => (ValidationReport::failed(e.to_string()), None),
    }
}

fn check_content(variant: &CredentialVariant) -> ValidationReport {
    match variant {
        CredentialVariant::LegacyAssertion(assertion) => assertion_content(assertion),
        CredentialVariant::VerifiableCredential(vc) => credential_content(vc),
        CredentialVariant::LegacyBadgeClass(class) => badge_class_content(class),
        CredentialVariant::FlexibleDisplay(_) => {
            ValidationReport::failed("display-only badge data carries no verifiable content")
        }
    }
}

/// `verification.type` of an assertion or `proof.type` of a credential,
/// as declared. Nothing is checked cryptographically.
fn declared_method(variant: &CredentialVariant) -> Option<String> {
    let method = match variant {
        CredentialVariant::LegacyAssertion(assertion) => Some(assertion.verification.kind.as_str()),
        CredentialVariant::VerifiableCredential(vc) => vc
            .proof
            .as_ref()
            .and_then(|proofs| proofs.first())
            .map(|proof| proof.kind.as_str()),
        CredentialVariant::LegacyBadgeClass(_) | CredentialVariant::FlexibleDisplay(_) => None,
    };
    method
        .filter(|method| !method.trim().is_empty())
        .map(str::to_string)
}

fn assertion_content(assertion: &LegacyAssertion) -> ValidationReport {
    let mut report = ValidationReport::passed();

    if assertion.recipient.identity.trim().is_empty() {
        report.error("recipient identity is required");
    }

    match &assertion.badge {
        BadgeRef::Embedded(class) => {
            let issuer_named = class
                .issuer
                .as_ref()
                .and_then(|issuer| issuer.name())
                .is_some_and(|name| !name.trim().is_empty());
            if !issuer_named {
                report.error("issuer name could not be resolved from the badge class");
            }
            for message in validate(class) {
                if message != ISSUER_NAME_REQUIRED {
                    report.warn(format!("badge class: {}", message));
                }
            }
        }
        BadgeRef::Iri(iri) => {
            report.error(format!(
                "issuer name could not be resolved: badge is referenced by IRI {}",
                iri
            ));
        }
    }

    report
}

fn credential_content(vc: &VerifiableCredential) -> ValidationReport {
    let mut report = ValidationReport::passed();
    let (id, achievement) = match vc.primary_subject() {
        Some(subject) => (subject.id.as_ref(), subject.achievement.as_ref()),
        None => (None, None),
    };

    match (id, achievement) {
        (None, None) => {
            report.error("credential subject must have an id or an embedded achievement")
        }
        (_, Some(achievement))
            if achievement
                .name
                .as_deref()
                .map_or(true, |name| name.trim().is_empty()) =>
        {
            report.warn("achievement has no name")
        }
        _ => {}
    }

    report
}

fn badge_class_content(class: &LegacyBadgeClass) -> ValidationReport {
    let mut report = ValidationReport::passed();
    for message in validate(class) {
        report.error(message);
    }
    report.warn("badge class is a definition and names no recipient");
    report
}
