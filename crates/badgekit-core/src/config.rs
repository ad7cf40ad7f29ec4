use serde::{Deserialize, Serialize};

/// Trust policy applied on top of the structure and content checks.
///
/// With the defaults, expired and revoked credentials are reported through
/// `expirationStatus` / `revocationStatus` and warnings only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationPolicy {
    /// Mark expired credentials invalid.
    pub reject_expired: bool,
    /// Mark revoked credentials invalid.
    pub reject_revoked: bool,
}

impl VerificationPolicy {
    /// Policy that rejects both expired and revoked credentials.
    pub fn strict() -> Self {
        Self {
            reject_expired: true,
            reject_revoked: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_lenient() {
        let policy = VerificationPolicy::default();
        assert!(!policy.reject_expired);
        assert!(!policy.reject_revoked);
    }

    #[test]
    fn test_policy_partial_deserialize() {
        let policy: VerificationPolicy =
            serde_json::from_str(r#"{"reject_revoked": true}"#).unwrap();
        assert!(!policy.reject_expired);
        assert!(policy.reject_revoked);
    }

    #[test]
    fn test_strict_policy() {
        let policy = VerificationPolicy::strict();
        assert!(policy.reject_expired && policy.reject_revoked);
    }
}
