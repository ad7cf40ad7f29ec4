use badgekit_core::CoreError;

/// Credential service errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("revocation check failed: {0}")]
    Revocation(#[from] RevocationError),

    #[error("draft is not ready for issuance: {0}")]
    NotReady(String),

    #[error("internal verification failure: {0}")]
    Internal(String),
}

/// Errors reported by a [`crate::RevocationProvider`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum RevocationError {
    #[error("revocation service unavailable: {0}")]
    Unavailable(String),
}
