use crate::types::CredentialKind;

/// Core badge-format errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("unrecognized badge format: {0}")]
    UnrecognizedFormat(String),

    #[error("malformed {kind}: {reason}")]
    Malformed { kind: CredentialKind, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
