use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RevocationError;

/// Whether an issuer has invalidated a previously issued credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationStatus {
    Valid,
    Revoked,
    Unknown,
}

impl fmt::Display for RevocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Revoked => write!(f, "revoked"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Looks up the revocation status of a credential by its id.
#[async_trait]
pub trait RevocationProvider: Send + Sync {
    async fn check_revocation(
        &self,
        credential_id: &str,
    ) -> Result<RevocationStatus, RevocationError>;
}

/// In-memory revocation registry.
///
/// Ids that were never recorded resolve to `unknown`, or to `valid` when the
/// list is authoritative (every revoked credential is known to it).
pub struct StaticRevocationList {
    /// Credential ID → recorded status.
    entries: DashMap<String, RevocationStatus>,
    authoritative: bool,
}

impl StaticRevocationList {
    /// Create an empty, non-authoritative list.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            authoritative: false,
        }
    }

    /// Create an empty list that treats unrecorded ids as valid.
    pub fn authoritative() -> Self {
        Self {
            entries: DashMap::new(),
            authoritative: true,
        }
    }

    /// Build a list from revoked credential ids.
    pub fn from_revoked<I, S>(ids: I, authoritative: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = if authoritative {
            Self::authoritative()
        } else {
            Self::new()
        };
        for id in ids {
            list.revoke(id);
        }
        list
    }

    /// Record a credential as revoked.
    pub fn revoke(&self, credential_id: impl Into<String>) {
        let id = credential_id.into();
        tracing::debug!(credential_id = %id, "credential marked revoked");
        self.entries.insert(id, RevocationStatus::Revoked);
    }

    /// Record a credential as known-good.
    pub fn mark_valid(&self, credential_id: impl Into<String>) {
        self.entries
            .insert(credential_id.into(), RevocationStatus::Valid);
    }

    /// Forget a credential. Returns whether it was recorded.
    pub fn remove(&self, credential_id: &str) -> bool {
        self.entries.remove(credential_id).is_some()
    }

    /// Current status of a credential.
    pub fn status(&self, credential_id: &str) -> RevocationStatus {
        match self.entries.get(credential_id) {
            Some(entry) => *entry,
            None if self.authoritative => RevocationStatus::Valid,
            None => RevocationStatus::Unknown,
        }
    }

    /// Number of recorded credentials.
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for StaticRevocationList {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationProvider for StaticRevocationList {
    async fn check_revocation(
        &self,
        credential_id: &str,
    ) -> Result<RevocationStatus, RevocationError> {
        Ok(self.status(credential_id))
    }
}
