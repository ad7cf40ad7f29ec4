use serde::{Deserialize, Serialize};

/// Issuer block of a [`CanonicalBadge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalIssuer {
    pub name: String,
    pub url: String,
    pub image: String,
}

/// The unified display record every badge format is projected into.
///
/// Every field always carries a value: absent source fields become the
/// empty string or the empty list, so rendering code never branches on
/// missing data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalBadge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub issuer: CanonicalIssuer,
    pub issued_on: String,
    pub expiry_date: String,
    pub tags: Vec<String>,
}
