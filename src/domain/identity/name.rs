//! First/last name resolution with the combined-name fallback.

use crate::domain::foundation::MissingClaim;

use super::{ClaimMapping, IdentityClaims, LogicalKey};

/// A resolved first/last name pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub first: String,
    pub last: String,
}

impl ResolvedName {
    /// Creates a name from its parts.
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }

    /// Resolves first and last name from the claims.
    ///
    /// `firstname` and `lastname` are attempted independently; when either
    /// is missing the combined `name` claim is split instead: the token
    /// after the last space is the last name, everything before it the
    /// first name. A single-token name yields an empty first name. When
    /// `name` is missing too, the fallback itself fails with
    /// [`MissingClaim`].
    pub fn from_claims(
        mapping: &ClaimMapping,
        claims: &IdentityClaims,
    ) -> Result<Self, MissingClaim> {
        let first = mapping.resolve(claims, LogicalKey::FirstName);
        let last = mapping.resolve(claims, LogicalKey::LastName);

        match (first, last) {
            (Ok(first), Ok(last)) => Ok(Self::new(first, last)),
            _ => Ok(Self::from_combined(
                mapping.resolve(claims, LogicalKey::Name)?,
            )),
        }
    }

    fn from_combined(full: &str) -> Self {
        match full.rsplit_once(' ') {
            Some((first, last)) => Self::new(first, last),
            None => Self::new("", full),
        }
    }

    /// Returns "first last", without a leading space when first is empty.
    pub fn display_name(&self) -> String {
        if self.first.is_empty() {
            self.last.clone()
        } else {
            format!("{} {}", self.first, self.last)
        }
    }
}
