//! Logical-key to provider-claim-name mapping.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::domain::foundation::MissingClaim;

use super::IdentityClaims;

/// The fixed set of logical identity values this crate consumes.
///
/// Each key's spelling doubles as the default provider claim name when no
/// override is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Username,
    FirstName,
    LastName,
    Name,
    Email,
}

impl LogicalKey {
    /// All logical keys, in resolution order.
    pub const ALL: [LogicalKey; 5] = [
        LogicalKey::Username,
        LogicalKey::FirstName,
        LogicalKey::LastName,
        LogicalKey::Name,
        LogicalKey::Email,
    ];

    /// The configuration spelling, also the default claim name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalKey::Username => "username",
            LogicalKey::FirstName => "firstname",
            LogicalKey::LastName => "lastname",
            LogicalKey::Name => "name",
            LogicalKey::Email => "email",
        }
    }

    /// Parses a configuration spelling back into a logical key.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A configured override named a key outside the fixed logical set.
#[derive(Debug, Clone, Error)]
#[error("Unknown logical identity key '{0}'")]
pub struct UnknownLogicalKey(pub String);

/// Configurable remapping from logical keys to provider claim names.
///
/// Unmapped keys resolve to their own spelling, so an empty mapping works
/// against any provider that uses the standard claim names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimMapping {
    overrides: HashMap<LogicalKey, String>,
}

impl ClaimMapping {
    /// Creates the identity mapping (no overrides).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an override mapping a logical key to a provider claim name.
    pub fn with_override(mut self, key: LogicalKey, claim: impl Into<String>) -> Self {
        self.overrides.insert(key, claim.into());
        self
    }

    /// Builds a mapping from raw configuration pairs.
    ///
    /// Fails when a pair names a key outside the fixed logical set, so
    /// configuration typos surface at load time instead of as permanently
    /// missing claims.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, UnknownLogicalKey>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut mapping = Self::new();
        for (key, claim) in pairs {
            let key = LogicalKey::parse(key).ok_or_else(|| UnknownLogicalKey(key.to_string()))?;
            mapping.overrides.insert(key, claim.to_string());
        }
        Ok(mapping)
    }

    /// Returns the provider claim name a logical key resolves through.
    pub fn claim_name(&self, key: LogicalKey) -> &str {
        self.overrides
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.as_str())
    }

    /// Resolves a logical key against a claim set.
    ///
    /// Fails with [`MissingClaim`] when the mapped claim is absent or null;
    /// the error carries every claim name actually present. No side effects.
    pub fn resolve<'c>(
        &self,
        claims: &'c IdentityClaims,
        key: LogicalKey,
    ) -> Result<&'c str, MissingClaim> {
        let claim = self.claim_name(key);
        claims
            .get(claim)
            .ok_or_else(|| MissingClaim::new(claim, claims.claim_names()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn logical_key_spelling_roundtrips() {
        for key in LogicalKey::ALL {
            assert_eq!(LogicalKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(LogicalKey::parse("nickname"), None);
    }

    #[test]
    fn unmapped_key_resolves_through_its_own_spelling() {
        let claims = IdentityClaims::from_pairs([("username", "jane")]);
        let mapping = ClaimMapping::new();

        assert_eq!(
            mapping.resolve(&claims, LogicalKey::Username).unwrap(),
            "jane"
        );
    }

    #[test]
    fn override_redirects_resolution() {
        let claims = IdentityClaims::from_pairs([("preferred_username", "jane")]);
        let mapping = ClaimMapping::new().with_override(LogicalKey::Username, "preferred_username");

        assert_eq!(
            mapping.resolve(&claims, LogicalKey::Username).unwrap(),
            "jane"
        );
    }

    #[test]
    fn override_hides_the_default_claim() {
        // With an override in place the default spelling is not consulted.
        let claims = IdentityClaims::from_pairs([("username", "jane")]);
        let mapping = ClaimMapping::new().with_override(LogicalKey::Username, "upn");

        let err = mapping.resolve(&claims, LogicalKey::Username).unwrap_err();
        assert_eq!(err.requested, "upn");
        assert_eq!(err.available, vec!["username"]);
    }

    #[test]
    fn missing_claim_error_names_the_mapped_claim() {
        let claims = IdentityClaims::from_pairs([("sub", "1"), ("email", "a@b.c")]);
        let mapping = ClaimMapping::new();

        let err = mapping.resolve(&claims, LogicalKey::Username).unwrap_err();
        assert_eq!(err.requested, "username");
        assert_eq!(err.available, vec!["email", "sub"]);
    }

    #[test]
    fn from_pairs_accepts_known_keys() {
        let mapping =
            ClaimMapping::from_pairs([("username", "upn"), ("email", "mail")]).unwrap();
        assert_eq!(mapping.claim_name(LogicalKey::Username), "upn");
        assert_eq!(mapping.claim_name(LogicalKey::Email), "mail");
        assert_eq!(mapping.claim_name(LogicalKey::Name), "name");
    }

    #[test]
    fn from_pairs_rejects_unknown_keys() {
        let err = ClaimMapping::from_pairs([("nickname", "nick")]).unwrap_err();
        assert_eq!(err.0, "nickname");
    }

    proptest! {
        /// Any claim set containing the default-mapped username claim
        /// resolves to exactly that value.
        #[test]
        fn resolve_returns_exact_value(value in "[a-zA-Z0-9@._-]{1,40}", extra in "[a-z]{1,10}") {
            let claims = IdentityClaims::from_pairs([
                ("username", value.as_str()),
                ("other", extra.as_str()),
            ]);
            let mapping = ClaimMapping::new();

            prop_assert_eq!(mapping.resolve(&claims, LogicalKey::Username).unwrap(), value.as_str());
        }

        /// With an override configured, resolution reads the overridden
        /// claim and returns its exact value.
        #[test]
        fn resolve_honors_override(value in "[a-zA-Z0-9@._-]{1,40}") {
            let claims = IdentityClaims::from_pairs([("upn", value.as_str())]);
            let mapping = ClaimMapping::new().with_override(LogicalKey::Username, "upn");

            prop_assert_eq!(mapping.resolve(&claims, LogicalKey::Username).unwrap(), value.as_str());
        }
    }
}
