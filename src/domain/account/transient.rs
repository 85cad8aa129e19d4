//! The transient, in-memory authenticated principal.

use std::collections::BTreeSet;

use crate::domain::foundation::{AccountId, AccountIdentifier, ProviderName, RoleName, Timestamp};

use super::{CredentialsSource, PersistentAccount};

/// An authenticated principal that exists only for the current
/// authentication flow.
///
/// Carries the externally-derived credential material and the provisional
/// role set. Never persisted directly; after a successful exchange it is
/// bound to the durable account it was matched with, while still carrying
/// the original in-memory credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientAccount {
    identifier: AccountIdentifier,
    provider: ProviderName,
    roles: BTreeSet<RoleName>,
    credentials_source: CredentialsSource,
    bound_account: Option<AccountId>,
    last_authenticated_at: Option<Timestamp>,
}

impl TransientAccount {
    /// Creates an unbound principal with an empty role set.
    pub fn new(
        identifier: AccountIdentifier,
        provider: ProviderName,
        credentials_source: CredentialsSource,
    ) -> Self {
        Self {
            identifier,
            provider,
            roles: BTreeSet::new(),
            credentials_source,
            bound_account: None,
            last_authenticated_at: None,
        }
    }

    /// Rebinds a principal onto a persistent account.
    ///
    /// The resulting principal carries the persistent identity but the
    /// given (transient) credentials and roles - the durable credential
    /// field is not read back here.
    pub fn bound(
        account: &PersistentAccount,
        credentials_source: CredentialsSource,
        roles: BTreeSet<RoleName>,
    ) -> Self {
        Self {
            identifier: account.identifier().clone(),
            provider: account.provider().clone(),
            roles,
            credentials_source,
            bound_account: Some(account.id()),
            last_authenticated_at: account.last_authenticated_at(),
        }
    }

    /// The provider-scoped account identifier.
    pub fn identifier(&self) -> &AccountIdentifier {
        &self.identifier
    }

    /// The authentication provider this principal came from.
    pub fn provider(&self) -> &ProviderName {
        &self.provider
    }

    /// The roles currently assigned to this principal.
    pub fn roles(&self) -> &BTreeSet<RoleName> {
        &self.roles
    }

    /// The opaque credential material from the external exchange.
    pub fn credentials_source(&self) -> &CredentialsSource {
        &self.credentials_source
    }

    /// Assigns a role to this principal.
    pub fn add_role(&mut self, role: RoleName) {
        self.roles.insert(role);
    }

    /// Returns true when at least one role is assigned.
    pub fn has_roles(&self) -> bool {
        !self.roles.is_empty()
    }

    /// The durable account this principal was exchanged against, if the
    /// exchange has happened.
    pub fn bound_account(&self) -> Option<AccountId> {
        self.bound_account
    }

    /// Returns true once the principal is backed by a persistent account.
    pub fn is_bound(&self) -> bool {
        self.bound_account.is_some()
    }

    /// Last successful authentication recorded on the bound account.
    pub fn last_authenticated_at(&self) -> Option<Timestamp> {
        self.last_authenticated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::StoredCredentials;

    fn identifier() -> AccountIdentifier {
        AccountIdentifier::new("jane.doe").unwrap()
    }

    fn provider() -> ProviderName {
        ProviderName::new("oidc").unwrap()
    }

    fn credentials() -> CredentialsSource {
        CredentialsSource::new(b"opaque-oidc-blob".to_vec())
    }

    #[test]
    fn new_principal_is_unbound_with_no_roles() {
        let account = TransientAccount::new(identifier(), provider(), credentials());

        assert!(!account.is_bound());
        assert!(!account.has_roles());
        assert!(account.last_authenticated_at().is_none());
    }

    #[test]
    fn add_role_deduplicates() {
        let mut account = TransientAccount::new(identifier(), provider(), credentials());
        account.add_role(RoleName::new("Editor").unwrap());
        account.add_role(RoleName::new("Editor").unwrap());

        assert_eq!(account.roles().len(), 1);
        assert!(account.has_roles());
    }

    #[test]
    fn bound_principal_keeps_transient_credentials() {
        let mut persistent = PersistentAccount::new(
            identifier(),
            provider(),
            StoredCredentials::Inline(b"stale".to_vec()),
            BTreeSet::new(),
        );
        persistent.record_successful_authentication();

        let roles: BTreeSet<_> = [RoleName::new("Editor").unwrap()].into();
        let principal = TransientAccount::bound(&persistent, credentials(), roles.clone());

        assert!(principal.is_bound());
        assert_eq!(principal.bound_account(), Some(persistent.id()));
        assert_eq!(principal.credentials_source(), &credentials());
        assert_eq!(principal.roles(), &roles);
        assert_eq!(
            principal.last_authenticated_at(),
            persistent.last_authenticated_at()
        );
    }
}
