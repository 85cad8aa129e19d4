//! The durable account record.

use std::collections::BTreeSet;

use crate::domain::foundation::{AccountId, AccountIdentifier, ProviderName, RoleName, Timestamp};

use super::StoredCredentials;

/// Durable counterpart of a transient principal.
///
/// Keyed by the natural key `(identifier, provider)`, which must be unique
/// in storage. The credential field holds the bounded [`StoredCredentials`]
/// form; the full external blob lives only on the in-memory principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentAccount {
    id: AccountId,
    identifier: AccountIdentifier,
    provider: ProviderName,
    stored_credentials: StoredCredentials,
    roles: BTreeSet<RoleName>,
    last_authenticated_at: Option<Timestamp>,
    created_at: Timestamp,
}

impl PersistentAccount {
    /// Creates a new account record.
    ///
    /// The role set is fixed here, at creation time; this subsystem never
    /// recomputes it for existing accounts.
    pub fn new(
        identifier: AccountIdentifier,
        provider: ProviderName,
        stored_credentials: StoredCredentials,
        roles: BTreeSet<RoleName>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            identifier,
            provider,
            stored_credentials,
            roles,
            last_authenticated_at: None,
            created_at: Timestamp::now(),
        }
    }

    /// The surrogate record identifier.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// The provider-scoped account identifier.
    pub fn identifier(&self) -> &AccountIdentifier {
        &self.identifier
    }

    /// The authentication provider this account belongs to.
    pub fn provider(&self) -> &ProviderName {
        &self.provider
    }

    /// The natural key `(identifier, provider)`.
    pub fn natural_key(&self) -> (&AccountIdentifier, &ProviderName) {
        (&self.identifier, &self.provider)
    }

    /// The bounded durable credential field.
    pub fn stored_credentials(&self) -> &StoredCredentials {
        &self.stored_credentials
    }

    /// The roles assigned at creation time.
    pub fn roles(&self) -> &BTreeSet<RoleName> {
        &self.roles
    }

    /// Records a successful external authentication against this account.
    pub fn record_successful_authentication(&mut self) {
        self.last_authenticated_at = Some(Timestamp::now());
    }

    /// When this account last authenticated successfully, if ever.
    pub fn last_authenticated_at(&self) -> Option<Timestamp> {
        self.last_authenticated_at
    }

    /// When this account record was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
