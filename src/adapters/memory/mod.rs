//! In-memory storage and registry adapters.
//!
//! These adapters implement the storage and policy ports over process-local
//! maps, avoiding the need for a real persistence layer. They model the
//! parts of the port contracts the reconciler depends on: staged writes
//! that become visible on flush, natural-key uniqueness, and tracking
//! resets.
//!
//! # Example
//!
//! ```ignore
//! use oidc_bridge::adapters::memory::{InMemoryAccountStore, StaticRoleRegistry};
//!
//! let store = Arc::new(InMemoryAccountStore::new());
//! let registry = Arc::new(StaticRoleRegistry::new().with_role(editor));
//! let reconciler = AccountReconciler::new(
//!     store.clone(), store.clone(), store.clone(), registry, policy,
//! );
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::account::{
    EmailAddress, PersistentAccount, ProvisionedUser, StoredCredentials,
};
use crate::domain::foundation::{
    AccountIdentifier, ProviderName, RoleName, StorageError, UserId, Username,
};
use crate::ports::{
    AccountRepository, ElevatedAccess, NewUser, PersistenceGateway, Role, RoleRegistry,
    UserDirectory,
};

#[derive(Default)]
struct StoreState {
    /// Committed users, keyed by (username, provider).
    users: HashMap<(String, String), ProvisionedUser>,
    /// Committed accounts, keyed by (identifier, provider).
    accounts: HashMap<(String, String), PersistentAccount>,
    /// Writes staged since the last flush.
    pending_users: Vec<ProvisionedUser>,
    pending_accounts: Vec<PersistentAccount>,
    pending_updates: Vec<PersistentAccount>,
}

impl StoreState {
    fn natural_key_taken(&self, identifier: &str, provider: &str) -> bool {
        let key = (identifier.to_string(), provider.to_string());
        self.users.contains_key(&key)
            || self.accounts.contains_key(&key)
            || self
                .pending_users
                .iter()
                .any(|u| u.username().as_str() == identifier && u.provider().as_str() == provider)
            || self
                .pending_accounts
                .iter()
                .any(|a| a.identifier().as_str() == identifier && a.provider().as_str() == provider)
    }
}

/// In-memory implementation of the three storage ports.
///
/// Reads observe committed state only; `create_user` and `update` stage
/// writes that become visible on the next [`PersistenceGateway::flush`].
/// Call counters allow tests to assert which storage operations ran.
#[derive(Default)]
pub struct InMemoryAccountStore {
    state: Mutex<StoreState>,
    lookups: AtomicUsize,
    creates: AtomicUsize,
    flushes: AtomicUsize,
    tracking_resets: AtomicUsize,
}

impl InMemoryAccountStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a committed user, bypassing the staging discipline.
    pub fn seed_user(&self, user: ProvisionedUser) {
        let key = (
            user.username().as_str().to_string(),
            user.provider().as_str().to_string(),
        );
        self.state.lock().unwrap().users.insert(key, user);
    }

    /// Seeds a committed account, bypassing the staging discipline.
    pub fn seed_account(&self, account: PersistentAccount) {
        let key = (
            account.identifier().as_str().to_string(),
            account.provider().as_str().to_string(),
        );
        self.state.lock().unwrap().accounts.insert(key, account);
    }

    /// Builder-style variant of [`seed_user`] + [`seed_account`].
    ///
    /// [`seed_user`]: Self::seed_user
    /// [`seed_account`]: Self::seed_account
    pub fn with_provisioned(self, user: ProvisionedUser, account: PersistentAccount) -> Self {
        self.seed_user(user);
        self.seed_account(account);
        self
    }

    /// Returns the committed user for `(username, provider)`, if any.
    pub fn committed_user(&self, username: &str, provider: &str) -> Option<ProvisionedUser> {
        self.state
            .lock()
            .unwrap()
            .users
            .get(&(username.to_string(), provider.to_string()))
            .cloned()
    }

    /// Returns the committed account for `(identifier, provider)`, if any.
    pub fn committed_account(&self, identifier: &str, provider: &str) -> Option<PersistentAccount> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(&(identifier.to_string(), provider.to_string()))
            .cloned()
    }

    /// Number of committed users.
    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    /// Number of committed accounts.
    pub fn account_count(&self) -> usize {
        self.state.lock().unwrap().accounts.len()
    }

    /// How many lookups (user or account) have been issued.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// How many `create_user` calls have been issued.
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// How many flushes have been issued.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// How many tracking resets have been issued.
    pub fn tracking_reset_count(&self) -> usize {
        self.tracking_resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for InMemoryAccountStore {
    async fn find_user(
        &self,
        username: &Username,
        provider: &ProviderName,
    ) -> Result<Option<ProvisionedUser>, StorageError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let key = (username.as_str().to_string(), provider.as_str().to_string());
        Ok(self.state.lock().unwrap().users.get(&key).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<ProvisionedUser, StorageError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();

        if state.natural_key_taken(new_user.username.as_str(), new_user.provider.as_str()) {
            return Err(StorageError::Conflict {
                identifier: new_user.username.as_str().to_string(),
                provider: new_user.provider.as_str().to_string(),
            });
        }

        let user = ProvisionedUser::new(
            new_user.username.clone(),
            new_user.provider.clone(),
            new_user.name,
        );
        let account = PersistentAccount::new(
            AccountIdentifier::from(new_user.username),
            new_user.provider,
            StoredCredentials::from_password(&new_user.password),
            new_user.roles,
        );

        state.pending_users.push(user.clone());
        state.pending_accounts.push(account);
        Ok(user)
    }

    async fn attach_primary_email(
        &self,
        user_id: &UserId,
        email: EmailAddress,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();

        if let Some(user) = state.pending_users.iter_mut().find(|u| u.id() == *user_id) {
            user.set_primary_email(email);
            return Ok(());
        }
        if let Some(user) = state.users.values_mut().find(|u| u.id() == *user_id) {
            user.set_primary_email(email);
            return Ok(());
        }
        Err(StorageError::internal(format!(
            "No user with id {user_id}"
        )))
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountStore {
    async fn find_active_by_natural_key(
        &self,
        identifier: &AccountIdentifier,
        provider: &ProviderName,
        _access: &ElevatedAccess,
    ) -> Result<Option<PersistentAccount>, StorageError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let key = (
            identifier.as_str().to_string(),
            provider.as_str().to_string(),
        );
        Ok(self.state.lock().unwrap().accounts.get(&key).cloned())
    }

    async fn update(&self, account: &PersistentAccount) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.pending_updates.push(account.clone());
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryAccountStore {
    async fn flush(&self) -> Result<(), StorageError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();

        let pending_users: Vec<_> = state.pending_users.drain(..).collect();
        for user in pending_users {
            let key = (
                user.username().as_str().to_string(),
                user.provider().as_str().to_string(),
            );
            state.users.insert(key, user);
        }

        let pending_accounts: Vec<_> = state.pending_accounts.drain(..).collect();
        for account in pending_accounts {
            let key = (
                account.identifier().as_str().to_string(),
                account.provider().as_str().to_string(),
            );
            state.accounts.insert(key, account);
        }

        let pending_updates: Vec<_> = state.pending_updates.drain(..).collect();
        for account in pending_updates {
            let key = (
                account.identifier().as_str().to_string(),
                account.provider().as_str().to_string(),
            );
            state.accounts.insert(key, account);
        }

        Ok(())
    }

    async fn clear_tracking(&self) -> Result<(), StorageError> {
        self.tracking_resets.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();

        // Unflushed staged state is tracking state too; a reset drops it.
        state.pending_users.clear();
        state.pending_accounts.clear();
        state.pending_updates.clear();
        Ok(())
    }
}

/// Role registry backed by a fixed set of known role names.
#[derive(Debug, Default)]
pub struct StaticRoleRegistry {
    roles: BTreeSet<RoleName>,
}

impl StaticRoleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a known role.
    pub fn with_role(mut self, name: RoleName) -> Self {
        self.roles.insert(name);
        self
    }
}

impl RoleRegistry for StaticRoleRegistry {
    fn role(&self, name: &RoleName) -> Option<Role> {
        self.roles.contains(name).then(|| Role::new(name.clone()))
    }
}
