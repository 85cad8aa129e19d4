//! User directory port (profile and backing account lifecycle).

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::account::{EmailAddress, PasswordPlaceholder, ProvisionedUser};
use crate::domain::foundation::{ProviderName, RoleName, StorageError, UserId, Username};
use crate::domain::identity::ResolvedName;

/// Everything needed to provision a user and its backing account.
#[derive(Debug)]
pub struct NewUser {
    pub username: Username,
    pub provider: ProviderName,
    pub password: PasswordPlaceholder,
    pub name: ResolvedName,
    pub roles: BTreeSet<RoleName>,
}

/// User profile storage, implemented by the host application.
///
/// # Contract
///
/// Implementations must:
/// - Create the profile and its backing persistent account together,
///   staged until the next [`PersistenceGateway::flush`]
/// - Fail `create_user` with `StorageError::Conflict` when the natural key
///   `(username, provider)` already exists - concurrent first-time
///   authentications for the same identity must not double-provision
///
/// [`PersistenceGateway::flush`]: super::PersistenceGateway::flush
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds the user owning the account `(username, provider)`.
    async fn find_user(
        &self,
        username: &Username,
        provider: &ProviderName,
    ) -> Result<Option<ProvisionedUser>, StorageError>;

    /// Creates a user profile and its backing account.
    async fn create_user(&self, new_user: NewUser) -> Result<ProvisionedUser, StorageError>;

    /// Attaches the primary contact address to a previously created user.
    async fn attach_primary_email(
        &self,
        user_id: &UserId,
        email: EmailAddress,
    ) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_directory_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn UserDirectory) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn UserDirectory>>();
    }
}
