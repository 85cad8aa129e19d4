//! Account repository port.

use std::fmt;

use async_trait::async_trait;

use crate::domain::account::PersistentAccount;
use crate::domain::foundation::{AccountIdentifier, ProviderName, StorageError};

/// Capability witness for the privileged mid-authentication lookup.
///
/// The exchange re-fetches the canonical account before the caller's own
/// authorization has been established, so that single read must run with
/// authorization checks suspended. Passing this witness makes the elevation
/// explicit in the signature instead of an ambient toggle. It is neither
/// `Clone` nor `Copy` and can only be constructed inside this crate, so the
/// elevation cannot leak to any other operation.
pub struct ElevatedAccess {
    _scope: (),
}

impl ElevatedAccess {
    /// Grants elevation for a single exchange lookup.
    pub(crate) fn for_exchange() -> Self {
        Self { _scope: () }
    }
}

impl fmt::Debug for ElevatedAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ElevatedAccess")
    }
}

/// Durable account storage, implemented by the host's persistence layer.
///
/// # Contract
///
/// Implementations must:
/// - Treat `(identifier, provider)` as unique - it is the natural key
/// - Answer the elevated lookup without consulting the caller's
///   authorization state
/// - Fail with `StorageError` on any infrastructure problem; this crate
///   performs no retries
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds the active account with the given natural key.
    ///
    /// The [`ElevatedAccess`] witness means authorization checks are
    /// suspended for this single read.
    async fn find_active_by_natural_key(
        &self,
        identifier: &AccountIdentifier,
        provider: &ProviderName,
        access: &ElevatedAccess,
    ) -> Result<Option<PersistentAccount>, StorageError>;

    /// Stages changes to an existing account for the next flush.
    async fn update(&self, account: &PersistentAccount) -> Result<(), StorageError>;
}
