//! Account module - Principals, durable accounts, and provisioned users.
//!
//! The transient and persistent representations of an account are distinct
//! types on purpose: the in-memory credential material is unbounded and
//! secret, the durable credential field is bounded. The exchange in the
//! application layer is the only place the two meet.

mod credentials;
mod persistent;
mod transient;
mod user;

pub use credentials::{
    CredentialsSource, PasswordPlaceholder, StoredCredentials, MAX_INLINE_CREDENTIALS_LEN,
};
pub use persistent::PersistentAccount;
pub use transient::TransientAccount;
pub use user::{AddressUsage, EmailAddress, ProvisionedUser};
