//! The application-level user profile created by auto-provisioning.

use crate::domain::foundation::{ProviderName, Timestamp, UserId, Username, ValidationError};
use crate::domain::identity::ResolvedName;

/// Intended usage of an electronic address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressUsage {
    Work,
    Home,
}

/// An email contact address on a user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    address: String,
    usage: AddressUsage,
}

impl EmailAddress {
    /// Creates a work email address, returning error if empty.
    pub fn work(address: impl Into<String>) -> Result<Self, ValidationError> {
        let address = address.into();
        if address.is_empty() {
            return Err(ValidationError::empty_field("email_address"));
        }
        Ok(Self {
            address,
            usage: AddressUsage::Work,
        })
    }

    /// Returns the address string.
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// Returns the intended usage.
    pub fn usage(&self) -> AddressUsage {
        self.usage
    }
}

/// User profile owned by the identity behind a persistent account.
///
/// Created lazily, only when auto-provisioning fires for a previously
/// unseen external identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedUser {
    id: UserId,
    username: Username,
    provider: ProviderName,
    first_name: String,
    last_name: String,
    primary_email: Option<EmailAddress>,
    created_at: Timestamp,
}

impl ProvisionedUser {
    /// Creates a new user profile without a contact address.
    pub fn new(username: Username, provider: ProviderName, name: ResolvedName) -> Self {
        Self {
            id: UserId::new(),
            username,
            provider,
            first_name: name.first,
            last_name: name.last,
            primary_email: None,
            created_at: Timestamp::now(),
        }
    }

    /// The profile identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// The canonical username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// The authentication provider the profile belongs to.
    pub fn provider(&self) -> &ProviderName {
        &self.provider
    }

    /// The user's first name; may be empty when only a single-token
    /// combined name was available.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// The user's last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Full display name.
    pub fn full_name(&self) -> String {
        if self.first_name.is_empty() {
            self.last_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// The primary contact address, when one was attached.
    pub fn primary_email(&self) -> Option<&EmailAddress> {
        self.primary_email.as_ref()
    }

    /// Attaches the primary contact address.
    pub fn set_primary_email(&mut self, email: EmailAddress) {
        self.primary_email = Some(email);
    }

    /// When this profile was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> ProvisionedUser {
        ProvisionedUser::new(
            Username::new("jane.doe").unwrap(),
            ProviderName::new("oidc").unwrap(),
            ResolvedName::new("Jane", "Doe"),
        )
    }

    #[test]
    fn new_user_has_no_primary_email() {
        assert!(user().primary_email().is_none());
    }

    #[test]
    fn set_primary_email_attaches_address() {
        let mut user = user();
        user.set_primary_email(EmailAddress::work("j@x.com").unwrap());

        let email = user.primary_email().unwrap();
        assert_eq!(email.as_str(), "j@x.com");
        assert_eq!(email.usage(), AddressUsage::Work);
    }

    #[test]
    fn email_address_rejects_empty() {
        assert!(EmailAddress::work("").is_err());
    }

    #[test]
    fn full_name_joins_parts() {
        assert_eq!(user().full_name(), "Jane Doe");
    }

    #[test]
    fn full_name_with_empty_first_name_is_last_name_only() {
        let user = ProvisionedUser::new(
            Username::new("madonna").unwrap(),
            ProviderName::new("oidc").unwrap(),
            ResolvedName::new("", "Madonna"),
        );
        assert_eq!(user.full_name(), "Madonna");
    }
}
