//! Role registry port.

use crate::domain::foundation::RoleName;

/// A role definition from the host's policy registry.
///
/// Holding a `Role` is proof the name resolved against the registry; raw
/// [`RoleName`]s from configuration have not been checked yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: RoleName,
}

impl Role {
    /// Creates a role definition.
    pub fn new(name: RoleName) -> Self {
        Self { name }
    }

    /// The role's name.
    pub fn name(&self) -> &RoleName {
        &self.name
    }

    /// Consumes the role, returning its name.
    pub fn into_name(self) -> RoleName {
        self.name
    }
}

/// Role lookup against the host's policy configuration.
///
/// Synchronous on purpose: role definitions are static configuration, not
/// I/O. Consulted only during auto-creation.
pub trait RoleRegistry: Send + Sync {
    /// Looks up a role definition; `None` when the name is not configured.
    fn role(&self, name: &RoleName) -> Option<Role>;
}
