//! Account reconciliation - lookup-or-create plus the transient-to-persistent
//! exchange.
//!
//! Invoked exactly once per completed external authentication. The incoming
//! principal is transient: it carries externally-derived credential material
//! and provisional roles but is not backed by durable storage. Reconciliation
//! either rebinds it onto an existing persistent account, provisions a new
//! account when policy allows, or hands it back untouched.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{ConfigValidationError, ProvisioningConfig};
use crate::domain::account::{EmailAddress, PasswordPlaceholder, TransientAccount};
use crate::domain::foundation::{MissingClaim, ReconcileError, RoleName, Username};
use crate::domain::identity::{ClaimMapping, IdentityClaims, LogicalKey, ResolvedName};
use crate::ports::{
    AccountRepository, ElevatedAccess, NewUser, PersistenceGateway, RoleRegistry, UserDirectory,
};

/// Typed provisioning policy, built once from configuration.
#[derive(Debug, Clone, Default)]
pub struct ProvisioningPolicy {
    /// Logical-key to provider-claim-name overrides.
    pub claim_mapping: ClaimMapping,

    /// Whether a previously-unseen identity may be provisioned.
    pub auto_create_user: bool,

    /// Roles granted to an auto-created user.
    pub roles_for_auto_created_user: Vec<RoleName>,
}

impl ProvisioningPolicy {
    /// Builds the typed policy from raw configuration.
    pub fn from_config(config: &ProvisioningConfig) -> Result<Self, ConfigValidationError> {
        let claim_mapping = ClaimMapping::from_pairs(
            config
                .identity_value_mapping
                .iter()
                .map(|(key, claim)| (key.as_str(), claim.as_str())),
        )
        .map_err(|err| ConfigValidationError::UnknownLogicalKey(err.0))?;

        let roles_for_auto_created_user = config
            .roles_for_auto_created_user
            .iter()
            .map(|name| RoleName::new(name.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigValidationError::EmptyRoleName)?;

        Ok(Self {
            claim_mapping,
            auto_create_user: config.auto_create_user,
            roles_for_auto_created_user,
        })
    }
}

/// Reconciles a transient authenticated principal with durable storage.
pub struct AccountReconciler {
    accounts: Arc<dyn AccountRepository>,
    users: Arc<dyn UserDirectory>,
    persistence: Arc<dyn PersistenceGateway>,
    roles: Arc<dyn RoleRegistry>,
    policy: ProvisioningPolicy,
}

impl AccountReconciler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        users: Arc<dyn UserDirectory>,
        persistence: Arc<dyn PersistenceGateway>,
        roles: Arc<dyn RoleRegistry>,
        policy: ProvisioningPolicy,
    ) -> Self {
        Self {
            accounts,
            users,
            persistence,
            roles,
            policy,
        }
    }

    /// Reconciles the principal with the durable account store.
    ///
    /// Returns the principal to bind to the ongoing session: exchanged
    /// against a persistent account when one was matched or created, or the
    /// original transient principal when no account exists and policy
    /// forbids creating one. The latter is a documented outcome, not a
    /// silent failure - the caller ends up with a non-persisted principal.
    pub async fn reconcile(
        &self,
        auth_result: TransientAccount,
        claims: &IdentityClaims,
    ) -> Result<TransientAccount, ReconcileError> {
        // 1. Without a username, nothing can be matched or provisioned.
        //    An empty username claim is as unusable as an absent one.
        let raw = self.policy.claim_mapping.resolve(claims, LogicalKey::Username)?;
        let username = Username::new(raw).map_err(|_| {
            MissingClaim::new(
                self.policy.claim_mapping.claim_name(LogicalKey::Username),
                claims.claim_names(),
            )
        })?;

        // 2. Matched identities go straight to the exchange; the
        //    auto-creation policy is never consulted for them.
        if self
            .users
            .find_user(&username, auth_result.provider())
            .await?
            .is_some()
        {
            return self.exchange(auth_result).await;
        }

        // 3. Unknown identity, creation forbidden: hand the transient
        //    principal back untouched.
        if !self.policy.auto_create_user {
            warn!(
                %username,
                "Auto-creation of users is disabled. Create a user with this identifier manually."
            );
            return Ok(auth_result);
        }

        // 4. Grant the configured roles. An account nobody can use is worse
        //    than no account, so zero resolved roles aborts the branch.
        let mut auth_result = auth_result;
        for name in &self.policy.roles_for_auto_created_user {
            match self.roles.role(name) {
                Some(role) => auth_result.add_role(role.into_name()),
                None => warn!(
                    role = %name,
                    "Configured auto-create role is not defined in the policy registry"
                ),
            }
        }
        if !auth_result.has_roles() {
            warn!(
                %username,
                "No roles were assigned to the user. Assign at least one role, either through configuration or via the provider."
            );
            return Ok(auth_result);
        }

        // 5. Provision the user and its backing account.
        let name = ResolvedName::from_claims(&self.policy.claim_mapping, claims)?;
        let user = self
            .users
            .create_user(NewUser {
                username: username.clone(),
                provider: auth_result.provider().clone(),
                password: PasswordPlaceholder::generate(),
                name,
                roles: auth_result.roles().clone(),
            })
            .await?;

        let granted = auth_result
            .roles()
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            %username,
            roles = %granted,
            provider = %auth_result.provider(),
            "Created new user"
        );

        // 6. The contact address is optional; a missing or empty email
        //    claim is skipped, not an error.
        match self.policy.claim_mapping.resolve(claims, LogicalKey::Email) {
            Ok(address) => match EmailAddress::work(address) {
                Ok(email) => self.users.attach_primary_email(&user.id(), email).await?,
                Err(_) => debug!(%username, "Empty email claim skipped"),
            },
            Err(_) => debug!(
                %username,
                "No email claim present; user created without a primary address"
            ),
        }

        // 7. The new account must be durably visible before the exchange
        //    reads it back.
        self.persistence.flush().await?;

        self.exchange(auth_result).await
    }

    /// Exchanges the transient principal for its persistent counterpart.
    ///
    /// The persistent account gets a fresh successful-authentication
    /// timestamp; the returned principal keeps the transient credential
    /// material and role set. The durable credential field is bounded and
    /// deliberately not read back - the external blob routinely exceeds it,
    /// yet the host still needs the blob for the rest of the request.
    async fn exchange(
        &self,
        transient: TransientAccount,
    ) -> Result<TransientAccount, ReconcileError> {
        let credentials = transient.credentials_source().clone();
        let roles = transient.roles().clone();

        // The caller's authorization is not yet established mid-flow; the
        // lookup runs under an elevation scoped to this single read.
        let access = ElevatedAccess::for_exchange();
        let mut account = self
            .accounts
            .find_active_by_natural_key(transient.identifier(), transient.provider(), &access)
            .await?
            .ok_or_else(|| ReconcileError::AccountNotFound {
                identifier: transient.identifier().to_string(),
                provider: transient.provider().to_string(),
            })?;
        drop(access);

        account.record_successful_authentication();
        self.accounts.update(&account).await?;
        self.persistence.flush().await?;

        // Restore is unconditional: the restored fields are known to be
        // unvalidated and possibly oversized.
        let principal = TransientAccount::bound(&account, credentials, roles);

        // The principal above is detached and mutated; reset tracking so
        // the storage layer never writes it back.
        self.persistence.clear_tracking().await?;

        debug!(
            identifier = %principal.identifier(),
            provider = %principal.provider(),
            "Exchanged transient account for persistent account"
        );

        Ok(principal)
    }
}
