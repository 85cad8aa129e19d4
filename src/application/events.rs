//! Post-authentication event glue.
//!
//! The host's authentication framework signals a completed external
//! authentication; this module gives that signal a concrete type and a
//! single handler entry point, so the wiring is an explicit call rather
//! than a dispatch-mechanism-specific hook.

use crate::domain::account::TransientAccount;
use crate::domain::foundation::ReconcileError;
use crate::domain::identity::IdentityClaims;

use super::AccountReconciler;

/// Emitted by the host once the external provider reports a successful
/// authentication. Carries the transient principal and the verified claims.
#[derive(Debug, Clone)]
pub struct AuthenticatedEvent {
    pub account: TransientAccount,
    pub claims: IdentityClaims,
}

impl AuthenticatedEvent {
    /// Creates the event for a freshly authenticated principal.
    pub fn new(account: TransientAccount, claims: IdentityClaims) -> Self {
        Self { account, claims }
    }
}

impl AccountReconciler {
    /// Entry point for the host's post-authentication hook.
    ///
    /// Register this against the host's "authenticated" signal; it must
    /// fire exactly once per successful external authentication. The
    /// returned principal replaces the event's transient account on the
    /// ongoing session.
    pub async fn on_authenticated(
        &self,
        event: AuthenticatedEvent,
    ) -> Result<TransientAccount, ReconcileError> {
        self.reconcile(event.account, &event.claims).await
    }
}
