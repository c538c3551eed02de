//! [`AuthClient`] — the composite operations the session hook calls.

use std::sync::Arc;

use crate::error::AuthError;
use crate::provider::{IdentityProvider, SessionChanges};
use crate::Identity;

/// Cloneable handle over the injected identity provider.
///
/// One instance is constructed at app startup and handed to the UI through
/// context; tests construct their own over the mock provider.
#[derive(Clone)]
pub struct AuthClient {
    provider: Arc<dyn IdentityProvider>,
}

impl PartialEq for AuthClient {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.provider, &other.provider)
    }
}

impl AuthClient {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Create an account and stamp `"{first_name} {last_name}"` on it as the
    /// display name. Any provider failure is returned to the caller; there
    /// is deliberately no swallow-and-log path here.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Identity, AuthError> {
        self.provider.create_account(email, password).await?;
        let display_name = format!("{first_name} {last_name}");
        self.provider.update_display_name(&display_name).await
    }

    /// Password sign-in.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.provider.sign_in_with_password(email, password).await
    }

    /// Federated sign-in. `Ok(None)` means the flow was handed off without
    /// an immediate identity.
    pub async fn authenticate_federated(&self) -> Result<Option<Identity>, AuthError> {
        self.provider.sign_in_with_popup().await
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await
    }

    /// Restore any persisted session; the outcome arrives on the change
    /// stream.
    pub async fn resolve_session(&self) {
        self.provider.resolve_session().await;
    }

    pub fn session_changes(&self) -> SessionChanges {
        self.provider.session_changes()
    }

    pub fn current_session(&self) -> Option<Identity> {
        self.provider.current_session()
    }
}
