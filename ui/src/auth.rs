//! Authentication state and the session hook.
//!
//! [`AuthProvider`] owns the session signal and the provider subscription;
//! [`use_session`] hands views the operations ([`SessionOps`]) and
//! [`use_auth`] the state. The redirect guards are effects keyed on
//! session-state changes, never side effects of a render pass.

use dioxus::prelude::*;
use futures::StreamExt;
use identity::{AuthClient, AuthError, Identity};

const DASHBOARD_PATH: &str = "/dashboard";
const AUTH_PATH: &str = "/auth";
const ROOT_PATH: &str = "/";

/// Cached session state for the application.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub user: Option<Identity>,
    /// True once the initial session check has resolved.
    pub resolved: bool,
}

impl AuthState {
    pub fn phase(&self) -> AuthPhase {
        if !self.resolved {
            AuthPhase::Loading
        } else if self.user.is_some() {
            AuthPhase::SignedIn
        } else {
            AuthPhase::SignedOut
        }
    }
}

/// The three render states every guarded view distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Initial session check still in flight; render a placeholder, never
    /// user-specific content.
    Loading,
    SignedOut,
    SignedIn,
}

/// Get the current authentication state.
/// Returns a signal that updates when the user signs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Get the session operations bound to the injected provider client.
pub fn use_session() -> SessionOps {
    SessionOps::new(use_context::<AuthClient>())
}

/// Provider component that manages authentication state.
/// Wrap the app with this component and hand it the constructed client.
#[component]
pub fn AuthProvider(client: AuthClient, children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);
    let client = use_context_provider(move || client);
    use_context_provider(|| auth_state);

    // Follow the provider's change stream for the lifetime of the app.
    // Subscribing before resolving means the initial notification cannot be
    // missed; dropping the stream on unmount unsubscribes.
    let _ = use_resource(move || {
        let client = client.clone();
        async move {
            let mut changes = client.session_changes();
            client.resolve_session().await;
            while let Some(user) = changes.next().await {
                auth_state.set(AuthState {
                    user,
                    resolved: true,
                });
            }
        }
    });

    rsx! {
        {children}
    }
}

/// Send signed-in visitors to the dashboard, re-evaluated on every
/// session-state change.
pub fn use_redirect_if_authenticated() {
    let auth = use_auth();
    use_effect(move || {
        if auth().phase() == AuthPhase::SignedIn {
            navigate(DASHBOARD_PATH);
        }
    });
}

/// Send signed-out visitors of a protected view to the auth page once the
/// session check has resolved.
pub fn use_require_session() {
    let auth = use_auth();
    use_effect(move || {
        if auth().phase() == AuthPhase::SignedOut {
            navigate(AUTH_PATH);
        }
    });
}

/// Session operations over the injected [`AuthClient`].
///
/// Every provider failure is returned to the caller; the views decide what
/// to show. Successful operations navigate as a final step.
#[derive(Clone, PartialEq)]
pub struct SessionOps {
    client: AuthClient,
}

impl SessionOps {
    pub fn new(client: AuthClient) -> Self {
        Self { client }
    }

    /// Create an account, stamp the display name, and land on the dashboard.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), AuthError> {
        self.client
            .register(email, password, first_name, last_name)
            .await?;
        navigate(DASHBOARD_PATH);
        Ok(())
    }

    /// Password sign-in; lands on the dashboard on success.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.client.authenticate(email, password).await?;
        navigate(DASHBOARD_PATH);
        Ok(())
    }

    /// Federated popup sign-in. Navigates only when the flow produced an
    /// identity right away.
    pub async fn authenticate_federated(&self) -> Result<(), AuthError> {
        if self.client.authenticate_federated().await?.is_some() {
            navigate(DASHBOARD_PATH);
        }
        Ok(())
    }

    /// Sign out and leave the protected area, regardless of what the
    /// provider said about it.
    pub async fn sign_out(&self) {
        match self.client.sign_out().await {
            Ok(()) => tracing::info!("signed out"),
            Err(err) => tracing::error!("sign-out failed: {err}"),
        }
        navigate(ROOT_PATH);
    }
}

fn navigate(path: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
    #[cfg(all(not(target_arch = "wasm32"), test))]
    test_support::record_navigation(path);
    #[cfg(all(not(target_arch = "wasm32"), not(test)))]
    tracing::debug!("navigation to {path} requested outside the browser");
}

#[cfg(test)]
mod test_support {
    use std::cell::RefCell;

    thread_local! {
        static NAVIGATIONS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    pub(super) fn record_navigation(path: &str) {
        NAVIGATIONS.with(|n| n.borrow_mut().push(path.to_string()));
    }

    pub(super) fn take_navigations() -> Vec<String> {
        NAVIGATIONS.with(|n| n.borrow_mut().drain(..).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::take_navigations;
    use super::*;
    use identity::{AuthError, MockIdentityProvider};
    use std::sync::Arc;

    fn ops_over(mock: MockIdentityProvider) -> SessionOps {
        SessionOps::new(AuthClient::new(Arc::new(mock)))
    }

    #[tokio::test]
    async fn register_lands_on_the_dashboard() {
        let ops = ops_over(MockIdentityProvider::new());
        ops.register("a@b.com", "123456", "A", "B")
            .await
            .expect("registration should succeed");
        assert_eq!(take_navigations(), vec![DASHBOARD_PATH.to_string()]);
    }

    #[tokio::test]
    async fn failed_register_stays_put_and_surfaces_the_error() {
        let ops = ops_over(MockIdentityProvider::new().with_account("a@b.com", "123456", None));
        let result = ops.register("a@b.com", "123456", "A", "B").await;
        assert_eq!(result, Err(AuthError::EmailAlreadyInUse));
        assert!(take_navigations().is_empty());
    }

    #[tokio::test]
    async fn failed_sign_in_stays_put_and_surfaces_the_error() {
        let ops = ops_over(MockIdentityProvider::new().with_account("a@b.com", "123456", None));
        let result = ops.authenticate("a@b.com", "wrong").await;
        assert_eq!(result, Err(AuthError::InvalidCredential));
        assert!(take_navigations().is_empty());
    }

    #[tokio::test]
    async fn sign_out_navigates_to_root_on_success() {
        let ops = ops_over(MockIdentityProvider::new().with_account("a@b.com", "123456", None));
        ops.authenticate("a@b.com", "123456")
            .await
            .expect("sign-in should succeed");
        ops.sign_out().await;
        assert_eq!(
            take_navigations(),
            vec![DASHBOARD_PATH.to_string(), ROOT_PATH.to_string()]
        );
    }

    #[tokio::test]
    async fn sign_out_navigates_to_root_even_when_the_provider_rejects() {
        let ops = ops_over(
            MockIdentityProvider::new()
                .fail_sign_out(AuthError::Network("connection reset".to_string())),
        );
        ops.sign_out().await;
        assert_eq!(take_navigations(), vec![ROOT_PATH.to_string()]);
    }

    #[tokio::test]
    async fn federated_handoff_without_identity_does_not_navigate() {
        let ops = ops_over(MockIdentityProvider::new());
        ops.authenticate_federated()
            .await
            .expect("handoff should succeed");
        assert!(take_navigations().is_empty());
    }

    #[tokio::test]
    async fn federated_identity_lands_on_the_dashboard() {
        let identity = Identity {
            uid: "fed-1".to_string(),
            display_name: Some("Fed User".to_string()),
            email: Some("fed@example.com".to_string()),
        };
        let ops = ops_over(
            MockIdentityProvider::new().with_federated_result(Ok(Some(identity))),
        );
        ops.authenticate_federated()
            .await
            .expect("popup sign-in should succeed");
        assert_eq!(take_navigations(), vec![DASHBOARD_PATH.to_string()]);
    }

    #[test]
    fn phase_is_loading_until_resolved() {
        let state = AuthState::default();
        assert_eq!(state.phase(), AuthPhase::Loading);

        let resolved_out = AuthState {
            user: None,
            resolved: true,
        };
        assert_eq!(resolved_out.phase(), AuthPhase::SignedOut);

        let resolved_in = AuthState {
            user: Some(Identity {
                uid: "u1".to_string(),
                display_name: None,
                email: None,
            }),
            resolved: true,
        };
        assert_eq!(resolved_in.phase(), AuthPhase::SignedIn);
    }
}
