//! Scripted in-memory provider for tests.
//!
//! Records every capability call so tests can assert which provider
//! operations ran (and in what order), and lets individual operations be
//! scripted to fail.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AuthError;
use crate::provider::{Broadcaster, IdentityProvider, SessionChanges};
use crate::Identity;

struct MockAccount {
    uid: String,
    email: String,
    password: String,
    display_name: Option<String>,
    disabled: bool,
}

impl MockAccount {
    fn identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            display_name: self.display_name.clone(),
            email: Some(self.email.clone()),
        }
    }
}

#[derive(Default)]
struct MockState {
    accounts: Vec<MockAccount>,
    signed_in: Option<usize>,
}

pub struct MockIdentityProvider {
    state: Mutex<MockState>,
    broadcaster: Broadcaster,
    calls: Mutex<Vec<String>>,
    next_uid: AtomicU64,
    sign_out_error: Mutex<Option<AuthError>>,
    federated: Mutex<Result<Option<Identity>, AuthError>>,
    initial_session: Mutex<Option<Identity>>,
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            broadcaster: Broadcaster::new(),
            calls: Mutex::new(Vec::new()),
            next_uid: AtomicU64::new(1),
            sign_out_error: Mutex::new(None),
            federated: Mutex::new(Ok(None)),
            initial_session: Mutex::new(None),
        }
    }

    /// Pre-provision an account the way the provider would hold it.
    pub fn with_account(self, email: &str, password: &str, display_name: Option<&str>) -> Self {
        let uid = self.fresh_uid();
        self.state.lock().unwrap().accounts.push(MockAccount {
            uid,
            email: email.to_string(),
            password: password.to_string(),
            display_name: display_name.map(str::to_string),
            disabled: false,
        });
        self
    }

    /// Pre-provision a disabled account.
    pub fn with_disabled_account(self, email: &str, password: &str) -> Self {
        let uid = self.fresh_uid();
        self.state.lock().unwrap().accounts.push(MockAccount {
            uid,
            email: email.to_string(),
            password: password.to_string(),
            display_name: None,
            disabled: true,
        });
        self
    }

    /// Script the next `sign_out` call to fail.
    pub fn fail_sign_out(self, error: AuthError) -> Self {
        *self.sign_out_error.lock().unwrap() = Some(error);
        self
    }

    /// Script the federated popup outcome.
    pub fn with_federated_result(self, result: Result<Option<Identity>, AuthError>) -> Self {
        *self.federated.lock().unwrap() = result;
        self
    }

    /// Script the session that `resolve_session` restores.
    pub fn with_initial_session(self, identity: Identity) -> Self {
        *self.initial_session.lock().unwrap() = Some(identity);
        self
    }

    /// Every capability call so far, in order, as `"name args"` strings.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn fresh_uid(&self) -> String {
        format!("mock-{}", self.next_uid.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait(?Send)]
impl IdentityProvider for MockIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.record(format!("create_account {email}"));
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.len() < 6 {
            return Err(AuthError::WeakPassword);
        }
        let uid = self.fresh_uid();
        let mut state = self.state.lock().unwrap();
        if state.accounts.iter().any(|a| a.email == email) {
            return Err(AuthError::EmailAlreadyInUse);
        }
        state.accounts.push(MockAccount {
            uid,
            email: email.to_string(),
            password: password.to_string(),
            display_name: None,
            disabled: false,
        });
        let index = state.accounts.len() - 1;
        state.signed_in = Some(index);
        let identity = state.accounts[index].identity();
        drop(state);
        self.broadcaster.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn update_display_name(&self, display_name: &str) -> Result<Identity, AuthError> {
        self.record(format!("update_display_name {display_name}"));
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.signed_in else {
            return Err(AuthError::Provider("no active session to update".to_string()));
        };
        state.accounts[index].display_name = Some(display_name.to_string());
        let identity = state.accounts[index].identity();
        drop(state);
        self.broadcaster.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        self.record(format!("sign_in_with_password {email}"));
        let mut state = self.state.lock().unwrap();
        let Some(index) = state
            .accounts
            .iter()
            .position(|a| a.email == email && a.password == password)
        else {
            return Err(AuthError::InvalidCredential);
        };
        if state.accounts[index].disabled {
            return Err(AuthError::UserDisabled);
        }
        state.signed_in = Some(index);
        let identity = state.accounts[index].identity();
        drop(state);
        self.broadcaster.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_popup(&self) -> Result<Option<Identity>, AuthError> {
        self.record("sign_in_with_popup".to_string());
        let result = self.federated.lock().unwrap().clone();
        if let Ok(Some(identity)) = &result {
            self.broadcaster.publish(Some(identity.clone()));
        }
        result
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.record("sign_out".to_string());
        if let Some(error) = self.sign_out_error.lock().unwrap().take() {
            return Err(error);
        }
        self.state.lock().unwrap().signed_in = None;
        self.broadcaster.publish(None);
        Ok(())
    }

    async fn resolve_session(&self) {
        self.record("resolve_session".to_string());
        let initial = self.initial_session.lock().unwrap().clone();
        self.broadcaster.publish(initial);
    }

    fn session_changes(&self) -> SessionChanges {
        self.broadcaster.subscribe()
    }

    fn current_session(&self) -> Option<Identity> {
        self.broadcaster.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let mock = MockIdentityProvider::new().with_account("a@b.com", "123456", None);
        let result = mock.create_account("a@b.com", "secret99").await;
        assert_eq!(result, Err(AuthError::EmailAlreadyInUse));
    }

    #[tokio::test]
    async fn disabled_account_cannot_sign_in() {
        let mock = MockIdentityProvider::new().with_disabled_account("a@b.com", "123456");
        let result = mock.sign_in_with_password("a@b.com", "123456").await;
        assert_eq!(result, Err(AuthError::UserDisabled));
        assert_eq!(mock.current_session(), None);
    }

    #[tokio::test]
    async fn wrong_password_is_an_invalid_credential() {
        let mock = MockIdentityProvider::new().with_account("a@b.com", "123456", None);
        let result = mock.sign_in_with_password("a@b.com", "wrong").await;
        assert_eq!(result, Err(AuthError::InvalidCredential));
    }
}
