//! REST implementation of the identity provider client.
//!
//! Speaks the provider's Identity Toolkit wire format: every operation is a
//! POST to `{api_origin}/v1/accounts:{action}?key={api_key}` with a JSON body,
//! and failures carry a wire error code in `error.message`. The signed-in ID
//! token is cached on the instance and persisted (wasm only) so the session
//! survives a reload; refreshing expired tokens is the provider's concern and
//! is not done here.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::AuthError;
use crate::provider::{Broadcaster, IdentityProvider, SessionChanges};
use crate::{storage, Identity};

const DEFAULT_API_ORIGIN: &str = "https://identitytoolkit.googleapis.com";

/// Connection settings for the managed identity provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub api_origin: String,
    /// Provider-hosted page for the federated popup flow. Federated sign-in
    /// is rejected when unset.
    pub federated_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            federated_url: None,
        }
    }

    /// Point the client at a different API origin (e.g. a local emulator).
    pub fn with_api_origin(mut self, origin: impl Into<String>) -> Self {
        self.api_origin = origin.into();
        self
    }

    pub fn with_federated_url(mut self, url: impl Into<String>) -> Self {
        self.federated_url = Some(url.into());
        self
    }
}

/// HTTP-backed [`IdentityProvider`].
pub struct RestIdentityProvider {
    config: ProviderConfig,
    http: reqwest::Client,
    broadcaster: Broadcaster,
    id_token: Mutex<Option<String>>,
}

impl RestIdentityProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            broadcaster: Broadcaster::new(),
            id_token: Mutex::new(None),
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<T, AuthError> {
        let url = format!(
            "{}/v1/accounts:{}?key={}",
            self.config.api_origin, action, self.config.api_key
        );
        let response = self.http.post(&url).json(&body).send().await?;
        if response.status().is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let status = response.status();
            match response.json::<ErrorBody>().await {
                Ok(body) => Err(AuthError::from_wire_code(&body.error.message)),
                Err(_) => Err(AuthError::Provider(format!("unexpected {status} response"))),
            }
        }
    }

    async fn lookup(&self, id_token: &str) -> Result<Identity, AuthError> {
        let response: LookupResponse = self.call("lookup", json!({ "idToken": id_token })).await?;
        let account = response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::Provider("lookup returned no account".to_string()))?;
        Ok(Identity {
            uid: account.local_id,
            display_name: account.display_name,
            email: account.email,
        })
    }

    fn token(&self) -> Option<String> {
        self.id_token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set_token(&self, token: Option<String>) {
        match &token {
            Some(token) => storage::save_token(token),
            None => storage::clear_token(),
        }
        *self.id_token.lock().unwrap_or_else(|e| e.into_inner()) = token;
    }

    /// Cache the new session and notify subscribers.
    fn establish(&self, identity: Identity, id_token: String) -> Identity {
        self.set_token(Some(id_token));
        self.broadcaster.publish(Some(identity.clone()));
        identity
    }
}

#[async_trait(?Send)]
impl IdentityProvider for RestIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let response: CredentialResponse = self
            .call(
                "signUp",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        let (identity, id_token) = response.into_parts();
        Ok(self.establish(identity, id_token))
    }

    async fn update_display_name(&self, display_name: &str) -> Result<Identity, AuthError> {
        let Some(id_token) = self.token() else {
            return Err(AuthError::Provider(
                "no active session to update".to_string(),
            ));
        };
        let response: UpdateResponse = self
            .call(
                "update",
                json!({
                    "idToken": id_token,
                    "displayName": display_name,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        // The provider rotates the token on profile updates when asked to.
        if let Some(new_token) = response.id_token {
            self.set_token(Some(new_token));
        }
        let identity = Identity {
            uid: response.local_id,
            display_name: response.display_name,
            email: response.email,
        };
        self.broadcaster.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let response: CredentialResponse = self
            .call(
                "signInWithPassword",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        let (identity, id_token) = response.into_parts();
        Ok(self.establish(identity, id_token))
    }

    #[cfg(target_arch = "wasm32")]
    async fn sign_in_with_popup(&self) -> Result<Option<Identity>, AuthError> {
        let Some(url) = self.config.federated_url.clone() else {
            return Err(AuthError::Provider(
                "federated sign-in is not configured".to_string(),
            ));
        };
        let id_token = crate::popup::open_and_wait(&url).await?;
        let identity = self.lookup(&id_token).await?;
        Ok(Some(self.establish(identity, id_token)))
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn sign_in_with_popup(&self) -> Result<Option<Identity>, AuthError> {
        let Some(url) = self.config.federated_url.clone() else {
            return Err(AuthError::Provider(
                "federated sign-in is not configured".to_string(),
            ));
        };
        // No popup outside the browser: hand off to the system browser. The
        // session stream reports the outcome if the flow completes elsewhere.
        open::that(&url).map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(None)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        tracing::debug!("discarding provider session token");
        self.set_token(None);
        self.broadcaster.publish(None);
        Ok(())
    }

    async fn resolve_session(&self) {
        let Some(id_token) = storage::load_token().or_else(|| self.token()) else {
            self.broadcaster.publish(None);
            return;
        };
        match self.lookup(&id_token).await {
            Ok(identity) => {
                self.set_token(Some(id_token));
                self.broadcaster.publish(Some(identity));
            }
            Err(err) => {
                tracing::warn!("persisted session rejected by provider: {err}");
                self.set_token(None);
                self.broadcaster.publish(None);
            }
        }
    }

    fn session_changes(&self) -> SessionChanges {
        self.broadcaster.subscribe()
    }

    fn current_session(&self) -> Option<Identity> {
        self.broadcaster.current()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialResponse {
    local_id: String,
    id_token: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

impl CredentialResponse {
    fn into_parts(self) -> (Identity, String) {
        (
            Identity {
                uid: self.local_id,
                display_name: self.display_name,
                email: self.email,
            },
            self.id_token,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    local_id: String,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_credential_response() {
        let response: CredentialResponse = serde_json::from_value(json!({
            "localId": "abc123",
            "idToken": "token-1",
            "email": "a@b.com",
            "refreshToken": "ignored",
            "expiresIn": "3600",
        }))
        .expect("credential payload should parse");
        let (identity, id_token) = response.into_parts();
        assert_eq!(identity.uid, "abc123");
        assert_eq!(identity.email.as_deref(), Some("a@b.com"));
        assert_eq!(identity.display_name, None);
        assert_eq!(id_token, "token-1");
    }

    #[test]
    fn parses_wire_error_body() {
        let body: ErrorBody = serde_json::from_value(json!({
            "error": { "code": 400, "message": "EMAIL_EXISTS", "errors": [] }
        }))
        .expect("error payload should parse");
        assert_eq!(
            AuthError::from_wire_code(&body.error.message),
            AuthError::EmailAlreadyInUse
        );
    }

    #[test]
    fn lookup_response_tolerates_missing_users() {
        let response: LookupResponse =
            serde_json::from_value(json!({ "kind": "identitytoolkit#GetAccountInfoResponse" }))
                .expect("empty lookup payload should parse");
        assert!(response.users.is_empty());
    }
}
