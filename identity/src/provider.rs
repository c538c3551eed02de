//! The identity provider capability surface.
//!
//! [`IdentityProvider`] is the seam between the UI and whatever actually
//! verifies credentials: the REST implementation in production, the scripted
//! mock in tests. Implementations push every session change (including the
//! initial resolution) to all [`SessionChanges`] subscribers.

use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::Stream;

use crate::error::AuthError;
use crate::Identity;

/// Client-facing capabilities of the external identity provider.
///
/// Object-safe so the session hook can hold an `Arc<dyn IdentityProvider>`
/// injected at construction time instead of reaching for a global.
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Create an account with the given credentials and sign it in.
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Set the display name on the currently signed-in account.
    async fn update_display_name(&self, display_name: &str) -> Result<Identity, AuthError>;

    /// Password sign-in.
    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<Identity, AuthError>;

    /// Federated sign-in through the provider-hosted popup flow.
    ///
    /// `Ok(None)` means the flow was handed off without an immediate result
    /// (the native targets open the system browser); a later session-change
    /// notification carries the outcome, if any.
    async fn sign_in_with_popup(&self) -> Result<Option<Identity>, AuthError>;

    /// Sign the current session out.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Resolve any persisted session and broadcast the result, present or
    /// absent, to all subscribers.
    async fn resolve_session(&self);

    /// Subscribe to session changes. Dropping the stream unsubscribes.
    fn session_changes(&self) -> SessionChanges;

    /// The cached session, if one is established.
    fn current_session(&self) -> Option<Identity>;
}

/// Stream of session-change notifications.
///
/// Yields the full new session state (`Some` identity or `None`) on every
/// change. Subscribers that attach after the initial resolution receive the
/// current state as their first item.
pub struct SessionChanges {
    rx: mpsc::UnboundedReceiver<Option<Identity>>,
}

impl Stream for SessionChanges {
    type Item = Option<Identity>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

/// Fan-out registry for session-change notifications.
///
/// Shared by the provider implementations: they publish into it whenever the
/// cached session changes, and it prunes subscribers whose stream has been
/// dropped.
pub(crate) struct Broadcaster {
    inner: Mutex<BroadcasterInner>,
}

struct BroadcasterInner {
    session: Option<Identity>,
    resolved: bool,
    senders: Vec<mpsc::UnboundedSender<Option<Identity>>>,
}

impl Broadcaster {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(BroadcasterInner {
                session: None,
                resolved: false,
                senders: Vec::new(),
            }),
        }
    }

    pub(crate) fn subscribe(&self) -> SessionChanges {
        let (tx, rx) = mpsc::unbounded();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.resolved {
            let _ = tx.unbounded_send(inner.session.clone());
        }
        inner.senders.push(tx);
        SessionChanges { rx }
    }

    /// Overwrite the cached session and notify every live subscriber.
    pub(crate) fn publish(&self, session: Option<Identity>) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.session = session.clone();
        inner.resolved = true;
        inner
            .senders
            .retain(|tx| tx.unbounded_send(session.clone()).is_ok());
    }

    pub(crate) fn current(&self) -> Option<Identity> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .session
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn identity(uid: &str) -> Identity {
        Identity {
            uid: uid.to_string(),
            display_name: None,
            email: Some(format!("{uid}@example.com")),
        }
    }

    #[tokio::test]
    async fn publish_reaches_existing_subscribers() {
        let broadcaster = Broadcaster::new();
        let mut changes = broadcaster.subscribe();

        broadcaster.publish(Some(identity("u1")));
        assert_eq!(changes.next().await, Some(Some(identity("u1"))));

        broadcaster.publish(None);
        assert_eq!(changes.next().await, Some(None));
        assert_eq!(broadcaster.current(), None);
    }

    #[tokio::test]
    async fn late_subscriber_receives_current_state_first() {
        let broadcaster = Broadcaster::new();
        broadcaster.publish(Some(identity("u2")));

        let mut changes = broadcaster.subscribe();
        assert_eq!(changes.next().await, Some(Some(identity("u2"))));
    }

    #[tokio::test]
    async fn unresolved_broadcaster_sends_nothing_on_subscribe() {
        let broadcaster = Broadcaster::new();
        let mut changes = broadcaster.subscribe();

        // Nothing published yet, so the stream must be pending, not ready
        // with a stale `None`.
        assert!(futures::poll!(changes.next()).is_pending());
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned() {
        let broadcaster = Broadcaster::new();
        let changes = broadcaster.subscribe();
        drop(changes);

        // Must not panic or grow the registry unboundedly.
        broadcaster.publish(None);
        let inner = broadcaster.inner.lock().unwrap();
        assert!(inner.senders.is_empty());
    }
}
