//! # Identity crate — client SDK for the managed identity provider
//!
//! Everything the UI knows about authentication goes through this crate. The
//! provider itself is an external managed service; this crate only wraps its
//! client-facing capability surface and caches what it reports back.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`AuthClient`] — the composite operations the session hook calls (register, authenticate, federated sign-in, sign-out) |
//! | [`error`] | [`AuthError`] taxonomy and the mapping from the provider's wire error codes |
//! | [`provider`] | The [`IdentityProvider`] capability trait and the [`SessionChanges`] subscription stream |
//! | [`rest`] | [`RestIdentityProvider`] — the HTTP implementation speaking the provider's Identity Toolkit wire format |
//! | [`mock`] | `mock` feature: an in-memory scripted provider for tests |
//!
//! The capability surface is deliberately small: create an account, update
//! the display name, sign in with a password, sign in through the provider's
//! hosted popup, sign out, and subscribe to session changes. Session
//! durability, token refresh, and password hashing are the provider's
//! business, not ours.

use serde::{Deserialize, Serialize};

pub mod client;
pub mod error;
pub mod provider;
pub mod rest;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

mod storage;

#[cfg(target_arch = "wasm32")]
mod popup;

pub use client::AuthClient;
pub use error::AuthError;
pub use provider::{IdentityProvider, SessionChanges};
pub use rest::{ProviderConfig, RestIdentityProvider};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockIdentityProvider;

/// Provider-issued representation of the authenticated user.
///
/// The provider owns this record; we hold an eventually-consistent copy that
/// is overwritten on every session-change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier assigned by the provider.
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}
