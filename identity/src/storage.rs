//! Session-token persistence.
//!
//! On wasm the ID token survives page reloads in `localStorage`, which is
//! what lets `resolve_session` restore a session after a refresh. Other
//! targets keep the token in the provider instance only, so there is nothing
//! to persist here.

#[cfg(target_arch = "wasm32")]
const TOKEN_KEY: &str = "skylight.id_token";

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn load_token() -> Option<String> {
    local_storage()?.get_item(TOKEN_KEY).ok().flatten()
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn save_token(token: &str) {
    if let Some(storage) = local_storage() {
        if let Err(err) = storage.set_item(TOKEN_KEY, token) {
            tracing::warn!("failed to persist session token: {err:?}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn clear_token() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn load_token() -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn save_token(_token: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn clear_token() {}
