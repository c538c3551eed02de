//! Session hook and form-validation layer shared by the app's views.

mod auth;
pub use auth::{
    use_auth, use_redirect_if_authenticated, use_require_session, use_session, AuthPhase,
    AuthProvider, AuthState, SessionOps,
};

pub mod schema;
