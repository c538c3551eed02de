//! Authentication error taxonomy.
//!
//! Every failure the provider can report is folded into [`AuthError`]. The
//! REST implementation maps the provider's wire error codes (the
//! `error.message` field of a non-2xx response) onto these variants; codes we
//! do not recognize are preserved verbatim in [`AuthError::Provider`].

use thiserror::Error;

/// A failed call against the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("email is already in use")]
    EmailAlreadyInUse,
    #[error("password does not meet the provider's strength requirements")]
    WeakPassword,
    #[error("malformed email address")]
    InvalidEmail,
    #[error("invalid email or password")]
    InvalidCredential,
    #[error("account is disabled")]
    UserDisabled,
    #[error("sign-in popup was closed before completing")]
    PopupClosed,
    #[error("network error: {0}")]
    Network(String),
    #[error("provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// True for the credential-rejection case the sign-in form special-cases.
    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, AuthError::InvalidCredential)
    }

    /// Map a wire error code onto the taxonomy.
    ///
    /// The provider sometimes appends detail after the code, e.g.
    /// `"WEAK_PASSWORD : Password should be at least 6 characters"`; only the
    /// leading token is the code.
    pub(crate) fn from_wire_code(message: &str) -> Self {
        let code = message
            .split([' ', ':'])
            .next()
            .unwrap_or(message)
            .trim();
        match code {
            "EMAIL_EXISTS" => AuthError::EmailAlreadyInUse,
            "WEAK_PASSWORD" => AuthError::WeakPassword,
            "INVALID_EMAIL" | "MISSING_EMAIL" => AuthError::InvalidEmail,
            "INVALID_LOGIN_CREDENTIALS" | "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" => {
                AuthError::InvalidCredential
            }
            "USER_DISABLED" => AuthError::UserDisabled,
            _ => AuthError::Provider(message.to_string()),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_bare_wire_codes() {
        assert_eq!(
            AuthError::from_wire_code("EMAIL_EXISTS"),
            AuthError::EmailAlreadyInUse
        );
        assert_eq!(
            AuthError::from_wire_code("USER_DISABLED"),
            AuthError::UserDisabled
        );
        assert_eq!(
            AuthError::from_wire_code("INVALID_EMAIL"),
            AuthError::InvalidEmail
        );
    }

    #[test]
    fn maps_codes_with_trailing_detail() {
        assert_eq!(
            AuthError::from_wire_code("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthError::WeakPassword
        );
    }

    #[test]
    fn all_credential_rejections_collapse_to_one_variant() {
        for code in ["INVALID_LOGIN_CREDENTIALS", "EMAIL_NOT_FOUND", "INVALID_PASSWORD"] {
            let err = AuthError::from_wire_code(code);
            assert!(err.is_invalid_credential(), "{code} should map to InvalidCredential");
        }
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let err = AuthError::from_wire_code("TOO_MANY_ATTEMPTS_TRY_LATER");
        assert_eq!(
            err,
            AuthError::Provider("TOO_MANY_ATTEMPTS_TRY_LATER".to_string())
        );
        assert!(!err.is_invalid_credential());
    }
}
