//! Combined sign-in / sign-up page.
//!
//! One form, two modes. Submitting validates the draft against the mode's
//! schema first; the provider is only called on a clean draft. Provider
//! failures surface as a single form-level message, with the
//! credential-rejection case worded for humans.

use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_brands_icons::FaGoogle;
use dioxus_free_icons::Icon;

use identity::AuthError;
use ui::schema::{self, Field, FieldErrors, FormDraft};
use ui::{use_auth, use_redirect_if_authenticated, use_session, AuthPhase};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const GENERIC_SIGN_IN_ERROR: &str = "An error occurred during sign in";
const GENERIC_SIGN_UP_ERROR: &str = "An error occurred during sign up";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMode {
    SignIn,
    SignUp,
}

#[component]
pub fn SignInAndUp() -> Element {
    let auth = use_auth();
    let session = use_session();

    let mut mode = use_signal(|| FormMode::SignIn);
    let mut draft = use_signal(FormDraft::default);
    let mut errors = use_signal(FieldErrors::default);
    let mut auth_error = use_signal(|| Option::<String>::None);
    let mut submitting = use_signal(|| false);

    // Already signed in, now or mid-visit: leave for the dashboard.
    use_redirect_if_authenticated();

    let toggle_mode = move |_| {
        mode.set(match mode() {
            FormMode::SignIn => FormMode::SignUp,
            FormMode::SignUp => FormMode::SignIn,
        });
        draft.set(FormDraft::default());
        errors.set(FieldErrors::default());
        auth_error.set(None);
    };

    let submit_session = session.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let session = submit_session.clone();
        spawn(async move {
            errors.set(FieldErrors::default());
            auth_error.set(None);
            let current = draft();
            let current_mode = mode();

            // The provider is never called on a draft that fails validation.
            if let Err(violations) = checked_draft(current_mode, &current) {
                errors.set(violations);
                return;
            }

            submitting.set(true);
            let result = match current_mode {
                FormMode::SignUp => session
                    .register(
                        current.email.trim(),
                        &current.password,
                        current.first_name.trim(),
                        current.last_name.trim(),
                    )
                    .await
                    .map_err(|err| sign_up_message(&err)),
                FormMode::SignIn => session
                    .authenticate(current.email.trim(), &current.password)
                    .await
                    .map_err(|err| sign_in_message(&err)),
            };
            submitting.set(false);
            match result {
                Ok(()) => draft.set(FormDraft::default()),
                Err(message) => auth_error.set(Some(message)),
            }
        });
    };

    let federated_session = session;
    let handle_federated = move |_| {
        let session = federated_session.clone();
        spawn(async move {
            match session.authenticate_federated().await {
                Ok(()) => {}
                Err(AuthError::PopupClosed) => {
                    tracing::debug!("federated sign-in popup closed");
                }
                Err(err) => {
                    tracing::error!("federated sign-in failed: {err}");
                    auth_error.set(Some(GENERIC_SIGN_IN_ERROR.to_string()));
                }
            }
        });
    };

    let state = auth();
    match state.phase() {
        AuthPhase::Loading => rsx! {
            h2 { class: "h-screen w-full flex items-center justify-center", "Loading..." }
        },
        // The guard effect is navigating away; render nothing in between.
        AuthPhase::SignedIn => rsx! {},
        AuthPhase::SignedOut => {
            let current_errors = errors();
            let is_sign_up = mode() == FormMode::SignUp;
            let submit_label = match (is_sign_up, submitting()) {
                (true, true) => "Creating account...",
                (true, false) => "Sign up",
                (false, true) => "Signing in...",
                (false, false) => "Sign in",
            };
            rsx! {
                section { class: "h-screen w-full flex items-center justify-center flex-col gap-2",
                    form {
                        class: "flex flex-col gap-2 bg-slate-50 p-5 rounded-md shadow-md",
                        onsubmit: handle_submit,

                        h1 { class: "text-center text-gray-900 text-4xl mb-3 font-bold",
                            if is_sign_up { "Sign up" } else { "Sign in" }
                        }

                        if is_sign_up {
                            label { r#for: "first_name", class: "text-slate-900", "First Name" }
                            input {
                                id: "first_name",
                                r#type: "text",
                                class: "h-10 border border-slate-900 rounded-md p-4",
                                value: draft().first_name,
                                oninput: move |evt: FormEvent| draft.with_mut(|d| d.first_name = evt.value()),
                            }
                            if let Some(message) = current_errors.get(Field::FirstName) {
                                p { class: "text-red-500", "{message}" }
                            }

                            label { r#for: "last_name", class: "text-slate-900", "Last Name" }
                            input {
                                id: "last_name",
                                r#type: "text",
                                class: "h-10 border border-slate-900 rounded-md p-4",
                                value: draft().last_name,
                                oninput: move |evt: FormEvent| draft.with_mut(|d| d.last_name = evt.value()),
                            }
                            if let Some(message) = current_errors.get(Field::LastName) {
                                p { class: "text-red-500", "{message}" }
                            }
                        }

                        label { r#for: "email", class: "text-slate-900", "Email" }
                        input {
                            id: "email",
                            r#type: "email",
                            class: "h-10 border border-slate-900 rounded-md p-4",
                            value: draft().email,
                            oninput: move |evt: FormEvent| draft.with_mut(|d| d.email = evt.value()),
                        }
                        if let Some(message) = current_errors.get(Field::Email) {
                            p { class: "text-red-500", "{message}" }
                        }

                        label { r#for: "password", class: "text-slate-900", "Password" }
                        input {
                            id: "password",
                            r#type: "password",
                            class: "h-10 border border-slate-900 rounded-md p-4",
                            value: draft().password,
                            oninput: move |evt: FormEvent| draft.with_mut(|d| d.password = evt.value()),
                        }
                        if let Some(message) = current_errors.get(Field::Password) {
                            p { class: "text-red-500", "{message}" }
                        }

                        if let Some(message) = auth_error() {
                            p { class: "text-red-500 mt-2 text-center", "{message}" }
                        }

                        button {
                            r#type: "submit",
                            disabled: submitting(),
                            class: "bg-gray-600 text-white py-2 rounded-md hover:bg-gray-700 transition-colors",
                            "{submit_label}"
                        }

                        button {
                            r#type: "button",
                            class: "text-red-500 hover:text-red-900 transition-colors",
                            onclick: toggle_mode,
                            if is_sign_up { "Already have an account? Log in" } else { "No account? Create an account" }
                        }
                    }

                    button {
                        r#type: "button",
                        class: "bg-gray-200 hover:bg-gray-300 rounded-md text-gray-800 p-2 flex items-center gap-2 transition-colors mt-4",
                        onclick: handle_federated,
                        Icon { icon: FaGoogle }
                        span {
                            if is_sign_up { "Sign up with Google" } else { "Sign in with Google" }
                        }
                    }
                }
            }
        }
    }
}

/// Validate the draft against the active mode's schema. A submit only
/// reaches the provider when this returns `Ok`.
fn checked_draft(mode: FormMode, draft: &FormDraft) -> Result<(), FieldErrors> {
    match mode {
        FormMode::SignUp => schema::SIGN_UP.validate(draft),
        FormMode::SignIn => schema::SIGN_IN.validate(draft),
    }
}

fn sign_in_message(err: &AuthError) -> String {
    if err.is_invalid_credential() {
        INVALID_CREDENTIALS.to_string()
    } else {
        GENERIC_SIGN_IN_ERROR.to_string()
    }
}

fn sign_up_message(err: &AuthError) -> String {
    match err {
        AuthError::EmailAlreadyInUse => "An account with this email already exists".to_string(),
        AuthError::WeakPassword => "Password must be at least 6 characters".to_string(),
        AuthError::InvalidEmail => "Invalid email".to_string(),
        _ => GENERIC_SIGN_UP_ERROR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_submit_is_blocked_by_any_violation() {
        let draft = FormDraft {
            email: "a@b.com".to_string(),
            password: "123456".to_string(),
            first_name: "A".to_string(),
            last_name: String::new(),
        };
        let violations = checked_draft(FormMode::SignUp, &draft)
            .expect_err("missing last name must block the submit");
        assert!(!violations.is_empty());
    }

    #[test]
    fn sign_in_submit_only_checks_the_credentials() {
        let draft = FormDraft {
            email: "a@b.com".to_string(),
            password: "123456".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(checked_draft(FormMode::SignIn, &draft).is_ok());
        assert!(checked_draft(FormMode::SignUp, &draft).is_err());
    }

    #[test]
    fn invalid_credentials_get_the_friendly_message() {
        assert_eq!(sign_in_message(&AuthError::InvalidCredential), INVALID_CREDENTIALS);
    }

    #[test]
    fn other_sign_in_failures_get_the_generic_message() {
        assert_eq!(
            sign_in_message(&AuthError::Network("timeout".to_string())),
            GENERIC_SIGN_IN_ERROR
        );
        assert_eq!(sign_in_message(&AuthError::UserDisabled), GENERIC_SIGN_IN_ERROR);
    }

    #[test]
    fn sign_up_failures_name_the_cause_when_known() {
        assert_eq!(
            sign_up_message(&AuthError::EmailAlreadyInUse),
            "An account with this email already exists"
        );
        assert_eq!(
            sign_up_message(&AuthError::Provider("FLAKY".to_string())),
            GENERIC_SIGN_UP_ERROR
        );
    }
}
