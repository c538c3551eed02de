//! Protected dashboard page.
//!
//! Renders user-specific content only for an established session: while the
//! initial check is in flight it shows a placeholder, and signed-out
//! visitors are sent back to the auth page by the guard effect.

use dioxus::prelude::*;

use ui::{use_auth, use_require_session, use_session, AuthPhase};

#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();
    let session = use_session();

    use_require_session();

    let handle_sign_out = move |_| {
        let session = session.clone();
        spawn(async move {
            session.sign_out().await;
        });
    };

    let state = auth();
    match state.phase() {
        AuthPhase::Loading => rsx! {
            h2 { class: "h-screen w-full flex items-center justify-center", "Loading..." }
        },
        // The guard effect is navigating away; render nothing in between.
        AuthPhase::SignedOut => rsx! {},
        AuthPhase::SignedIn => {
            let Some(user) = state.user else {
                return rsx! {};
            };
            let name = user.display_name.clone().unwrap_or_else(|| "User".to_string());
            rsx! {
                div { class: "h-screen w-full flex items-center justify-center flex-col gap-4",
                    h1 { class: "text-4xl uppercase font-black", "Dashboard" }
                    div { class: "text-center",
                        h2 { class: "text-2xl font-bold mb-2", "Welcome, {name}!" }
                        if let Some(email) = user.email {
                            p { class: "text-gray-600", "{email}" }
                        }
                    }
                    button {
                        r#type: "button",
                        class: "bg-slate-900 px-6 py-2 text-white rounded-md hover:bg-blue-700 transition-colors",
                        onclick: handle_sign_out,
                        "Sign Out"
                    }
                }
            }
        }
    }
}
