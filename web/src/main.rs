use std::sync::Arc;

use dioxus::prelude::*;

use identity::{AuthClient, RestIdentityProvider};
use ui::AuthProvider;
use views::{About, Contact, Dashboard, Home, NavLayout, SignInAndUp};

mod config;
mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(NavLayout)]
        #[route("/")]
        Home {},
        #[route("/contact")]
        Contact {},
        #[route("/about")]
        About {},
        #[route("/auth")]
        SignInAndUp {},
        #[route("/dashboard")]
        Dashboard {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // One explicitly constructed provider client for the whole app,
    // injected through context so tests can substitute their own.
    let client = use_hook(|| {
        AuthClient::new(Arc::new(RestIdentityProvider::new(config::provider())))
    });

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AuthProvider {
            client: client,
            Router::<Route> {}
        }
    }
}
