//! About page.

use dioxus::prelude::*;

#[component]
pub fn About() -> Element {
    rsx! {
        section { class: "h-screen w-full flex items-center justify-center flex-col gap-2 pt-[50px]",
            h1 { class: "text-4xl font-bold text-gray-900", "About" }
            p { class: "text-gray-600", "A small dashboard behind a managed sign-in." }
        }
    }
}
