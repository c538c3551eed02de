//! Landing page.

use dioxus::prelude::*;

#[component]
pub fn Home() -> Element {
    rsx! {
        section { class: "h-screen w-full flex items-center justify-center flex-col gap-2 pt-[50px]",
            h1 { class: "text-4xl font-bold text-gray-900", "Skylight" }
            p { class: "text-gray-600", "Sign in to see your dashboard." }
        }
    }
}
