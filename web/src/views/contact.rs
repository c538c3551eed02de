//! Contact page.

use dioxus::prelude::*;

#[component]
pub fn Contact() -> Element {
    rsx! {
        section { class: "h-screen w-full flex items-center justify-center flex-col gap-2 pt-[50px]",
            h1 { class: "text-4xl font-bold text-gray-900", "Contact" }
            p { class: "text-gray-600", "team@skylight.example" }
        }
    }
}
