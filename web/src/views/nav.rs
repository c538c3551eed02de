//! Fixed top navigation bar.

use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaEnvelope, FaHouse, FaUser, FaUserGroup};
use dioxus_free_icons::Icon;

use crate::Route;

/// Layout wrapper: the nav bar above whatever view the route resolves to.
#[component]
pub fn NavLayout() -> Element {
    rsx! {
        Nav {}
        Outlet::<Route> {}
    }
}

#[component]
fn Nav() -> Element {
    let nav = use_navigator();
    let current: Route = use_route();

    let link_class = |route: &Route| {
        if *route == current {
            "flex items-center gap-2 text-[14px] text-red-700"
        } else {
            "flex items-center gap-2 text-[14px] text-gray-700 hover:text-red-500"
        }
    };

    let entries = [
        ("Home", Route::Home {}, rsx! { Icon { icon: FaHouse } }),
        ("Contact", Route::Contact {}, rsx! { Icon { icon: FaEnvelope } }),
        ("About", Route::About {}, rsx! { Icon { icon: FaUserGroup } }),
    ];

    rsx! {
        nav { class: "fixed top-0 left-0 z-50 w-full h-[50px] shadow-md bg-white p-3",
            div { class: "w-full h-full flex items-center justify-between",
                ul { class: "flex items-center gap-5",
                    for (label, route, icon) in entries {
                        li { key: "{label}",
                            Link {
                                class: link_class(&route),
                                to: route.clone(),
                                {icon}
                                span { "{label}" }
                            }
                        }
                    }
                }
                button {
                    r#type: "button",
                    class: "ml-auto bg-gray-200 hover:bg-gray-300 text-gray-700 cursor-pointer p-2 rounded-full flex items-center justify-center",
                    onclick: move |_| {
                        nav.push(Route::SignInAndUp {});
                    },
                    Icon { icon: FaUser }
                }
            }
        }
    }
}
