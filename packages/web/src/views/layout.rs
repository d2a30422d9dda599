use dioxus::prelude::*;
use ui::{Navbar, ProtectedRoute};

use crate::Route;

#[component]
pub fn SiteLayout() -> Element {
    rsx! {
        Navbar {}
        main {
            class: "page",
            Outlet::<Route> {}
        }
        footer {
            class: "footer",
            p { "Built with Rust and Dioxus." }
        }
    }
}

/// Shell for every `/admin/*` page; only admins get past the guard.
#[component]
pub fn AdminLayout() -> Element {
    rsx! {
        ProtectedRoute {
            admin_only: true,
            div {
                class: "admin",
                nav {
                    class: "admin-tabs",
                    Link { to: Route::AdminProjects {}, active_class: "active", "Projects" }
                    Link { to: Route::AdminExperiences {}, active_class: "active", "Experiences" }
                }
                Outlet::<Route> {}
            }
        }
    }
}
