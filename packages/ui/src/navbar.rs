use dioxus::prelude::*;

use crate::auth::{use_auth, SignOutButton};

const PUBLIC_LINKS: [(&str, &str); 5] = [
    ("/", "Home"),
    ("/projects", "Projects"),
    ("/skills", "Skills"),
    ("/experience", "Experience"),
    ("/contact", "Contact"),
];

/// Site header. Admin links appear only for admins.
#[component]
pub fn Navbar() -> Element {
    let auth = use_auth();
    let (signed_in, is_admin, email) = {
        let state = auth.read();
        (
            state.user.is_some(),
            state.is_admin,
            state.email().unwrap_or_default().to_string(),
        )
    };

    rsx! {
        nav {
            class: "navbar",
            Link { class: "navbar-brand", to: "/", "Portfolio" }
            div {
                class: "navbar-links",
                for (href, label) in PUBLIC_LINKS {
                    Link { key: "{href}", to: href, active_class: "active", "{label}" }
                }
                if is_admin {
                    Link { to: "/admin/projects", active_class: "active", "Admin" }
                }
            }
            div {
                class: "navbar-auth",
                if signed_in {
                    span { class: "navbar-email", "{email}" }
                    SignOutButton { class: "btn btn-outline" }
                } else {
                    Link { class: "btn btn-primary", to: "/login", "Sign in" }
                }
            }
        }
    }
}
