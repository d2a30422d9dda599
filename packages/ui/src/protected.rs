use api::{decide, GuardDecision};
use dioxus::prelude::*;

use crate::auth::use_auth;

/// Renders `children` only when the guard allows it; otherwise redirects.
///
/// Re-evaluated on every auth state change. Navigation is its only side effect.
#[component]
pub fn ProtectedRoute(#[props(default)] admin_only: bool, children: Element) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if let GuardDecision::Redirect(target) = decide(&auth.read(), admin_only) {
            tracing::debug!(path = target.path(), "Guard redirect");
            nav.replace(target.path());
        }
    });

    let decision = decide(&auth.read(), admin_only);
    match decision {
        GuardDecision::Wait => rsx! {
            div { class: "guard-wait", "Loading..." }
        },
        GuardDecision::Redirect(_) => rsx! {},
        GuardDecision::Render => children,
    }
}
