//! Authentication context and hooks for the UI.
//!
//! [`AuthProvider`] owns the application's [`SessionStore`]: it initializes
//! it, drives its auth-change loop, mirrors its state into a signal and tears
//! it down when unmounted. Must sit inside a [`ToastProvider`](crate::ToastProvider).

use api::{AuthState, Backend, SessionStore};
use dioxus::prelude::*;

use crate::toast::use_toaster;

/// Current auth state. Re-renders the caller on every change.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

pub fn use_session_store() -> SessionStore<Backend> {
    use_context::<SessionStore<Backend>>()
}

/// Remote Data Service shared by every page.
pub fn use_backend() -> Backend {
    use_session_store().backend().clone()
}

#[component]
pub fn AuthProvider(children: Element) -> Element {
    let toaster = use_toaster();
    let store = use_context_provider(|| SessionStore::new(Backend::from_env()));
    let mut auth = use_context_provider(|| Signal::new(store.state()));

    let mirror = store.clone();
    use_future(move || {
        let store = mirror.clone();
        async move {
            let mut rx = store.watch();
            loop {
                let snapshot = rx.borrow_and_update().clone();
                auth.set(snapshot);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    let runner = store.clone();
    use_future(move || {
        let store = runner.clone();
        async move { store.run().await }
    });

    let init = store.clone();
    use_future(move || {
        let store = init.clone();
        async move {
            if let Err(e) = store.initialize().await {
                toaster.error(e.to_string());
            }
        }
    });

    use_drop(move || store.teardown());

    rsx! {
        {children}
    }
}

/// Signs out, then reloads the app at `/`.
#[component]
pub fn SignOutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let store = use_session_store();
    let toaster = use_toaster();
    #[cfg(not(target_arch = "wasm32"))]
    let nav = use_navigator();

    let onclick = move |_| {
        let store = store.clone();
        async move {
            if let Err(e) = store.sign_out().await {
                toaster.error(e.to_string());
            }
            #[cfg(target_arch = "wasm32")]
            {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href("/");
                }
            }
            #[cfg(not(target_arch = "wasm32"))]
            nav.replace("/");
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
