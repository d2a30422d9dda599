//! Email/password sign-in.

use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, Field, Input};
use ui::{use_auth, use_session_store, use_toaster};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let store = use_session_store();
    let toaster = use_toaster();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    // Already signed in: go straight to the admin area.
    use_effect(move || {
        if api::leave_auth_page(&auth.read(), false) {
            nav.replace(Route::AdminProjects {});
        }
    });

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let store = store.clone();
        spawn(async move {
            match store.sign_in(&email(), &password()).await {
                Ok(()) => toaster.success("Welcome back!"),
                Err(e) => toaster.error(e.to_string()),
            }
        });
    };

    let busy = auth().loading;

    rsx! {
        div {
            class: "auth-page",
            form {
                class: "card auth-card",
                onsubmit: handle_submit,
                h1 { "Sign In" }
                p { class: "muted", "Log in to access the admin dashboard" }

                Field { label: "Email", html_for: "login-email",
                    Input {
                        id: "login-email",
                        r#type: "email",
                        placeholder: "your@email.com",
                        value: email(),
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }
                }
                Field { label: "Password", html_for: "login-password",
                    Input {
                        id: "login-password",
                        r#type: "password",
                        value: password(),
                        oninput: move |evt: FormEvent| password.set(evt.value()),
                    }
                }
                Button {
                    variant: ButtonVariant::Primary,
                    r#type: "submit",
                    class: "w-full",
                    disabled: busy,
                    if busy { "Signing in..." } else { "Sign In" }
                }
                p {
                    class: "muted",
                    "Don't have an account? "
                    Link { to: Route::Register {}, "Register" }
                }
            }
        }
    }
}
