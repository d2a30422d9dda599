//! Account registration page.

use api::{register, AppError};
use dioxus::prelude::*;
use store::RegisterForm;
use ui::components::{Button, ButtonVariant, Field, Input};
use ui::{use_auth, use_backend, use_toaster};

use crate::Route;

#[component]
pub fn Register() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toaster = use_toaster();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    use_effect(move || {
        if api::leave_auth_page(&auth.read(), loading()) {
            nav.replace(Route::AdminProjects {});
        }
    });

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            let form = RegisterForm {
                email: email(),
                password: password(),
                confirm_password: confirm_password(),
            };

            loading.set(true);
            let outcome = register(&backend, &form).await;
            loading.set(false);
            match outcome {
                Ok(registration) => {
                    if let Some(e) = registration.profile_error {
                        toaster.error(format!("Account created, but the profile could not be saved: {e}"));
                    } else if auth.peek().user.is_some() {
                        toaster.success("Account created.");
                    } else {
                        toaster.success("Account created. Please sign in.");
                    }
                    nav.push(Route::Login {});
                }
                Err(AppError::Validation(e)) => error.set(Some(e.to_string())),
                Err(e) => {
                    error.set(Some(e.to_string()));
                    toaster.error(e.to_string());
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",
            form {
                class: "card auth-card",
                onsubmit: handle_register,
                h1 { "Create Account" }
                p { class: "muted", "Register to manage the portfolio" }

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }

                Field { label: "Email", html_for: "register-email",
                    Input {
                        id: "register-email",
                        r#type: "email",
                        placeholder: "your@email.com",
                        value: email(),
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }
                }
                Field { label: "Password", html_for: "register-password",
                    Input {
                        id: "register-password",
                        r#type: "password",
                        placeholder: "At least 6 characters",
                        value: password(),
                        oninput: move |evt: FormEvent| password.set(evt.value()),
                    }
                }
                Field { label: "Confirm password", html_for: "register-confirm",
                    Input {
                        id: "register-confirm",
                        r#type: "password",
                        value: confirm_password(),
                        oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                    }
                }
                Button {
                    variant: ButtonVariant::Primary,
                    r#type: "submit",
                    class: "w-full",
                    disabled: loading(),
                    if loading() { "Creating account..." } else { "Sign up" }
                }
                p {
                    class: "muted",
                    "Already have an account? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
