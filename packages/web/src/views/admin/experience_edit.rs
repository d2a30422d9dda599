use api::catalog;
use dioxus::prelude::*;
use store::{ExperienceForm, FormMode, RemoteDataService};
use ui::{use_backend, use_toaster, ExperienceEditor};

use crate::Route;

#[component]
pub fn AddExperience() -> Element {
    rsx! {
        ExperiencePage { id: None }
    }
}

#[component]
pub fn EditExperience(id: String) -> Element {
    rsx! {
        ExperiencePage { key: "{id}", id: Some(id.clone()) }
    }
}

#[component]
fn ExperiencePage(id: Option<String>) -> Element {
    let backend = use_backend();
    let toaster = use_toaster();
    let nav = use_navigator();
    let mut busy = use_signal(|| false);

    let loader = backend.clone();
    let lookup = id.clone();
    let initial = use_resource(move || {
        let backend = loader.clone();
        let id = lookup.clone();
        async move {
            let Some(id) = id else {
                return Some(ExperienceForm::default());
            };
            match backend.get_experience(&id).await {
                Ok(exp) => Some(ExperienceForm::from_experience(&exp)),
                Err(e) => {
                    tracing::error!(%id, "Failed to load experience: {e}");
                    toaster.error(format!("Could not load experience: {e}"));
                    None
                }
            }
        }
    });

    let mode = if id.is_some() {
        FormMode::Edit
    } else {
        FormMode::Create
    };

    let on_submit = move |form: ExperienceForm| {
        let backend = backend.clone();
        let id = id.clone();
        spawn(async move {
            busy.set(true);
            let result = catalog::save_experience(&backend, id.as_deref(), &form).await;
            busy.set(false);
            match result {
                Ok(_) => {
                    toaster.success(match mode {
                        FormMode::Create => "Experience added",
                        FormMode::Edit => "Experience updated",
                    });
                    nav.push(Route::AdminExperiences {});
                }
                Err(e) => {
                    tracing::error!("Failed to save experience: {e}");
                    toaster.error(e.to_string());
                }
            }
        });
    };

    let loaded = initial.read().clone();
    match loaded {
        None => rsx! {
            p { class: "muted", "Loading experience..." }
        },
        Some(None) => rsx! {
            div {
                p { "Experience entry not found." }
                Link { class: "btn btn-outline", to: Route::AdminExperiences {}, "Back to experiences" }
            }
        },
        Some(Some(form)) => rsx! {
            ExperienceEditor {
                initial: form,
                mode,
                busy: busy(),
                on_submit,
                on_cancel: move |_| {
                    nav.push(Route::AdminExperiences {});
                },
            }
        },
    }
}
