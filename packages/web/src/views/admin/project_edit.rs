use api::{catalog, ImageUpload};
use dioxus::prelude::*;
use store::{FormMode, ProjectForm, RemoteDataService};
use ui::{use_backend, use_toaster, ProjectEditor};

use crate::Route;

#[component]
pub fn AddProject() -> Element {
    rsx! {
        ProjectPage { id: None }
    }
}

#[component]
pub fn EditProject(id: String) -> Element {
    rsx! {
        ProjectPage { key: "{id}", id: Some(id.clone()) }
    }
}

/// Loads the project being edited (if any) and saves the submitted form.
#[component]
fn ProjectPage(id: Option<String>) -> Element {
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
                return Some(ProjectForm::default());
            };
            match backend.get_project(&id).await {
                Ok(project) => Some(ProjectForm::from_project(&project)),
                Err(e) => {
                    tracing::error!(%id, "Failed to load project: {e}");
                    toaster.error(format!("Could not load project: {e}"));
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

    let on_submit = move |(form, image): (ProjectForm, Option<ImageUpload>)| {
        let backend = backend.clone();
        let id = id.clone();
        spawn(async move {
            busy.set(true);
            let result = catalog::save_project(&backend, id.as_deref(), form, image).await;
            busy.set(false);
            match result {
                Ok(_) => {
                    toaster.success(match mode {
                        FormMode::Create => "Project created",
                        FormMode::Edit => "Project updated",
                    });
                    nav.push(Route::AdminProjects {});
                }
                Err(e) => {
                    tracing::error!("Failed to save project: {e}");
                    toaster.error(e.to_string());
                }
            }
        });
    };

    let loaded = initial.read().clone();
    match loaded {
        None => rsx! {
            p { class: "muted", "Loading project..." }
        },
        Some(None) => rsx! {
            div {
                p { "Project not found." }
                Link { class: "btn btn-outline", to: Route::AdminProjects {}, "Back to projects" }
            }
        },
        Some(Some(form)) => rsx! {
            ProjectEditor {
                initial: form,
                mode,
                busy: busy(),
                on_submit,
                on_cancel: move |_| {
                    nav.push(Route::AdminProjects {});
                },
            }
        },
    }
}
