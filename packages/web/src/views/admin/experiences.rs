use api::{catalog, Catalog};
use dioxus::prelude::*;
use store::Experience;
use ui::icons::{FaPenToSquare, FaPlus, FaTrash};
use ui::{use_backend, use_toaster, Icon};

use crate::Route;

#[component]
pub fn AdminExperiences() -> Element {
    let backend = use_backend();
    let toaster = use_toaster();
    let mut experiences = use_signal(Catalog::<Experience>::default);
    let mut loading = use_signal(|| true);

    let loader = backend.clone();
    use_future(move || {
        let backend = loader.clone();
        async move {
            match catalog::load_experiences(&backend).await {
                Ok(loaded) => experiences.set(loaded),
                Err(e) => {
                    tracing::error!("Failed to load experiences: {e}");
                    toaster.error(format!("Could not load experiences: {e}"));
                }
            }
            loading.set(false);
        }
    });

    let delete = use_callback(move |id: String| {
        let backend = backend.clone();
        spawn(async move {
            match catalog::delete_experience(&backend, &id).await {
                Ok(()) => {
                    experiences.write().remove(&id);
                    toaster.success("Experience deleted");
                }
                Err(e) => {
                    tracing::error!(%id, "Failed to delete experience: {e}");
                    toaster.error(format!("Could not delete experience: {e}"));
                }
            }
        });
    });

    let items = experiences.read().items().to_vec();

    rsx! {
        div {
            class: "admin-header",
            h1 { "Manage Experience" }
            Link {
                class: "btn btn-primary",
                to: Route::AddExperience {},
                Icon { icon: FaPlus, width: 14, height: 14 }
                " Add experience"
            }
        }

        if loading() {
            p { class: "muted", "Loading experiences..." }
        } else if items.is_empty() {
            p { class: "muted", "No experience entries yet." }
        } else {
            table {
                class: "admin-table",
                thead {
                    tr {
                        th { "Position" }
                        th { "Company" }
                        th { "Period" }
                        th { "Location" }
                        th { "Actions" }
                    }
                }
                tbody {
                    for exp in items {
                        ExperienceRow { key: "{exp.id}", experience: exp, on_delete: delete }
                    }
                }
            }
        }
    }
}

#[component]
fn ExperienceRow(experience: Experience, on_delete: EventHandler<String>) -> Element {
    let mut confirming = use_signal(|| false);
    let id = experience.id.clone();
    let period = experience.period();

    rsx! {
        tr {
            td { "{experience.position}" }
            td { "{experience.company}" }
            td { "{period}" }
            td { "{experience.location}" }
            td {
                class: "admin-actions",
                Link {
                    class: "icon-btn",
                    to: Route::EditExperience { id: experience.id.clone() },
                    Icon { icon: FaPenToSquare, width: 16, height: 16 }
                }
                if confirming() {
                    button {
                        class: "btn btn-danger",
                        onclick: move |_| {
                            confirming.set(false);
                            on_delete.call(id.clone());
                        },
                        "Confirm"
                    }
                    button {
                        class: "btn btn-outline",
                        onclick: move |_| confirming.set(false),
                        "Cancel"
                    }
                } else {
                    button {
                        class: "icon-btn danger",
                        title: "Delete",
                        onclick: move |_| confirming.set(true),
                        Icon { icon: FaTrash, width: 16, height: 16 }
                    }
                }
            }
        }
    }
}
