use api::{catalog, Catalog};
use dioxus::prelude::*;
use store::Project;
use ui::icons::{FaPenToSquare, FaPlus, FaStar, FaTrash};
use ui::{use_backend, use_toaster, Icon};

use crate::Route;

#[component]
pub fn AdminProjects() -> Element {
    let backend = use_backend();
    let toaster = use_toaster();
    let mut projects = use_signal(Catalog::<Project>::default);
    let mut loading = use_signal(|| true);

    let loader = backend.clone();
    use_future(move || {
        let backend = loader.clone();
        async move {
            match catalog::load_projects(&backend).await {
                Ok(loaded) => projects.set(loaded),
                Err(e) => {
                    tracing::error!("Failed to load projects: {e}");
                    toaster.error(format!("Could not load projects: {e}"));
                }
            }
            loading.set(false);
        }
    });

    let toggler = backend.clone();
    let toggle = use_callback(move |project: Project| {
        let backend = toggler.clone();
        spawn(async move {
            match catalog::toggle_featured(&backend, &project).await {
                Ok(updated) => {
                    let message = if updated.featured {
                        "Project is now featured"
                    } else {
                        "Project is no longer featured"
                    };
                    projects.write().replace(updated);
                    toaster.success(message);
                }
                Err(e) => {
                    tracing::error!(id = %project.id, "Failed to toggle featured: {e}");
                    toaster.error(format!("Could not update project: {e}"));
                }
            }
        });
    });

    let remover = backend.clone();
    let delete = use_callback(move |id: String| {
        let backend = remover.clone();
        spawn(async move {
            match catalog::delete_project(&backend, &id).await {
                Ok(()) => {
                    projects.write().remove(&id);
                    toaster.success("Project deleted");
                }
                Err(e) => {
                    tracing::error!(%id, "Failed to delete project: {e}");
                    toaster.error(format!("Could not delete project: {e}"));
                }
            }
        });
    });

    let items = projects.read().items().to_vec();

    rsx! {
        div {
            class: "admin-header",
            h1 { "Manage Projects" }
            Link {
                class: "btn btn-primary",
                to: Route::AddProject {},
                Icon { icon: FaPlus, width: 14, height: 14 }
                " Add project"
            }
        }

        if loading() {
            p { class: "muted", "Loading projects..." }
        } else if items.is_empty() {
            p { class: "muted", "No projects yet." }
        } else {
            table {
                class: "admin-table",
                thead {
                    tr {
                        th { "Image" }
                        th { "Title" }
                        th { "Tags" }
                        th { "Featured" }
                        th { "Actions" }
                    }
                }
                tbody {
                    for project in items {
                        ProjectRow {
                            key: "{project.id}",
                            project,
                            on_toggle: toggle,
                            on_delete: delete,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ProjectRow(
    project: Project,
    on_toggle: EventHandler<Project>,
    on_delete: EventHandler<String>,
) -> Element {
    let mut confirming = use_signal(|| false);
    let toggled = project.clone();
    let id = project.id.clone();

    rsx! {
        tr {
            td {
                if !project.image_url.is_empty() {
                    img { class: "admin-thumb", src: "{project.image_url}", alt: "{project.title}" }
                }
            }
            td { "{project.title}" }
            td {
                div {
                    class: "tag-list",
                    for tag in project.tags.iter() {
                        span { key: "{tag}", class: "tag", "{tag}" }
                    }
                }
            }
            td {
                button {
                    class: if project.featured { "icon-btn featured" } else { "icon-btn" },
                    title: "Toggle featured",
                    onclick: move |_| on_toggle.call(toggled.clone()),
                    Icon { icon: FaStar, width: 16, height: 16 }
                }
            }
            td {
                class: "admin-actions",
                Link {
                    class: "icon-btn",
                    to: Route::EditProject { id: project.id.clone() },
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
