use api::catalog::{self, CATEGORIES, INITIAL_VISIBLE};
use dioxus::prelude::*;
use store::RemoteDataService;
use ui::{use_backend, use_toaster, ProjectCard};

#[component]
pub fn ProjectsPage() -> Element {
    let backend = use_backend();
    let toaster = use_toaster();
    let mut category = use_signal(|| "all".to_string());
    let mut visible = use_signal(|| INITIAL_VISIBLE);

    let projects = use_resource(move || {
        let backend = backend.clone();
        async move {
            match backend.list_projects().await {
                Ok(projects) => projects,
                Err(e) => {
                    tracing::error!("Failed to load projects: {e}");
                    toaster.error(format!("Could not load projects: {e}"));
                    Vec::new()
                }
            }
        }
    });

    let Some(all) = projects.read().clone() else {
        return rsx! {
            section { class: "section", p { class: "muted", "Loading projects..." } }
        };
    };
    let filtered = catalog::filter_by_category(&all, &category());
    let total = filtered.len();
    let shown: Vec<_> = filtered.into_iter().take(visible()).cloned().collect();

    rsx! {
        section {
            class: "section",
            h1 { "My Projects" }
            p { class: "muted", "A selection of things I have designed and built." }

            div {
                class: "filter-bar",
                for name in CATEGORIES {
                    button {
                        key: "{name}",
                        class: if category() == name { "chip active" } else { "chip" },
                        onclick: move |_| {
                            category.set(name.to_string());
                            visible.set(INITIAL_VISIBLE);
                        },
                        "{name}"
                    }
                }
            }

            if shown.is_empty() {
                p { class: "muted", "No projects in this category." }
            }
            div {
                class: "project-grid",
                for project in shown {
                    ProjectCard { key: "{project.id}", project }
                }
            }
            if visible() < total {
                button {
                    class: "btn btn-outline",
                    onclick: move |_| visible.set(catalog::load_more(visible(), total)),
                    "Load more"
                }
            }
        }
    }
}
