use api::catalog;
use dioxus::prelude::*;
use store::{Project, RemoteDataService};
use ui::{use_backend, use_toaster, ProjectCard};

use crate::Route;

#[component]
pub fn Home() -> Element {
    let backend = use_backend();
    let toaster = use_toaster();

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

    let featured: Option<Vec<Project>> = projects
        .read()
        .as_ref()
        .map(|all| catalog::featured(all).into_iter().cloned().collect());

    rsx! {
        section {
            class: "hero",
            span { class: "hero-badge", "Full Stack Developer" }
            h1 { "Building digital experiences that matter" }
            p {
                "I create modern web applications, focusing on clean code, performance, and user experience. "
                "From responsive frontends to scalable backends, I build complete solutions."
            }
            div {
                class: "hero-actions",
                Link { class: "btn btn-primary", to: Route::ProjectsPage {}, "View My Projects" }
                Link { class: "btn btn-outline", to: Route::ContactPage {}, "Get in Touch" }
            }
        }

        section {
            class: "section",
            h2 { "Featured Projects" }
            {match featured {
                None => rsx! { p { class: "muted", "Loading projects..." } },
                Some(list) if list.is_empty() => rsx! { p { class: "muted", "No featured projects yet." } },
                Some(list) => rsx! {
                    div {
                        class: "project-grid",
                        for project in list {
                            ProjectCard { key: "{project.id}", project }
                        }
                    }
                },
            }}
        }
    }
}
