use dioxus::prelude::*;
use store::RemoteDataService;
use ui::icons::{FaBriefcase, FaLocationDot};
use ui::{use_backend, use_toaster, Icon};

#[component]
pub fn ExperiencePage() -> Element {
    let backend = use_backend();
    let toaster = use_toaster();

    let experiences = use_resource(move || {
        let backend = backend.clone();
        async move {
            match backend.list_experiences().await {
                Ok(list) => list,
                Err(e) => {
                    tracing::error!("Failed to load experiences: {e}");
                    toaster.error(format!("Could not load experience: {e}"));
                    Vec::new()
                }
            }
        }
    });

    let Some(list) = experiences.read().clone() else {
        return rsx! {
            section { class: "section", p { class: "muted", "Loading experience..." } }
        };
    };

    rsx! {
        section {
            class: "section",
            h1 { "Work Experience" }
            p { class: "muted", "Where I have worked and what I did there." }

            if list.is_empty() {
                p { class: "muted", "No experience entries yet." }
            }
            ol {
                class: "timeline",
                for exp in list {
                    li {
                        key: "{exp.id}",
                        class: "card timeline-item",
                        div {
                            class: "timeline-head",
                            h3 {
                                Icon { icon: FaBriefcase, width: 16, height: 16 }
                                " {exp.position}"
                            }
                            span { class: "muted", {exp.period()} }
                        }
                        p { class: "timeline-company", "{exp.company}" }
                        p {
                            class: "muted",
                            Icon { icon: FaLocationDot, width: 12, height: 12 }
                            " {exp.location}"
                        }
                        p { "{exp.description}" }
                        div {
                            class: "tag-list",
                            for skill in exp.skills.iter() {
                                span { key: "{skill}", class: "tag", "{skill}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
