use dioxus::prelude::*;
use store::Project;

use crate::icons::{FaArrowUpRightFromSquare, FaCodeBranch};
use crate::Icon;

#[component]
pub fn ProjectCard(project: Project) -> Element {
    rsx! {
        article {
            class: "project-card",
            if !project.image_url.is_empty() {
                img { class: "project-card-image", src: "{project.image_url}", alt: "{project.title}" }
            }
            div {
                class: "project-card-body",
                h3 { "{project.title}" }
                p { "{project.description}" }
                div {
                    class: "tag-list",
                    for tag in project.tags.iter() {
                        span { key: "{tag}", class: "tag", "{tag}" }
                    }
                }
                div {
                    class: "project-card-links",
                    if let Some(url) = project.demo_url.clone() {
                        a { href: "{url}", target: "_blank", rel: "noopener",
                            Icon { icon: FaArrowUpRightFromSquare, width: 14, height: 14 }
                            " Live demo"
                        }
                    }
                    if let Some(url) = project.repo_url.clone() {
                        a { href: "{url}", target: "_blank", rel: "noopener",
                            Icon { icon: FaCodeBranch, width: 14, height: 14 }
                            " Source"
                        }
                    }
                }
            }
        }
    }
}
