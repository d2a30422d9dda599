use dioxus::prelude::*;

use crate::content::SKILL_CATEGORIES;

#[component]
pub fn SkillsPage() -> Element {
    rsx! {
        section {
            class: "section",
            h1 { "Skills & Expertise" }
            p { class: "muted", "My technical skills and proficiency in various technologies and tools." }
            div {
                class: "skill-grid",
                for category in SKILL_CATEGORIES.iter() {
                    div {
                        key: "{category.title}",
                        class: "card skill-card {category.accent}",
                        h3 { "{category.title}" }
                        for skill in category.skills.iter() {
                            div {
                                key: "{skill.name}",
                                class: "skill",
                                div {
                                    class: "skill-label",
                                    span { "{skill.name}" }
                                    span { class: "muted", "{skill.level}%" }
                                }
                                div {
                                    class: "progress",
                                    div { class: "progress-bar", width: "{skill.level}%" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
