use dioxus::prelude::*;
use store::{ExperienceForm, FormMode};

use crate::components::{Button, ButtonVariant, Field, Input, TextArea};

/// Add/edit form for a work history entry.
#[component]
pub fn ExperienceEditor(
    initial: ExperienceForm,
    mode: FormMode,
    busy: bool,
    on_submit: EventHandler<ExperienceForm>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut company = use_signal(|| initial.company.clone());
    let mut position = use_signal(|| initial.position.clone());
    let mut description = use_signal(|| initial.description.clone());
    let mut start_date = use_signal(|| initial.start_date.clone());
    let mut end_date = use_signal(|| initial.end_date.clone());
    let mut current = use_signal(|| initial.current);
    let mut skills = use_signal(|| initial.skills.clone());
    let mut location = use_signal(|| initial.location.clone());

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        on_submit.call(ExperienceForm {
            company: company(),
            position: position(),
            description: description(),
            start_date: start_date(),
            end_date: end_date(),
            current: current(),
            skills: skills(),
            location: location(),
        });
    };

    let heading = match mode {
        FormMode::Create => "Add experience",
        FormMode::Edit => "Edit experience",
    };

    rsx! {
        form {
            class: "editor",
            onsubmit: handle_submit,
            h1 { class: "editor-title", "{heading}" }

            Field { label: "Company", html_for: "exp-company",
                Input { id: "exp-company", value: company(), oninput: move |evt: FormEvent| company.set(evt.value()) }
            }
            Field { label: "Position", html_for: "exp-position",
                Input { id: "exp-position", value: position(), oninput: move |evt: FormEvent| position.set(evt.value()) }
            }
            Field { label: "Location", html_for: "exp-location",
                Input { id: "exp-location", value: location(), oninput: move |evt: FormEvent| location.set(evt.value()) }
            }
            div {
                class: "field-row",
                Field { label: "Start date", html_for: "exp-start",
                    Input {
                        id: "exp-start",
                        r#type: "month",
                        value: start_date(),
                        oninput: move |evt: FormEvent| start_date.set(evt.value()),
                    }
                }
                Field { label: "End date", html_for: "exp-end",
                    Input {
                        id: "exp-end",
                        r#type: "month",
                        value: end_date(),
                        disabled: current(),
                        oninput: move |evt: FormEvent| end_date.set(evt.value()),
                    }
                }
            }
            label {
                class: "checkbox",
                input {
                    r#type: "checkbox",
                    checked: current(),
                    onchange: move |evt: FormEvent| current.set(evt.checked()),
                }
                "I currently work here"
            }
            Field { label: "Description", html_for: "exp-description",
                TextArea {
                    id: "exp-description",
                    value: description(),
                    oninput: move |evt: FormEvent| description.set(evt.value()),
                }
            }
            Field { label: "Skills (comma separated)", html_for: "exp-skills",
                Input {
                    id: "exp-skills",
                    placeholder: "Rust, PostgreSQL, Docker",
                    value: skills(),
                    oninput: move |evt: FormEvent| skills.set(evt.value()),
                }
            }

            div {
                class: "editor-actions",
                Button {
                    variant: ButtonVariant::Primary,
                    r#type: "submit",
                    disabled: busy,
                    if busy { "Saving..." } else { "Save" }
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}
