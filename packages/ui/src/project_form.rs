use api::ImageUpload;
use dioxus::prelude::*;
use store::{FormMode, ProjectForm};

use crate::components::{Button, ButtonVariant, Field, Input, TextArea};
use crate::tag_input::TagInput;
use crate::toast::use_toaster;

/// Add/edit form for a project. Emits the raw form plus any newly picked image.
#[component]
pub fn ProjectEditor(
    initial: ProjectForm,
    mode: FormMode,
    busy: bool,
    on_submit: EventHandler<(ProjectForm, Option<ImageUpload>)>,
    on_cancel: EventHandler<()>,
) -> Element {
    let toaster = use_toaster();
    let mut title = use_signal(|| initial.title.clone());
    let mut description = use_signal(|| initial.description.clone());
    let mut demo_url = use_signal(|| initial.demo_url.clone());
    let mut repo_url = use_signal(|| initial.repo_url.clone());
    let mut featured = use_signal(|| initial.featured);
    let tags = use_signal(|| initial.tags.clone());
    let mut image = use_signal(|| Option::<ImageUpload>::None);
    let existing_image = initial.existing_image.clone();

    let preview = existing_image.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let form = ProjectForm {
            title: title(),
            description: description(),
            demo_url: demo_url(),
            repo_url: repo_url(),
            featured: featured(),
            tags: tags(),
            existing_image: existing_image.clone(),
        };
        on_submit.call((form, image()));
    };

    let heading = match mode {
        FormMode::Create => "Add project",
        FormMode::Edit => "Edit project",
    };

    rsx! {
        form {
            class: "editor",
            onsubmit: handle_submit,
            h1 { class: "editor-title", "{heading}" }

            Field { label: "Title", html_for: "project-title",
                Input {
                    id: "project-title",
                    value: title(),
                    oninput: move |evt: FormEvent| title.set(evt.value()),
                }
            }
            Field { label: "Description", html_for: "project-description",
                TextArea {
                    id: "project-description",
                    value: description(),
                    oninput: move |evt: FormEvent| description.set(evt.value()),
                }
            }
            Field { label: "Image", html_for: "project-image",
                input {
                    id: "project-image",
                    r#type: "file",
                    accept: "image/*",
                    onchange: move |evt: FormEvent| async move {
                        let Some(file) = evt.files().into_iter().next() else {
                            return;
                        };
                        match file.read_bytes().await {
                            Ok(bytes) => image.set(Some(ImageUpload::new(file.name(), bytes.to_vec()))),
                            Err(e) => toaster.error(format!("Could not read {}: {e}", file.name())),
                        }
                    },
                }
                if let Some(upload) = image() {
                    p { class: "field-hint", "Selected: {upload.file_name}" }
                } else if let Some(url) = preview.clone() {
                    img { class: "editor-preview", src: "{url}", alt: "Current image" }
                }
            }
            Field { label: "Demo URL", html_for: "project-demo",
                Input {
                    id: "project-demo",
                    r#type: "url",
                    placeholder: "https://",
                    value: demo_url(),
                    oninput: move |evt: FormEvent| demo_url.set(evt.value()),
                }
            }
            Field { label: "Repository URL", html_for: "project-repo",
                Input {
                    id: "project-repo",
                    r#type: "url",
                    placeholder: "https://github.com/",
                    value: repo_url(),
                    oninput: move |evt: FormEvent| repo_url.set(evt.value()),
                }
            }
            Field { label: "Tags", html_for: "project-tags",
                TagInput { tags }
            }
            label {
                class: "checkbox",
                input {
                    r#type: "checkbox",
                    checked: featured(),
                    onchange: move |evt: FormEvent| featured.set(evt.checked()),
                }
                "Featured on the home page"
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
