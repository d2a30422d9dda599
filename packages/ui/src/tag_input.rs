use dioxus::prelude::*;
use store::{TagList, MAX_TAGS};

fn commit(mut tags: Signal<TagList>, mut draft: Signal<String>) {
    let added = tags.write().add(&draft.peek());
    if added {
        draft.set(String::new());
    }
}

/// Editable tag list. Enter or "Add" commits the typed tag.
#[component]
pub fn TagInput(mut tags: Signal<TagList>) -> Element {
    let mut draft = use_signal(String::new);
    let current = tags.read().as_slice().to_vec();
    let full = tags.read().is_full();
    let count = current.len();

    rsx! {
        div {
            class: "tag-input",
            div {
                class: "tag-list",
                for (index, tag) in current.iter().enumerate() {
                    span {
                        key: "{index}-{tag}",
                        class: "tag",
                        "{tag}"
                        button {
                            r#type: "button",
                            class: "tag-remove",
                            onclick: move |_| tags.write().remove(index),
                            "×"
                        }
                    }
                }
            }
            div {
                class: "tag-entry",
                input {
                    class: "field-input",
                    placeholder: if full { "Tag limit reached" } else { "Add a tag" },
                    disabled: full,
                    value: "{draft}",
                    oninput: move |evt| draft.set(evt.value()),
                    onkeydown: move |evt: KeyboardEvent| {
                        if evt.key() == Key::Enter {
                            evt.prevent_default();
                            commit(tags, draft);
                        }
                    },
                }
                button {
                    r#type: "button",
                    class: "btn btn-outline",
                    disabled: full,
                    onclick: move |_| commit(tags, draft),
                    "Add"
                }
            }
            p { class: "field-hint", "{count}/{MAX_TAGS} tags" }
        }
    }
}
