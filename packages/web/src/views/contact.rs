use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, Field, Input, TextArea};
use ui::icons::{FaGithub, FaLinkedin};
use ui::{use_toaster, Icon};

use crate::content::CONTACT_CHANNELS;

/// Contact page. The form has no delivery backend; submitting acknowledges
/// the message and clears the fields.
#[component]
pub fn ContactPage() -> Element {
    let toaster = use_toaster();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut subject = use_signal(String::new);
    let mut message = use_signal(String::new);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let missing = [name(), email(), subject(), message()]
            .iter()
            .any(|v| v.trim().is_empty());
        if missing {
            toaster.error("Please fill in every field");
            return;
        }
        tracing::info!(subject = %subject(), "Contact form submitted");
        toaster.success("Message sent! Thanks for reaching out. I'll get back to you soon.");
        name.set(String::new());
        email.set(String::new());
        subject.set(String::new());
        message.set(String::new());
    };

    rsx! {
        section {
            class: "section",
            h1 { "Get In Touch" }
            p { class: "muted", "Have a project in mind or want to discuss potential opportunities? Feel free to reach out!" }

            div {
                class: "contact-grid",
                form {
                    class: "card editor",
                    onsubmit: handle_submit,
                    h2 { "Send me a message" }
                    div {
                        class: "field-row",
                        Field { label: "Name", html_for: "contact-name",
                            Input { id: "contact-name", placeholder: "Your name", value: name(), oninput: move |evt: FormEvent| name.set(evt.value()) }
                        }
                        Field { label: "Email", html_for: "contact-email",
                            Input { id: "contact-email", r#type: "email", placeholder: "your.email@example.com", value: email(), oninput: move |evt: FormEvent| email.set(evt.value()) }
                        }
                    }
                    Field { label: "Subject", html_for: "contact-subject",
                        Input { id: "contact-subject", placeholder: "How can I help you?", value: subject(), oninput: move |evt: FormEvent| subject.set(evt.value()) }
                    }
                    Field { label: "Message", html_for: "contact-message",
                        TextArea { id: "contact-message", rows: 5, value: message(), oninput: move |evt: FormEvent| message.set(evt.value()) }
                    }
                    Button { variant: ButtonVariant::Primary, r#type: "submit", "Send Message" }
                }

                aside {
                    class: "card contact-info",
                    h2 { "Contact Information" }
                    for channel in CONTACT_CHANNELS.iter() {
                        div {
                            key: "{channel.title}",
                            class: "contact-channel",
                            span { class: "muted", "{channel.title}" }
                            a { href: "{channel.href}", "{channel.value}" }
                        }
                    }
                    div {
                        class: "contact-social",
                        a { href: "https://github.com", target: "_blank", rel: "noopener",
                            Icon { icon: FaGithub, width: 20, height: 20 }
                        }
                        a { href: "https://linkedin.com", target: "_blank", rel: "noopener",
                            Icon { icon: FaLinkedin, width: 20, height: 20 }
                        }
                    }
                }
            }
        }
    }
}
