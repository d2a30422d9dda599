use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));
    tracing::warn!(%path, "No route matched");

    rsx! {
        div {
            class: "not-found",
            h1 { "404" }
            p { "Oops! Page not found: {path}" }
            Link { class: "btn btn-primary", to: Route::Home {}, "Return to Home" }
        }
    }
}
