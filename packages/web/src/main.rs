use dioxus::prelude::*;

use views::admin::{
    AddExperience, AddProject, AdminExperiences, AdminProjects, EditExperience, EditProject,
};
use views::{
    AdminLayout, ContactPage, ExperiencePage, Home, Login, NotFound, ProjectsPage, Register,
    SiteLayout, SkillsPage,
};

mod content;
mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(SiteLayout)]
        #[route("/")]
        Home {},
        #[route("/projects")]
        ProjectsPage {},
        #[route("/skills")]
        SkillsPage {},
        #[route("/experience")]
        ExperiencePage {},
        #[route("/contact")]
        ContactPage {},
        #[route("/login")]
        Login {},
        #[route("/register")]
        Register {},
        #[nest("/admin")]
            #[layout(AdminLayout)]
                #[route("/projects")]
                AdminProjects {},
                #[route("/add-project")]
                AddProject {},
                #[route("/edit-project/:id")]
                EditProject { id: String },
                #[route("/experiences")]
                AdminExperiences {},
                #[route("/add-experience")]
                AddExperience {},
                #[route("/edit-experience/:id")]
                EditExperience { id: String },
            #[end_layout]
        #[end_nest]
    #[end_layout]
    #[redirect("/add-project", || Route::AddProject {})]
    #[redirect("/edit-project/:id", |id: String| Route::EditProject { id })]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    init_tracing();

    dioxus::launch(App);
}

#[cfg(not(target_arch = "wasm32"))]
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
    if installed.is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        ui::ToastProvider {
            ui::AuthProvider {
                Router::<Route> {}
            }
        }
    }
}
