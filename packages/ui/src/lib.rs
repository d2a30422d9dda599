//! Shared UI for the portfolio: auth context, route guard, toasts and the
//! reusable form and card components.

pub mod components;

pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_brands_icons::{FaGithub, FaLinkedin, FaTelegram};
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod auth;
pub use auth::{use_auth, use_backend, use_session_store, AuthProvider, SignOutButton};

mod protected;
pub use protected::ProtectedRoute;

mod toast;
pub use toast::{use_toaster, Toast, ToastLevel, ToastProvider, Toaster};

mod navbar;
pub use navbar::Navbar;

mod tag_input;
pub use tag_input::TagInput;

mod project_form;
pub use project_form::ProjectEditor;

mod experience_form;
pub use experience_form::ExperienceEditor;

mod project_card;
pub use project_card::ProjectCard;
