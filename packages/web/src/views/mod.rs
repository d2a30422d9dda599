mod layout;
pub use layout::{AdminLayout, SiteLayout};

mod home;
pub use home::Home;

mod projects;
pub use projects::ProjectsPage;

mod skills;
pub use skills::SkillsPage;

mod experience;
pub use experience::ExperiencePage;

mod contact;
pub use contact::ContactPage;

mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod not_found;
pub use not_found::NotFound;

pub mod admin;
