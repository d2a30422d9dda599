mod projects;
pub use projects::AdminProjects;

mod project_edit;
pub use project_edit::{AddProject, EditProject};

mod experiences;
pub use experiences::AdminExperiences;

mod experience_edit;
pub use experience_edit::{AddExperience, EditExperience};
