//! Domain records, form validation and the Remote Data Service seam shared by
//! every portfolio crate.

pub mod backend;
pub mod forms;
pub mod models;

mod memory;
pub use memory::{Call, MemoryBackend};

pub use backend::{AuthChange, AuthListeners, AuthSubscription, RemoteDataService, RemoteError, SignUp};
pub use forms::{
    ExperienceForm, FormMode, ProjectForm, RegisterForm, TagList, ValidationError, MAX_TAGS,
};
pub use models::{
    Experience, ExperienceDraft, NewProfile, Profile, Project, ProjectDraft, Role, Session, User,
};
