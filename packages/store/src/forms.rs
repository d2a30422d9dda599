//! # Client-side form state and validation
//!
//! Admin and registration forms keep their raw input here and turn it into
//! drafts only through validation, so nothing reaches the Remote Data Service
//! without passing the required-field checks first.
//!
//! | Form | Produces | Required |
//! |------|----------|----------|
//! | [`ProjectForm`] | [`ProjectDraft`] | title, description, 1..=10 tags, image on create |
//! | [`ExperienceForm`] | [`ExperienceDraft`] | company, position, description, start date, location, end date unless current |
//! | [`RegisterForm`] | (none) | email, password (min [`MIN_PASSWORD_LEN`]), matching confirmation |

use thiserror::Error;

use crate::models::{Experience, ExperienceDraft, Project, ProjectDraft};

/// Maximum number of tags on a project.
pub const MAX_TAGS: usize = 10;

/// Minimum password length accepted by the auth service.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A required field was missing or malformed. Raised before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Add at least one tag")]
    NoTags,
    #[error("A project can have at most 10 tags")]
    TooManyTags,
    #[error("Tag \"{0}\" is listed more than once")]
    DuplicateTag(String),
    #[error("Please upload an image for the project")]
    MissingImage,
    #[error("Provide an end date or mark the position as current")]
    EndDateRequired,
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(())
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Ordered tag list. [`add`](Self::add) keeps it de-duplicated and capped at
/// [`MAX_TAGS`]; a list loaded from a stored project is kept as stored and
/// checked by [`ProjectForm::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<String>,
}

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag. Returns `false` when the input is blank, already present,
    /// or the list is full.
    pub fn add(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.tags.len() >= MAX_TAGS || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.tags.len() {
            self.tags.remove(index);
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tags.len() >= MAX_TAGS
    }

    /// First tag that appears more than once.
    pub fn duplicate(&self) -> Option<&str> {
        self.tags
            .iter()
            .enumerate()
            .find(|(i, tag)| self.tags[..*i].contains(tag))
            .map(|(_, tag)| tag.as_str())
    }
}

impl From<Vec<String>> for TagList {
    fn from(tags: Vec<String>) -> Self {
        Self { tags }
    }
}

/// Raw input of the add/edit project form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub demo_url: String,
    pub repo_url: String,
    pub featured: bool,
    pub tags: TagList,
    /// Image URL already stored for the project being edited.
    pub existing_image: Option<String>,
}

impl ProjectForm {
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            demo_url: project.demo_url.clone().unwrap_or_default(),
            repo_url: project.repo_url.clone().unwrap_or_default(),
            featured: project.featured,
            tags: TagList::from(project.tags.clone()),
            existing_image: Some(project.image_url.clone()).filter(|url| !url.is_empty()),
        }
    }

    /// Check required fields. `has_new_image` is true when a file is waiting
    /// to be uploaded.
    pub fn validate(&self, mode: FormMode, has_new_image: bool) -> Result<(), ValidationError> {
        require(&self.title, "Title")?;
        require(&self.description, "Description")?;
        if self.tags.is_empty() {
            return Err(ValidationError::NoTags);
        }
        if self.tags.len() > MAX_TAGS {
            return Err(ValidationError::TooManyTags);
        }
        if let Some(tag) = self.tags.duplicate() {
            return Err(ValidationError::DuplicateTag(tag.to_string()));
        }
        if mode == FormMode::Create && !has_new_image && self.existing_image.is_none() {
            return Err(ValidationError::MissingImage);
        }
        Ok(())
    }

    /// Build the draft written to the table. Call only after [`validate`](Self::validate).
    pub fn into_draft(self, image_url: String) -> ProjectDraft {
        ProjectDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url,
            demo_url: optional(&self.demo_url),
            repo_url: optional(&self.repo_url),
            tags: self.tags.tags,
            featured: self.featured,
        }
    }
}

/// Raw input of the add/edit experience form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceForm {
    pub company: String,
    pub position: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    /// Comma separated skills, e.g. "Rust, SQL".
    pub skills: String,
    pub location: String,
}

impl ExperienceForm {
    pub fn from_experience(exp: &Experience) -> Self {
        Self {
            company: exp.company.clone(),
            position: exp.position.clone(),
            description: exp.description.clone(),
            start_date: exp.start_date.clone(),
            end_date: exp.end_date.clone().unwrap_or_default(),
            current: exp.current,
            skills: exp.skills.join(", "),
            location: exp.location.clone(),
        }
    }

    pub fn validate(&self) -> Result<ExperienceDraft, ValidationError> {
        require(&self.company, "Company")?;
        require(&self.position, "Position")?;
        require(&self.description, "Description")?;
        require(&self.start_date, "Start date")?;
        require(&self.location, "Location")?;

        let end_date = if self.current {
            None
        } else {
            Some(optional(&self.end_date).ok_or(ValidationError::EndDateRequired)?)
        };

        Ok(ExperienceDraft {
            company: self.company.trim().to_string(),
            position: self.position.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date,
            current: self.current,
            skills: split_skills(&self.skills),
            location: self.location.trim().to_string(),
        })
    }
}

/// Split a comma separated list, dropping blanks.
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw input of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_project_form() -> ProjectForm {
        let mut form = ProjectForm {
            title: "Portfolio".into(),
            description: "My site".into(),
            ..Default::default()
        };
        form.tags.add("rust");
        form
    }

    #[test]
    fn test_tag_list_rules() {
        let mut tags = TagList::new();
        assert!(!tags.add("   "));
        assert!(tags.add(" rust "));
        assert!(!tags.add("rust"));
        assert_eq!(tags.as_slice(), ["rust"]);

        for i in 0..20 {
            tags.add(&format!("t{i}"));
        }
        assert_eq!(tags.len(), MAX_TAGS);
        assert!(tags.is_full());

        tags.remove(0);
        assert_eq!(tags.len(), MAX_TAGS - 1);
        tags.remove(100);
        assert_eq!(tags.len(), MAX_TAGS - 1);
    }

    #[test]
    fn test_stored_tags_loaded_as_is_and_checked_on_save() {
        let draft = ProjectDraft {
            title: "Portfolio".into(),
            description: "My site".into(),
            image_url: "https://cdn/p1.png".into(),
            demo_url: None,
            repo_url: None,
            tags: (0..12).map(|i| format!("t{i}")).collect(),
            featured: false,
        };
        let mut project = Project::from_draft("p1".into(), draft, chrono::Utc::now());
        let mut form = ProjectForm::from_project(&project);
        assert_eq!(form.tags.len(), 12);
        assert_eq!(form.validate(FormMode::Edit, false), Err(ValidationError::TooManyTags));

        form.tags.remove(0);
        form.tags.remove(0);
        assert_eq!(form.validate(FormMode::Edit, false), Ok(()));

        project.tags = vec!["rust".into(), "web".into(), "rust".into()];
        let form = ProjectForm::from_project(&project);
        assert_eq!(form.tags.as_slice(), ["rust", "web", "rust"]);
        assert_eq!(
            form.validate(FormMode::Edit, false),
            Err(ValidationError::DuplicateTag("rust".into()))
        );
    }

    #[test]
    fn test_project_without_tags_rejected() {
        let mut form = filled_project_form();
        form.tags.remove(0);
        assert_eq!(
            form.validate(FormMode::Create, true),
            Err(ValidationError::NoTags)
        );
    }

    #[test]
    fn test_project_required_fields() {
        let mut form = filled_project_form();
        form.title = "  ".into();
        assert_eq!(
            form.validate(FormMode::Create, true),
            Err(ValidationError::Missing("Title"))
        );

        let mut form = filled_project_form();
        form.description.clear();
        assert_eq!(
            form.validate(FormMode::Edit, false),
            Err(ValidationError::Missing("Description"))
        );
    }

    #[test]
    fn test_project_image_required_on_create_only() {
        let form = filled_project_form();
        assert_eq!(
            form.validate(FormMode::Create, false),
            Err(ValidationError::MissingImage)
        );
        assert!(form.validate(FormMode::Create, true).is_ok());
        assert!(form.validate(FormMode::Edit, false).is_ok());
    }

    #[test]
    fn test_project_draft_normalises_links() {
        let mut form = filled_project_form();
        form.demo_url = "  ".into();
        form.repo_url = " https://github.com/me/site ".into();
        let draft = form.into_draft("https://cdn/img.png".into());
        assert_eq!(draft.demo_url, None);
        assert_eq!(draft.repo_url.as_deref(), Some("https://github.com/me/site"));
        assert_eq!(draft.tags, vec!["rust".to_string()]);
    }

    fn filled_experience_form() -> ExperienceForm {
        ExperienceForm {
            company: "Acme".into(),
            position: "Engineer".into(),
            description: "Shipped".into(),
            start_date: "01/2021".into(),
            end_date: "02/2023".into(),
            current: false,
            skills: "Rust, , SQL ,".into(),
            location: "Remote".into(),
        }
    }

    #[test]
    fn test_current_experience_drops_end_date() {
        let mut form = filled_experience_form();
        form.current = true;
        let draft = form.validate().unwrap();
        assert!(draft.current);
        assert_eq!(draft.end_date, None);
    }

    #[test]
    fn test_past_experience_requires_end_date() {
        let mut form = filled_experience_form();
        form.end_date = " ".into();
        assert_eq!(form.validate(), Err(ValidationError::EndDateRequired));
    }

    #[test]
    fn test_experience_skills_split() {
        let draft = filled_experience_form().validate().unwrap();
        assert_eq!(draft.skills, vec!["Rust".to_string(), "SQL".to_string()]);
        assert_eq!(draft.end_date.as_deref(), Some("02/2023"));
    }

    #[test]
    fn test_experience_missing_location() {
        let mut form = filled_experience_form();
        form.location.clear();
        assert_eq!(form.validate(), Err(ValidationError::Missing("Location")));
    }

    #[test]
    fn test_register_form() {
        let mut form = RegisterForm {
            email: "me@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        assert!(form.validate().is_ok());

        form.confirm_password = "secret2".into();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));

        form.password = "abc".into();
        assert_eq!(form.validate(), Err(ValidationError::PasswordTooShort));

        form.email = "nope".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidEmail));
    }
}
