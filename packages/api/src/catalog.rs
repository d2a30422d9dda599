//! # Admin list/form operations
//!
//! Each operation issues exactly one remote call (a project save may be
//! preceded by one image upload) and returns the record to patch into the
//! caller's [`Catalog`]. Nothing is patched on failure, so the visible list
//! only ever reflects writes the backend accepted.
//!
//! Form validation runs before any call; an invalid form never reaches the
//! backend.

use store::{
    Experience, ExperienceForm, FormMode, Project, ProjectForm, RemoteDataService, RemoteError,
};

use crate::error::AppError;

/// Public project filter categories, in display order.
pub const CATEGORIES: [&str; 5] = ["all", "frontend", "backend", "fullstack", "mobile"];

/// Project cards shown before "load more".
pub const INITIAL_VISIBLE: usize = 4;

/// Cards added by each "load more".
pub const LOAD_MORE_STEP: usize = 3;

pub trait Record {
    fn id(&self) -> &str;
}

impl Record for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Experience {
    fn id(&self) -> &str {
        &self.id
    }
}

/// In-memory copy of a table, patched after successful writes.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<T> {
    items: Vec<T>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Catalog<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Swap in an updated record. Returns `false` if its id is unknown.
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }
}

/// A file picked in the project form, waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Lower-cased file extension, `bin` when there is none.
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| "bin".to_string())
    }

    /// Fresh, collision-free object path: `projects/<uuid>.<ext>`.
    pub fn object_path(&self) -> String {
        format!("projects/{}.{}", uuid::Uuid::new_v4(), self.extension())
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

pub async fn load_projects<B: RemoteDataService>(
    backend: &B,
) -> Result<Catalog<Project>, RemoteError> {
    let projects = backend.list_projects().await?;
    tracing::debug!(count = projects.len(), "Loaded projects");
    Ok(Catalog::new(projects))
}

pub async fn load_experiences<B: RemoteDataService>(
    backend: &B,
) -> Result<Catalog<Experience>, RemoteError> {
    let experiences = backend.list_experiences().await?;
    tracing::debug!(count = experiences.len(), "Loaded experiences");
    Ok(Catalog::new(experiences))
}

/// Flip `featured` on `project`. Returns the record with only that field changed.
pub async fn toggle_featured<B: RemoteDataService>(
    backend: &B,
    project: &Project,
) -> Result<Project, RemoteError> {
    let featured = !project.featured;
    backend.set_project_featured(&project.id, featured).await?;
    Ok(Project {
        featured,
        ..project.clone()
    })
}

pub async fn delete_project<B: RemoteDataService>(backend: &B, id: &str) -> Result<(), RemoteError> {
    backend.delete_project(id).await?;
    tracing::info!(%id, "Deleted project");
    Ok(())
}

pub async fn delete_experience<B: RemoteDataService>(
    backend: &B,
    id: &str,
) -> Result<(), RemoteError> {
    backend.delete_experience(id).await?;
    tracing::info!(%id, "Deleted experience");
    Ok(())
}

/// Create (`id == None`) or update a project.
///
/// A pending `image` is uploaded first and replaces the stored URL; without
/// one an edit keeps the existing image.
pub async fn save_project<B: RemoteDataService>(
    backend: &B,
    id: Option<&str>,
    form: ProjectForm,
    image: Option<ImageUpload>,
) -> Result<Project, AppError> {
    let mode = if id.is_some() {
        FormMode::Edit
    } else {
        FormMode::Create
    };
    form.validate(mode, image.is_some())?;

    let image_url = match image {
        Some(upload) => {
            let path = upload.object_path();
            backend
                .upload_image(&path, upload.bytes, &upload.content_type)
                .await?
        }
        None => form.existing_image.clone().unwrap_or_default(),
    };
    let draft = form.into_draft(image_url);

    let project = match id {
        Some(id) => backend.update_project(id, &draft).await?,
        None => backend.insert_project(&draft).await?,
    };
    tracing::info!(id = %project.id, ?mode, "Saved project");
    Ok(project)
}

/// Create (`id == None`) or update an experience.
pub async fn save_experience<B: RemoteDataService>(
    backend: &B,
    id: Option<&str>,
    form: &ExperienceForm,
) -> Result<Experience, AppError> {
    let draft = form.validate()?;
    let experience = match id {
        Some(id) => backend.update_experience(id, &draft).await?,
        None => backend.insert_experience(&draft).await?,
    };
    tracing::info!(id = %experience.id, "Saved experience");
    Ok(experience)
}

/// Projects whose tags mention `category` (case-insensitive); `all` keeps everything.
pub fn filter_by_category<'a>(projects: &'a [Project], category: &str) -> Vec<&'a Project> {
    let category = category.to_lowercase();
    projects
        .iter()
        .filter(|p| {
            category == "all"
                || p.tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&category))
        })
        .collect()
}

pub fn featured(projects: &[Project]) -> Vec<&Project> {
    projects.iter().filter(|p| p.featured).collect()
}

/// Number of cards visible after one more "load more".
pub fn load_more(visible: usize, total: usize) -> usize {
    (visible + LOAD_MORE_STEP).min(total)
}
