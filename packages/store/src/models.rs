//! # Domain models for the portfolio
//!
//! Defines the records exchanged with the Remote Data Service. Every type is
//! `Serialize + Deserialize` with column names matching the remote tables, so
//! the same structs decode PostgREST responses and encode insert/update bodies.
//!
//! ## Types
//!
//! | Struct | Table / source | Notes |
//! |--------|----------------|-------|
//! | [`User`] | auth service | Identity of the signed-in principal. |
//! | [`Session`] | auth service | Access + refresh token pair for a [`User`]. |
//! | [`Profile`] | `profiles` | Carries the [`Role`] used for authorization. |
//! | [`NewProfile`] | `profiles` | Row written once, at registration. |
//! | [`Project`] | `projects` | Portfolio entry. |
//! | [`ProjectDraft`] | `projects` | Writable columns of a project; only built by form validation. |
//! | [`Experience`] | `experiences` | Work history entry. |
//! | [`ExperienceDraft`] | `experiences` | Writable columns of an experience. |
//!
//! Ids are kept as strings so the types work unchanged on WASM and native.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a signed-in principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// Proof of authentication issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is no longer valid.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    /// Whether the access token has expired at `now` (unix seconds).
    ///
    /// Sessions without an expiry never expire locally.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Authorization role stored in `profiles.role`.
///
/// Any string other than `"admin"` decodes as [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(other)]
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Profile row created during registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Build the stored record for a freshly inserted draft.
    pub fn from_draft(id: String, draft: ProjectDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            demo_url: draft.demo_url,
            repo_url: draft.repo_url,
            tags: draft.tags,
            featured: draft.featured,
            created_at,
        }
    }

    /// Overwrite the writable columns with `draft`, keeping id and creation time.
    pub fn apply_draft(&mut self, draft: ProjectDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.image_url = draft.image_url;
        self.demo_url = draft.demo_url;
        self.repo_url = draft.repo_url;
        self.tags = draft.tags;
        self.featured = draft.featured;
    }
}

/// Writable columns of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub tags: Vec<String>,
    pub featured: bool,
}

/// A work history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub description: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: String,
}

impl Experience {
    pub fn from_draft(id: String, draft: ExperienceDraft) -> Self {
        Self {
            id,
            company: draft.company,
            position: draft.position,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            current: draft.current,
            skills: draft.skills,
            location: draft.location,
        }
    }

    pub fn apply_draft(&mut self, draft: ExperienceDraft) {
        self.company = draft.company;
        self.position = draft.position;
        self.description = draft.description;
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.current = draft.current;
        self.skills = draft.skills;
        self.location = draft.location;
    }

    /// "start – end" label, with "Present" for a current position.
    pub fn period(&self) -> String {
        match (&self.end_date, self.current) {
            (_, true) | (None, false) => format!("{} – Present", self.start_date),
            (Some(end), false) => format!("{} – {}", self.start_date, end),
        }
    }
}

/// Writable columns of an experience.
///
/// `end_date` is always `None` when `current` is set; the form enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDraft {
    pub company: String,
    pub position: String,
    pub description: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
    pub skills: Vec<String>,
    pub location: String,
}
