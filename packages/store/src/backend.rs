//! # Remote Data Service abstraction
//!
//! [`RemoteDataService`] is the seam between the application and the hosted
//! backend. It covers the four surfaces the portfolio consumes:
//!
//! - **auth**: password sign-in / sign-up / sign-out, current session, and a
//!   change subscription delivered as [`AuthChange`] messages;
//! - **profiles**: role lookup by user id and the registration insert;
//! - **tables**: CRUD over `projects` and `experiences`;
//! - **storage**: image upload returning a public URL.
//!
//! Implementations: `api::supabase::SupabaseClient` (HTTP) and
//! [`crate::MemoryBackend`] (in-process).
//!
//! Futures returned by the trait are not required to be `Send`; the UI runs on a
//! single-threaded executor.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::models::{
    Experience, ExperienceDraft, NewProfile, Profile, Project, ProjectDraft, Session, User,
};

/// Failure of a call to the Remote Data Service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Remote data service is not configured")]
    NotConfigured,
    #[error("Network error: {0}")]
    Http(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Record not found")]
    NotFound,
    #[error("{0}")]
    Rejected(String),
}

/// Notification emitted by the auth service whenever the session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChange {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

impl AuthChange {
    /// Session carried by the change, `None` for sign-out.
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthChange::SignedIn(s) | AuthChange::TokenRefreshed(s) => Some(s),
            AuthChange::SignedOut => None,
        }
    }

    pub fn into_session(self) -> Option<Session> {
        match self {
            AuthChange::SignedIn(s) | AuthChange::TokenRefreshed(s) => Some(s),
            AuthChange::SignedOut => None,
        }
    }
}

/// Receiving end of an auth-change subscription.
///
/// Dropping it (or calling [`unsubscribe`](Self::unsubscribe)) detaches it; the
/// backend prunes closed listeners on the next notification.
#[derive(Debug)]
pub struct AuthSubscription {
    rx: mpsc::UnboundedReceiver<AuthChange>,
}

impl AuthSubscription {
    pub async fn recv(&mut self) -> Option<AuthChange> {
        self.rx.recv().await
    }

    pub fn unsubscribe(mut self) {
        self.rx.close();
    }
}

/// Fan-out registry of auth-change listeners shared by backend implementations.
#[derive(Debug, Clone, Default)]
pub struct AuthListeners {
    senders: Arc<Mutex<Vec<mpsc::UnboundedSender<AuthChange>>>>,
}

impl AuthListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> AuthSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        AuthSubscription { rx }
    }

    /// Deliver `change` to every live listener, dropping closed ones.
    pub fn notify(&self, change: AuthChange) {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.retain(|tx| tx.send(change.clone()).is_ok());
        tracing::debug!(listeners = senders.len(), ?change, "auth change delivered");
    }

    /// Number of listeners that have not been detached yet.
    pub fn live(&self) -> usize {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.retain(|tx| !tx.is_closed());
        senders.len()
    }
}

/// Result of a sign-up. `session` is present when the service signs the new
/// user in immediately (no email confirmation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUp {
    pub user: User,
    pub session: Option<Session>,
}

/// Async interface to the hosted backend.
pub trait RemoteDataService {
    /// Current session, rehydrating or refreshing it if the implementation can.
    fn get_session(&self) -> impl Future<Output = Result<Option<Session>, RemoteError>>;

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, RemoteError>>;

    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<SignUp, RemoteError>>;

    fn sign_out(&self) -> impl Future<Output = Result<(), RemoteError>>;

    /// Register a listener for session changes.
    fn on_auth_state_change(&self) -> AuthSubscription;

    /// Profile row for `user_id`, `None` when no row exists.
    fn fetch_profile(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<Profile>, RemoteError>>;

    fn insert_profile(&self, profile: &NewProfile) -> impl Future<Output = Result<(), RemoteError>>;

    /// All projects, newest first.
    fn list_projects(&self) -> impl Future<Output = Result<Vec<Project>, RemoteError>>;

    fn get_project(&self, id: &str) -> impl Future<Output = Result<Project, RemoteError>>;

    fn insert_project(
        &self,
        draft: &ProjectDraft,
    ) -> impl Future<Output = Result<Project, RemoteError>>;

    fn update_project(
        &self,
        id: &str,
        draft: &ProjectDraft,
    ) -> impl Future<Output = Result<Project, RemoteError>>;

    /// Update only the `featured` column.
    fn set_project_featured(
        &self,
        id: &str,
        featured: bool,
    ) -> impl Future<Output = Result<(), RemoteError>>;

    fn delete_project(&self, id: &str) -> impl Future<Output = Result<(), RemoteError>>;

    /// All experiences, latest start date first.
    fn list_experiences(&self) -> impl Future<Output = Result<Vec<Experience>, RemoteError>>;

    fn get_experience(&self, id: &str) -> impl Future<Output = Result<Experience, RemoteError>>;

    fn insert_experience(
        &self,
        draft: &ExperienceDraft,
    ) -> impl Future<Output = Result<Experience, RemoteError>>;

    fn update_experience(
        &self,
        id: &str,
        draft: &ExperienceDraft,
    ) -> impl Future<Output = Result<Experience, RemoteError>>;

    fn delete_experience(&self, id: &str) -> impl Future<Output = Result<(), RemoteError>>;

    /// Upload an object to the image bucket and return its public URL.
    fn upload_image(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<String, RemoteError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str) -> Session {
        Session {
            access_token: token.into(),
            refresh_token: "r".into(),
            expires_at: None,
            user: User {
                id: "u1".into(),
                email: "u1@example.com".into(),
            },
        }
    }

    #[tokio::test]
    async fn test_listeners_fan_out_and_prune() {
        let listeners = AuthListeners::new();
        let mut first = listeners.subscribe();
        let second = listeners.subscribe();
        assert_eq!(listeners.live(), 2);

        second.unsubscribe();
        assert_eq!(listeners.live(), 1);

        listeners.notify(AuthChange::SignedIn(session("t1")));
        listeners.notify(AuthChange::SignedOut);

        assert_eq!(first.recv().await, Some(AuthChange::SignedIn(session("t1"))));
        assert_eq!(first.recv().await, Some(AuthChange::SignedOut));
    }

    #[test]
    fn test_change_session_accessor() {
        assert!(AuthChange::SignedOut.session().is_none());
        let change = AuthChange::TokenRefreshed(session("t2"));
        assert_eq!(change.session().map(|s| s.access_token.as_str()), Some("t2"));
    }
}
