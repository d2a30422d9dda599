use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use crate::backend::{
    AuthChange, AuthListeners, AuthSubscription, RemoteDataService, RemoteError, SignUp,
};
use crate::models::{
    Experience, ExperienceDraft, NewProfile, Profile, Project, ProjectDraft, Role, Session, User,
};

/// Remote calls recorded by [`MemoryBackend`], also used to inject failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Call {
    GetSession,
    SignIn,
    SignUp,
    SignOut,
    FetchProfile,
    InsertProfile,
    ListProjects,
    GetProject,
    InsertProject,
    UpdateProject,
    SetFeatured,
    DeleteProject,
    ListExperiences,
    GetExperience,
    InsertExperience,
    UpdateExperience,
    DeleteExperience,
    UploadImage,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, (String, User)>,
    session: Option<Session>,
    profiles: HashMap<String, Profile>,
    projects: Vec<Project>,
    experiences: Vec<Experience>,
    objects: HashMap<String, (Vec<u8>, String)>,
    failures: HashMap<Call, String>,
    calls: Vec<Call>,
    next_token: u64,
    clock: Option<DateTime<Utc>>,
}

impl State {
    /// Strictly increasing timestamps so list ordering is deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.clock {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.clock = Some(next);
        next
    }

    fn issue_session(&mut self, user: User) -> Session {
        self.next_token += 1;
        let session = Session {
            access_token: format!("access-{}", self.next_token),
            refresh_token: format!("refresh-{}", self.next_token),
            expires_at: None,
            user,
        };
        self.session = Some(session.clone());
        session
    }
}

/// In-process Remote Data Service for tests and offline demos.
///
/// Besides the trait surface it records every call, can be told to fail
/// specific calls, and can hold profile lookups in flight until released.
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
    listeners: AuthListeners,
    profile_gate: Arc<watch::Sender<bool>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            state: Arc::new(Mutex::new(State::default())),
            listeners: AuthListeners::new(),
            profile_gate: Arc::new(gate),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `call` and return the injected failure for it, if any.
    fn enter(&self, call: Call) -> Result<MutexGuard<'_, State>, RemoteError> {
        let mut state = self.state();
        state.calls.push(call);
        if let Some(message) = state.failures.get(&call).cloned() {
            return Err(RemoteError::Rejected(message));
        }
        Ok(state)
    }

    /// Register an account. A profile row is created when `role` is given.
    pub fn with_user(&self, email: &str, password: &str, role: Option<Role>) -> User {
        let mut state = self.state();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        if let Some(role) = role {
            let created_at = state.tick();
            state.profiles.insert(
                user.id.clone(),
                Profile {
                    id: user.id.clone(),
                    email: email.to_string(),
                    role,
                    created_at,
                },
            );
        }
        user
    }

    pub fn seed_project(&self, draft: ProjectDraft) -> Project {
        let mut state = self.state();
        let created_at = state.tick();
        let project = Project::from_draft(uuid::Uuid::new_v4().to_string(), draft, created_at);
        state.projects.push(project.clone());
        project
    }

    pub fn seed_experience(&self, draft: ExperienceDraft) -> Experience {
        let experience = Experience::from_draft(uuid::Uuid::new_v4().to_string(), draft);
        self.state().experiences.push(experience.clone());
        experience
    }

    /// Replace the stored session without notifying, as if rehydrated from disk.
    pub fn set_session(&self, session: Option<Session>) {
        self.state().session = session;
    }

    /// Push a notification to subscribers, as the auth service would on refresh.
    pub fn emit(&self, change: AuthChange) {
        self.listeners.notify(change);
    }

    /// Make every subsequent `call` fail with `message`.
    pub fn fail(&self, call: Call, message: &str) {
        self.state().failures.insert(call, message.to_string());
    }

    pub fn recover(&self, call: Call) {
        self.state().failures.remove(&call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, call: Call) -> usize {
        self.state().calls.iter().filter(|c| **c == call).count()
    }

    pub fn profile(&self, user_id: &str) -> Option<Profile> {
        self.state().profiles.get(user_id).cloned()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.state().projects.clone()
    }

    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.state().objects.get(path).map(|(bytes, _)| bytes.clone())
    }

    /// Number of subscribers still attached.
    pub fn listener_count(&self) -> usize {
        self.listeners.live()
    }

    /// Keep profile lookups pending until [`release_profile_lookups`](Self::release_profile_lookups).
    pub fn hold_profile_lookups(&self) {
        self.profile_gate.send_replace(false);
    }

    pub fn release_profile_lookups(&self) {
        self.profile_gate.send_replace(true);
    }
}

impl RemoteDataService for MemoryBackend {
    async fn get_session(&self) -> Result<Option<Session>, RemoteError> {
        let state = self.enter(Call::GetSession)?;
        Ok(state.session.clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, RemoteError> {
        let session = {
            let mut state = self.enter(Call::SignIn)?;
            let user = match state.accounts.get(email) {
                Some((stored, user)) if stored == password => user.clone(),
                _ => {
                    return Err(RemoteError::Status {
                        status: 400,
                        message: "Invalid login credentials".to_string(),
                    })
                }
            };
            state.issue_session(user)
        };
        self.listeners.notify(AuthChange::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, RemoteError> {
        let session = {
            let mut state = self.enter(Call::SignUp)?;
            if state.accounts.contains_key(email) {
                return Err(RemoteError::Rejected("User already registered".to_string()));
            }
            let user = User {
                id: uuid::Uuid::new_v4().to_string(),
                email: email.to_string(),
            };
            state
                .accounts
                .insert(email.to_string(), (password.to_string(), user.clone()));
            state.issue_session(user)
        };
        self.listeners.notify(AuthChange::SignedIn(session.clone()));
        Ok(SignUp {
            user: session.user.clone(),
            session: Some(session),
        })
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        self.enter(Call::SignOut)?.session = None;
        self.listeners.notify(AuthChange::SignedOut);
        Ok(())
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        self.listeners.subscribe()
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, RemoteError> {
        self.state().calls.push(Call::FetchProfile);
        let mut gate = self.profile_gate.subscribe();
        // The sender lives as long as self, so this only errs after teardown.
        let _ = gate.wait_for(|open| *open).await;

        let state = self.state();
        if let Some(message) = state.failures.get(&Call::FetchProfile) {
            return Err(RemoteError::Rejected(message.clone()));
        }
        Ok(state.profiles.get(user_id).cloned())
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<(), RemoteError> {
        let mut state = self.enter(Call::InsertProfile)?;
        if state.profiles.contains_key(&profile.id) {
            return Err(RemoteError::Rejected(
                "duplicate key value violates unique constraint \"profiles_pkey\"".to_string(),
            ));
        }
        state.profiles.insert(
            profile.id.clone(),
            Profile {
                id: profile.id.clone(),
                email: profile.email.clone(),
                role: profile.role,
                created_at: profile.created_at,
            },
        );
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, RemoteError> {
        let state = self.enter(Call::ListProjects)?;
        let mut projects = state.projects.clone();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn get_project(&self, id: &str) -> Result<Project, RemoteError> {
        let state = self.enter(Call::GetProject)?;
        state
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    async fn insert_project(&self, draft: &ProjectDraft) -> Result<Project, RemoteError> {
        let mut state = self.enter(Call::InsertProject)?;
        let created_at = state.tick();
        let project =
            Project::from_draft(uuid::Uuid::new_v4().to_string(), draft.clone(), created_at);
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: &str, draft: &ProjectDraft) -> Result<Project, RemoteError> {
        let mut state = self.enter(Call::UpdateProject)?;
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RemoteError::NotFound)?;
        project.apply_draft(draft.clone());
        Ok(project.clone())
    }

    async fn set_project_featured(&self, id: &str, featured: bool) -> Result<(), RemoteError> {
        let mut state = self.enter(Call::SetFeatured)?;
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RemoteError::NotFound)?;
        project.featured = featured;
        Ok(())
    }

    async fn delete_project(&self, id: &str) -> Result<(), RemoteError> {
        let mut state = self.enter(Call::DeleteProject)?;
        state.projects.retain(|p| p.id != id);
        Ok(())
    }

    async fn list_experiences(&self) -> Result<Vec<Experience>, RemoteError> {
        let state = self.enter(Call::ListExperiences)?;
        let mut experiences = state.experiences.clone();
        experiences.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(experiences)
    }

    async fn get_experience(&self, id: &str) -> Result<Experience, RemoteError> {
        let state = self.enter(Call::GetExperience)?;
        state
            .experiences
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    async fn insert_experience(&self, draft: &ExperienceDraft) -> Result<Experience, RemoteError> {
        let mut state = self.enter(Call::InsertExperience)?;
        let experience = Experience::from_draft(uuid::Uuid::new_v4().to_string(), draft.clone());
        state.experiences.push(experience.clone());
        Ok(experience)
    }

    async fn update_experience(
        &self,
        id: &str,
        draft: &ExperienceDraft,
    ) -> Result<Experience, RemoteError> {
        let mut state = self.enter(Call::UpdateExperience)?;
        let experience = state
            .experiences
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(RemoteError::NotFound)?;
        experience.apply_draft(draft.clone());
        Ok(experience.clone())
    }

    async fn delete_experience(&self, id: &str) -> Result<(), RemoteError> {
        let mut state = self.enter(Call::DeleteExperience)?;
        state.experiences.retain(|e| e.id != id);
        Ok(())
    }

    async fn upload_image(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RemoteError> {
        let mut state = self.enter(Call::UploadImage)?;
        state
            .objects
            .insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(format!("memory://portfolio/{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.to_string(),
            description: "desc".to_string(),
            image_url: "img".to_string(),
            demo_url: None,
            repo_url: None,
            tags: vec!["rust".to_string()],
            featured: false,
        }
    }

    #[tokio::test]
    async fn test_sign_in_notifies_subscribers() {
        let backend = MemoryBackend::new();
        backend.with_user("me@example.com", "hunter22", Some(Role::Admin));
        let mut sub = backend.on_auth_state_change();

        let err = backend
            .sign_in_with_password("me@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");

        let session = backend
            .sign_in_with_password("me@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(sub.recv().await, Some(AuthChange::SignedIn(session.clone())));
        assert_eq!(backend.get_session().await.unwrap(), Some(session));

        backend.sign_out().await.unwrap();
        assert_eq!(sub.recv().await, Some(AuthChange::SignedOut));
        assert_eq!(backend.get_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_projects_listed_newest_first() {
        let backend = MemoryBackend::new();
        backend.seed_project(draft("old"));
        backend.seed_project(draft("new"));

        let titles: Vec<_> = backend
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["new", "old"]);
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let backend = MemoryBackend::new();
        backend.fail(Call::ListProjects, "boom");

        assert_eq!(
            backend.list_projects().await,
            Err(RemoteError::Rejected("boom".to_string()))
        );
        assert_eq!(backend.call_count(Call::ListProjects), 1);

        backend.recover(Call::ListProjects);
        assert!(backend.list_projects().await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_profile_rejected() {
        let backend = MemoryBackend::new();
        let user = backend.with_user("a@example.com", "secret1", Some(Role::User));
        let again = NewProfile {
            id: user.id.clone(),
            email: user.email.clone(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        assert!(backend.insert_profile(&again).await.is_err());
        assert_eq!(backend.profile(&user.id).map(|p| p.role), Some(Role::User));
    }

    #[tokio::test]
    async fn test_experiences_sorted_by_start_date() {
        let backend = MemoryBackend::new();
        for start in ["2019-01", "2023-05", "2021-02"] {
            backend.seed_experience(ExperienceDraft {
                company: "c".into(),
                position: "p".into(),
                description: "d".into(),
                start_date: start.into(),
                end_date: None,
                current: true,
                skills: vec![],
                location: "l".into(),
            });
        }
        let starts: Vec<_> = backend
            .list_experiences()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.start_date)
            .collect();
        assert_eq!(starts, ["2023-05", "2021-02", "2019-01"]);
    }
}
