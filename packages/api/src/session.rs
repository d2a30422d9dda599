//! # Session Store
//!
//! [`SessionStore`] is the single source of truth for "who is signed in and is
//! that principal an admin". It is constructed explicitly around a
//! [`RemoteDataService`], handed to the view tree through context, and
//! publishes [`AuthState`] on a `tokio::sync::watch` channel.
//!
//! ## Lifecycle
//!
//! 1. [`new`](SessionStore::new) registers the auth-change subscription once.
//!    State starts in [`AuthPhase::Loading`].
//! 2. [`initialize`](SessionStore::initialize) resolves the current session
//!    (rehydrated or refreshed by the backend) and looks up the role.
//! 3. [`run`](SessionStore::run) consumes [`AuthChange`] messages until
//!    [`teardown`](SessionStore::teardown), which also detaches the
//!    subscription from the backend.
//!
//! ## Ordering
//!
//! Every session change bumps an epoch. A role lookup is tagged with the epoch
//! and access token it was issued for, and its result is dropped if either has
//! moved on by the time it resolves. A sign-out racing an in-flight lookup
//! therefore always ends signed out.
//!
//! A lookup whose future is dropped before it resolves (the page that started
//! a sign-in unmounted) settles the state as non-admin with `loading` cleared,
//! and the session's next auth-change notification runs the lookup again.

use std::sync::{Arc, Mutex, PoisonError};

use store::{AuthChange, AuthSubscription, RemoteDataService, RemoteError, Session, User};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter your email and password")]
    MissingCredentials,
    #[error("{0}")]
    Rejected(String),
    #[error("Could not restore session: {0}")]
    Session(RemoteError),
    #[error("Sign out failed: {0}")]
    SignOut(RemoteError),
}

/// Coarse phase derived from [`AuthState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Loading,
    Anonymous,
    Authenticated,
}

/// Snapshot published to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub user: Option<User>,
    pub is_admin: bool,
    pub loading: bool,
    pub(crate) epoch: u64,
    /// The role lookup for the current session has completed.
    pub(crate) role_resolved: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            user: None,
            is_admin: false,
            loading: true,
            epoch: 0,
            role_resolved: false,
        }
    }
}

impl AuthState {
    pub fn phase(&self) -> AuthPhase {
        if self.loading {
            AuthPhase::Loading
        } else if self.user.is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }
}

/// Identifies the session a role lookup was issued for.
#[derive(Debug)]
struct LookupTag {
    epoch: u64,
    token: Option<String>,
}

impl LookupTag {
    fn is_current(&self, state: &AuthState) -> bool {
        state.epoch == self.epoch && state.access_token() == self.token.as_deref()
    }
}

/// Role lookup in flight for one session.
///
/// Dropped without [`finish`](Self::finish), it settles the state as
/// non-admin, not loading and unresolved.
struct PendingLookup<'a> {
    state: &'a watch::Sender<AuthState>,
    tag: LookupTag,
    settled: bool,
}

impl PendingLookup<'_> {
    fn finish(mut self, is_admin: bool) {
        self.settle(is_admin, true);
    }

    fn settle(&mut self, is_admin: bool, resolved: bool) {
        self.settled = true;
        let tag = &self.tag;
        self.state.send_if_modified(|s| {
            if !tag.is_current(s) {
                tracing::debug!(
                    issued = tag.epoch,
                    current = s.epoch,
                    "Discarding stale role lookup"
                );
                return false;
            }
            s.is_admin = is_admin;
            s.loading = false;
            s.role_resolved = resolved;
            true
        });
    }
}

impl Drop for PendingLookup<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!(epoch = self.tag.epoch, "Role lookup abandoned");
            self.settle(false, false);
        }
    }
}

/// `loading` raised for a sign-in attempt. Restored on drop unless a session
/// change has happened since.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<AuthState>,
    epoch: u64,
    was_loading: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let (epoch, was_loading) = (self.epoch, self.was_loading);
        self.state.send_if_modified(|s| {
            if s.epoch != epoch || s.loading == was_loading {
                return false;
            }
            s.loading = was_loading;
            true
        });
    }
}

/// Explicitly constructed, cheaply cloned auth state holder.
#[derive(Clone)]
pub struct SessionStore<B> {
    backend: B,
    state: Arc<watch::Sender<AuthState>>,
    subscription: Arc<Mutex<Option<AuthSubscription>>>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl<B: RemoteDataService> SessionStore<B> {
    pub fn new(backend: B) -> Self {
        let subscription = backend.on_auth_state_change();
        let (state, _) = watch::channel(AuthState::default());
        let (shutdown, _) = watch::channel(false);
        Self {
            backend,
            state: Arc::new(state),
            subscription: Arc::new(Mutex::new(Some(subscription))),
            shutdown: Arc::new(shutdown),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current snapshot.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn watch(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Resolve the current session and its role.
    ///
    /// A failure leaves the store signed out with `loading` cleared; the error
    /// is returned so the caller can surface it.
    pub async fn initialize(&self) -> Result<(), AuthError> {
        match self.backend.get_session().await {
            Ok(session) => {
                tracing::debug!(signed_in = session.is_some(), "Session resolved");
                self.apply(session).await;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to get session: {e}");
                self.apply(None).await;
                Err(AuthError::Session(e))
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let _loading = self.raise_loading();
        match self.backend.sign_in_with_password(email, password).await {
            Ok(session) => {
                tracing::info!(%email, "Signed in");
                self.apply(Some(session)).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%email, "Sign-in rejected: {e}");
                Err(AuthError::Rejected(e.to_string()))
            }
        }
    }

    /// Sign out at the backend and clear local state regardless of the outcome.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let result = self.backend.sign_out().await;
        self.apply(None).await;
        match result {
            Ok(()) => {
                tracing::info!("Signed out");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Sign-out call failed, local session cleared anyway: {e}");
                Err(AuthError::SignOut(e))
            }
        }
    }

    /// React to one auth-change notification.
    ///
    /// A change carrying the session already held is skipped while its role
    /// is resolved or being looked up; sign-in applies its session directly
    /// before the notification arrives.
    pub async fn handle_change(&self, change: AuthChange) {
        let session = change.into_session();
        if let Some(incoming) = &session {
            let current = {
                let state = self.state.borrow();
                state.access_token() == Some(incoming.access_token.as_str())
                    && (state.loading || state.role_resolved)
            };
            if current {
                tracing::debug!("Auth change for the current session, skipping");
                return;
            }
        }
        self.apply(session).await;
    }

    /// Consume auth-change notifications until [`teardown`](Self::teardown).
    pub async fn run(&self) {
        let taken = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(mut subscription) = taken else {
            tracing::debug!("Auth-change loop already running or torn down");
            return;
        };
        let mut shutdown = self.shutdown.subscribe();

        loop {
            tokio::select! {
                change = subscription.recv() => match change {
                    Some(change) => self.handle_change(change).await,
                    None => break,
                },
                _ = shutdown.wait_for(|stop| *stop) => break,
            }
        }

        subscription.unsubscribe();
        tracing::debug!("Auth-change loop stopped");
    }

    /// Stop [`run`](Self::run) and detach from the backend.
    pub fn teardown(&self) {
        self.shutdown.send_replace(true);
        if let Some(subscription) = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            subscription.unsubscribe();
        }
    }

    async fn apply(&self, session: Option<Session>) {
        let user_id = session.as_ref().map(|s| s.user.id.clone());
        let tag = self.begin(session);
        if let Some(user_id) = user_id {
            let lookup = PendingLookup {
                state: &self.state,
                tag,
                settled: false,
            };
            let is_admin = self.authorize(&user_id).await;
            lookup.finish(is_admin);
        }
    }

    fn raise_loading(&self) -> LoadingGuard<'_> {
        let mut guard = LoadingGuard {
            state: &self.state,
            epoch: 0,
            was_loading: false,
        };
        self.state.send_modify(|s| {
            guard.epoch = s.epoch;
            guard.was_loading = s.loading;
            s.loading = true;
        });
        guard
    }

    fn begin(&self, session: Option<Session>) -> LookupTag {
        let mut tag = LookupTag {
            epoch: 0,
            token: None,
        };
        self.state.send_modify(|s| {
            s.epoch += 1;
            s.user = session.as_ref().map(|s| s.user.clone());
            s.loading = session.is_some();
            s.is_admin = false;
            s.role_resolved = false;
            s.session = session;
            tag = LookupTag {
                epoch: s.epoch,
                token: s.access_token().map(str::to_string),
            };
        });
        tracing::debug!(epoch = tag.epoch, signed_in = tag.token.is_some(), "Session changed");
        tag
    }

    /// Role lookup. Anything but an `admin` profile is treated as non-admin.
    async fn authorize(&self, user_id: &str) -> bool {
        match self.backend.fetch_profile(user_id).await {
            Ok(Some(profile)) => profile.role.is_admin(),
            Ok(None) => {
                tracing::warn!(%user_id, "No profile found, treating as non-admin");
                false
            }
            Err(e) => {
                tracing::warn!(%user_id, "Role lookup failed, treating as non-admin: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{decide, GuardDecision, GuardTarget};
    use store::{Call, MemoryBackend, Role};

    const ADMIN: &str = "admin@example.com";
    const PASSWORD: &str = "secret1";

    fn store_with(role: Option<Role>) -> (MemoryBackend, SessionStore<MemoryBackend>, User) {
        let backend = MemoryBackend::new();
        let user = backend.with_user(ADMIN, PASSWORD, role);
        let store = SessionStore::new(backend.clone());
        (backend, store, user)
    }

    fn session_for(user: &User, token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: format!("{token}-refresh"),
            expires_at: None,
            user: user.clone(),
        }
    }

    #[tokio::test]
    async fn test_starts_loading_then_anonymous() {
        let (_, store, _) = store_with(Some(Role::Admin));
        assert_eq!(store.state().phase(), AuthPhase::Loading);

        store.initialize().await.unwrap();
        let state = store.state();
        assert_eq!(state.phase(), AuthPhase::Anonymous);
        assert!(!state.loading);
        assert!(!state.is_admin);
    }

    #[tokio::test]
    async fn test_invalid_credentials() {
        let (_, store, _) = store_with(Some(Role::Admin));
        store.initialize().await.unwrap();

        let err = store.sign_in(ADMIN, "wrong").await.unwrap_err();
        assert_eq!(err, AuthError::Rejected("Invalid login credentials".into()));
        let state = store.state();
        assert_eq!(state.phase(), AuthPhase::Anonymous);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_empty_credentials_make_no_call() {
        let (backend, store, _) = store_with(Some(Role::Admin));
        assert_eq!(
            store.sign_in("  ", PASSWORD).await,
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(store.sign_in(ADMIN, "").await, Err(AuthError::MissingCredentials));
        assert_eq!(backend.call_count(Call::SignIn), 0);
    }

    #[tokio::test]
    async fn test_admin_sign_in_then_sign_out() {
        let (_, store, _) = store_with(Some(Role::Admin));
        store.initialize().await.unwrap();

        store.sign_in(ADMIN, PASSWORD).await.unwrap();
        let state = store.state();
        assert_eq!(state.phase(), AuthPhase::Authenticated);
        assert!(state.is_admin);
        assert_eq!(state.email(), Some(ADMIN));
        assert_eq!(decide(&state, true), GuardDecision::Render);

        store.sign_out().await.unwrap();
        let state = store.state();
        assert!(state.session.is_none());
        assert!(!state.is_admin);
        assert_eq!(
            decide(&state, true),
            GuardDecision::Redirect(GuardTarget::Login)
        );
    }

    #[tokio::test]
    async fn test_non_admin_roles_are_closed() {
        let (_, store, _) = store_with(Some(Role::User));
        store.sign_in(ADMIN, PASSWORD).await.unwrap();
        let state = store.state();
        assert!(!state.is_admin);
        assert_eq!(decide(&state, true), GuardDecision::Redirect(GuardTarget::Home));
        assert_eq!(decide(&state, false), GuardDecision::Render);

        let (_, store, _) = store_with(None);
        store.sign_in(ADMIN, PASSWORD).await.unwrap();
        assert!(!store.state().is_admin);
        assert!(!store.state().loading);

        let (backend, store, _) = store_with(Some(Role::Admin));
        backend.fail(Call::FetchProfile, "permission denied");
        store.sign_in(ADMIN, PASSWORD).await.unwrap();
        assert!(!store.state().is_admin);
        assert_eq!(store.state().phase(), AuthPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_initialize_rehydrates_session() {
        let (backend, store, user) = store_with(Some(Role::Admin));
        backend.set_session(Some(session_for(&user, "persisted")));

        store.initialize().await.unwrap();
        let state = store.state();
        assert_eq!(state.access_token(), Some("persisted"));
        assert!(state.is_admin);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_initialize_failure_ends_anonymous() {
        let (backend, store, _) = store_with(Some(Role::Admin));
        backend.fail(Call::GetSession, "offline");

        let err = store.initialize().await.unwrap_err();
        assert!(matches!(err, AuthError::Session(_)));
        assert_eq!(store.state().phase(), AuthPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_sign_out_during_role_lookup() {
        let (backend, store, _) = store_with(Some(Role::Admin));
        store.initialize().await.unwrap();
        backend.hold_profile_lookups();

        let sign_in = store.sign_in(ADMIN, PASSWORD);
        let sign_out = async {
            while backend.call_count(Call::FetchProfile) == 0 {
                tokio::task::yield_now().await;
            }
            let result = store.sign_out().await;
            backend.release_profile_lookups();
            result
        };
        let (signed_in, signed_out) = tokio::join!(sign_in, sign_out);
        signed_in.unwrap();
        signed_out.unwrap();

        let state = store.state();
        assert_eq!(state.phase(), AuthPhase::Anonymous);
        assert!(!state.is_admin);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_abandoned_sign_in_settles_and_recovers() {
        let (backend, store, _) = store_with(Some(Role::Admin));
        store.initialize().await.unwrap();
        backend.hold_profile_lookups();

        {
            let sign_in = store.sign_in(ADMIN, PASSWORD);
            tokio::pin!(sign_in);
            let lookup_started = async {
                while backend.call_count(Call::FetchProfile) == 0 {
                    tokio::task::yield_now().await;
                }
            };
            tokio::select! {
                _ = &mut sign_in => panic!("role lookup is held, sign-in cannot finish"),
                _ = lookup_started => {}
            }
        }

        let state = store.state();
        assert!(!state.loading);
        assert!(!state.is_admin);
        assert_eq!(state.email(), Some(ADMIN));
        assert_eq!(decide(&state, true), GuardDecision::Redirect(GuardTarget::Home));

        backend.release_profile_lookups();
        let mut rx = store.watch();
        let driver = async {
            let is_admin = rx
                .wait_for(|s| s.is_admin && !s.loading)
                .await
                .unwrap()
                .is_admin;
            assert!(is_admin);
            store.teardown();
        };
        tokio::join!(store.run(), driver);

        assert_eq!(decide(&store.state(), true), GuardDecision::Render);
        assert_eq!(backend.call_count(Call::FetchProfile), 2);
    }

    #[tokio::test]
    async fn test_sign_out_failure_still_clears() {
        let (backend, store, _) = store_with(Some(Role::Admin));
        store.sign_in(ADMIN, PASSWORD).await.unwrap();
        backend.fail(Call::SignOut, "network down");

        let err = store.sign_out().await.unwrap_err();
        assert!(matches!(err, AuthError::SignOut(_)));
        let state = store.state();
        assert!(state.session.is_none());
        assert!(state.user.is_none());
        assert!(!state.is_admin);
    }

    #[tokio::test]
    async fn test_notification_for_current_session_is_skipped() {
        let (backend, store, _) = store_with(Some(Role::Admin));
        store.sign_in(ADMIN, PASSWORD).await.unwrap();
        let current = store.state().session.unwrap();

        store.handle_change(AuthChange::SignedIn(current)).await;
        assert_eq!(backend.call_count(Call::FetchProfile), 1);
        assert!(store.state().is_admin);
    }

    #[tokio::test]
    async fn test_run_follows_refresh_and_detaches_on_teardown() {
        let (backend, store, user) = store_with(Some(Role::Admin));
        assert_eq!(backend.listener_count(), 1);
        let mut rx = store.watch();

        let driver = async {
            backend.emit(AuthChange::TokenRefreshed(session_for(&user, "refreshed")));
            let is_admin = rx
                .wait_for(|s| s.access_token() == Some("refreshed") && !s.loading)
                .await
                .unwrap()
                .is_admin;
            assert!(is_admin);

            backend.emit(AuthChange::SignedOut);
            rx.wait_for(|s| s.session.is_none() && !s.loading)
                .await
                .unwrap();
            store.teardown();
        };
        tokio::join!(store.run(), driver);

        assert_eq!(backend.listener_count(), 0);
        assert_eq!(store.state().phase(), AuthPhase::Anonymous);
    }
}
