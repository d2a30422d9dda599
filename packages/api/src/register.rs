//! Account registration: sign-up followed by the profile insert.

use chrono::Utc;
use store::{NewProfile, RegisterForm, RemoteDataService, RemoteError, Role, User};

use crate::error::AppError;
use crate::session::AuthError;

/// Role given to every self-registered account. Admin is granted out of band.
pub const SIGNUP_ROLE: Role = Role::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user: User,
    /// Whether the service signed the new user in immediately.
    pub signed_in: bool,
    /// Set when the account exists but its profile row could not be written.
    pub profile_error: Option<RemoteError>,
}

pub async fn register<B: RemoteDataService>(
    backend: &B,
    form: &RegisterForm,
) -> Result<Registration, AppError> {
    form.validate()?;
    let email = form.email.trim();

    let signup = backend
        .sign_up(email, &form.password)
        .await
        .map_err(|e| AuthError::Rejected(e.to_string()))?;
    tracing::info!(%email, "Account registered");

    let profile = NewProfile {
        id: signup.user.id.clone(),
        email: email.to_string(),
        role: SIGNUP_ROLE,
        created_at: Utc::now(),
    };
    let profile_error = match backend.insert_profile(&profile).await {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(%email, "Profile insert failed after sign-up: {e}");
            Some(e)
        }
    };

    Ok(Registration {
        user: signup.user,
        signed_in: signup.session.is_some(),
        profile_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::leave_auth_page;
    use crate::session::SessionStore;
    use store::{Call, MemoryBackend, ValidationError};

    fn form(email: &str) -> RegisterForm {
        RegisterForm {
            email: email.into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_user_profile() {
        let backend = MemoryBackend::new();
        let registration = register(&backend, &form(" new@example.com ")).await.unwrap();
        assert!(registration.signed_in);
        assert_eq!(registration.profile_error, None);

        let profile = backend.profile(&registration.user.id).unwrap();
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_call() {
        let backend = MemoryBackend::new();
        let mut bad = form("new@example.com");
        bad.confirm_password = "other".into();
        assert_eq!(
            register(&backend, &bad).await,
            Err(AppError::Validation(ValidationError::PasswordMismatch))
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_account_rejected() {
        let backend = MemoryBackend::new();
        backend.with_user("taken@example.com", "secret1", None);
        let err = register(&backend, &form("taken@example.com")).await.unwrap_err();
        assert_eq!(
            err,
            AppError::Auth(AuthError::Rejected("User already registered".into()))
        );
        assert_eq!(backend.call_count(Call::InsertProfile), 0);
    }

    #[tokio::test]
    async fn test_profile_failure_is_reported_not_fatal() {
        let backend = MemoryBackend::new();
        backend.fail(Call::InsertProfile, "permission denied");
        let registration = register(&backend, &form("new@example.com")).await.unwrap();
        assert!(registration.profile_error.is_some());
        assert!(backend.profile(&registration.user.id).is_none());
    }

    #[tokio::test]
    async fn test_signed_in_sign_up_writes_profile_while_session_resolves() {
        let backend = MemoryBackend::new();
        let store = SessionStore::new(backend.clone());
        store.initialize().await.unwrap();
        let mut rx = store.watch();

        let submit = async {
            let registration = register(&backend, &form("new@example.com")).await.unwrap();
            assert!(registration.signed_in);
            let profile = backend.profile(&registration.user.id).unwrap();
            assert_eq!(profile.role, Role::User);

            let state = rx
                .wait_for(|s| s.user.is_some() && !s.loading)
                .await
                .unwrap()
                .clone();
            assert!(!state.is_admin);
            assert!(!leave_auth_page(&state, true));
            assert!(leave_auth_page(&state, false));
            store.teardown();
        };
        tokio::join!(store.run(), submit);
    }
}
