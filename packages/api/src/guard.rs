//! Route guard decision, kept free of any UI type so it can be tested alone.

use crate::session::AuthState;

/// Where a blocked visitor is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardTarget {
    Login,
    Home,
}

impl GuardTarget {
    pub fn path(self) -> &'static str {
        match self {
            GuardTarget::Login => "/login",
            GuardTarget::Home => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Auth state is still resolving; show a neutral placeholder.
    Wait,
    Redirect(GuardTarget),
    Render,
}

pub fn decide(state: &AuthState, admin_only: bool) -> GuardDecision {
    if state.loading {
        GuardDecision::Wait
    } else if state.user.is_none() {
        GuardDecision::Redirect(GuardTarget::Login)
    } else if admin_only && !state.is_admin {
        GuardDecision::Redirect(GuardTarget::Home)
    } else {
        GuardDecision::Render
    }
}

/// Whether `/login` or `/register` should forward a visitor to the admin
/// area. Holds off while the page's own submission is still running, so a
/// session created mid-submit does not unmount the page under it.
pub fn leave_auth_page(state: &AuthState, submitting: bool) -> bool {
    !submitting && !state.loading && state.user.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::User;

    fn state(user: bool, is_admin: bool, loading: bool) -> AuthState {
        AuthState {
            session: None,
            user: user.then(|| User {
                id: "u1".into(),
                email: "u1@example.com".into(),
            }),
            is_admin,
            loading,
            epoch: 1,
            role_resolved: !loading,
        }
    }

    #[test]
    fn test_loading_waits() {
        assert_eq!(decide(&state(true, true, true), true), GuardDecision::Wait);
        assert_eq!(decide(&state(false, false, true), false), GuardDecision::Wait);
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        let decision = decide(&state(false, false, false), false);
        assert_eq!(decision, GuardDecision::Redirect(GuardTarget::Login));
        assert_eq!(GuardTarget::Login.path(), "/login");
    }

    #[test]
    fn test_admin_only_never_renders_for_non_admin() {
        assert_eq!(
            decide(&state(true, false, false), true),
            GuardDecision::Redirect(GuardTarget::Home)
        );
        assert_eq!(decide(&state(true, false, false), false), GuardDecision::Render);
        assert_eq!(decide(&state(true, true, false), true), GuardDecision::Render);
    }

    #[test]
    fn test_auth_page_waits_for_its_own_submission() {
        let signed_in = state(true, false, false);
        assert!(leave_auth_page(&signed_in, false));
        assert!(!leave_auth_page(&signed_in, true));
        assert!(!leave_auth_page(&state(true, false, true), false));
        assert!(!leave_auth_page(&state(false, false, false), false));
    }
}
