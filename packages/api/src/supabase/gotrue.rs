//! Wire types for the auth (GoTrue) endpoints and error-body decoding shared by
//! every endpoint.

use serde::{Deserialize, Serialize};
use store::{Session, User};

#[derive(Debug, Serialize)]
pub(crate) struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

/// Body of a successful token grant.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl TokenResponse {
    /// Convert into a [`Session`], deriving `expires_at` from `expires_in` when
    /// the service only sends the relative value.
    pub fn into_session(self, now: i64) -> Session {
        Session {
            expires_at: self.expires_at.or(self.expires_in.map(|secs| now + secs)),
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user: self.user,
        }
    }
}

/// Sign-up answers with a full token grant when email confirmation is off,
/// and with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Session(TokenResponse),
    User(User),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Human-readable message from an error response body.
///
/// Auth, PostgREST and storage each use a different field; fall back to the
/// raw body and then the status code.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                format!("Request failed with status {status}")
            } else {
                body.to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(error_message(400, body), "Invalid login credentials");
    }

    #[test]
    fn test_error_message_postgrest_and_storage() {
        let postgrest = r#"{"code":"42501","message":"permission denied for table projects"}"#;
        assert_eq!(
            error_message(403, postgrest),
            "permission denied for table projects"
        );
        let gotrue = r#"{"code":422,"msg":"User already registered"}"#;
        assert_eq!(error_message(422, gotrue), "User already registered");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(502, "Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(500, ""), "Request failed with status 500");
    }

    #[test]
    fn test_token_response_expiry() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "rt",
            "user": {"id": "u1", "email": "me@example.com", "aud": "authenticated"}
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        let session = token.into_session(1_000);
        assert_eq!(session.expires_at, Some(4_600));
        assert_eq!(session.user.email, "me@example.com");
    }

    #[test]
    fn test_sign_up_response_variants() {
        let with_session = r#"{"access_token":"a","refresh_token":"r","user":{"id":"u1","email":"x@y.z"}}"#;
        assert!(matches!(
            serde_json::from_str::<SignUpResponse>(with_session).unwrap(),
            SignUpResponse::Session(_)
        ));

        let bare = r#"{"id":"u2","email":"x@y.z","confirmation_sent_at":"2024-01-01T00:00:00Z"}"#;
        match serde_json::from_str::<SignUpResponse>(bare).unwrap() {
            SignUpResponse::User(user) => assert_eq!(user.id, "u2"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
