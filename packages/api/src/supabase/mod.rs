//! # Supabase-backed Remote Data Service
//!
//! [`SupabaseClient`] talks to the hosted auth (GoTrue), table (PostgREST) and
//! storage endpoints over `reqwest`, and implements
//! [`RemoteDataService`](store::RemoteDataService).
//!
//! Every request carries the `apikey` header. `Authorization` carries the
//! current session's access token, or the anon key when signed out, so row
//! level security sees the caller.
//!
//! A client built without configuration is *inert*: it never touches the
//! network and answers every call with [`RemoteError::NotConfigured`]. The UI
//! still renders (signed out, empty lists) instead of crashing.

mod gotrue;
mod persist;
pub mod postgrest;

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use store::{
    AuthChange, AuthListeners, AuthSubscription, Experience, ExperienceDraft, NewProfile, Profile,
    Project, ProjectDraft, RemoteDataService, RemoteError, Session, SignUp,
};

use crate::config::ServiceConfig;
use gotrue::{error_message, PasswordGrant, RefreshGrant, SignUpResponse, TokenResponse};
use postgrest::{TableQuery, EXPERIENCES, PROFILES, PROJECTS};

/// Storage bucket holding project images.
pub const IMAGE_BUCKET: &str = "portfolio";

/// Refresh this many seconds before the access token actually expires.
const REFRESH_MARGIN_SECS: i64 = 30;

/// Whether `session` should be refreshed before it is used at `now`.
fn needs_refresh(session: &Session, now: i64) -> bool {
    session.is_expired_at(now + REFRESH_MARGIN_SECS)
}

struct Inner {
    config: Option<ServiceConfig>,
    http: reqwest::Client,
    session: Mutex<Option<Session>>,
    listeners: AuthListeners,
}

/// HTTP client for the hosted backend. Cheap to clone.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("url", &self.inner.config.as_ref().map(|c| c.url.as_str()))
            .finish_non_exhaustive()
    }
}

/// Insert body: generated columns followed by the draft's fields.
#[derive(Serialize)]
struct NewRow<'a, T> {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    fields: &'a T,
}

#[derive(Serialize)]
struct FeaturedPatch {
    featured: bool,
}

impl SupabaseClient {
    pub fn new(config: ServiceConfig) -> Self {
        Self::build(Some(config))
    }

    /// A client with no backend behind it.
    pub fn inert() -> Self {
        Self::build(None)
    }

    /// Configure from `SUPABASE_URL` / `SUPABASE_ANON_KEY`, falling back to an
    /// inert client when they are missing or invalid.
    pub fn from_env() -> Self {
        match ServiceConfig::from_env() {
            Ok(config) => {
                tracing::info!(url = %config.url, "Remote data service configured");
                Self::new(config)
            }
            Err(e) => {
                tracing::error!("Remote data service disabled: {e}");
                Self::inert()
            }
        }
    }

    fn build(config: Option<ServiceConfig>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                http: reqwest::Client::new(),
                session: Mutex::new(None),
                listeners: AuthListeners::new(),
            }),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.config.is_some()
    }

    fn config(&self) -> Result<&ServiceConfig, RemoteError> {
        self.inner.config.as_ref().ok_or(RemoteError::NotConfigured)
    }

    fn current_session(&self) -> Option<Session> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store_session(&self, session: Option<Session>) {
        persist::save(session.as_ref());
        *self
            .inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        let config = self.config()?;
        Url::parse(&format!("{}{path}", config.url)).map_err(|e| RemoteError::Http(e.to_string()))
    }

    /// Public URL of an object in [`IMAGE_BUCKET`].
    pub fn public_url(&self, path: &str) -> Result<String, RemoteError> {
        let config = self.config()?;
        Ok(format!(
            "{}/storage/v1/object/public/{IMAGE_BUCKET}/{path}",
            config.url
        ))
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, RemoteError> {
        let bearer = self.current_session().map(|s| s.access_token);
        self.request_as(method, url, bearer)
    }

    fn request_as(
        &self,
        method: Method,
        url: Url,
        bearer: Option<String>,
    ) -> Result<RequestBuilder, RemoteError> {
        let config = self.config()?;
        let bearer = bearer.unwrap_or_else(|| config.anon_key.clone());
        Ok(self
            .inner
            .http
            .request(method, url)
            .header("apikey", &config.anon_key)
            .bearer_auth(bearer))
    }

    /// Request carrying a session token that is still valid, refreshing it
    /// first when it has expired.
    async fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder, RemoteError> {
        self.config()?;
        let bearer = self.fresh_session().await.map(|s| s.access_token);
        self.request_as(method, url, bearer)
    }

    async fn table(&self, method: Method, query: &TableQuery) -> Result<RequestBuilder, RemoteError> {
        let url = query.url(&self.config()?.url)?;
        self.authorized(method, url).await
    }

    async fn send(request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status.as_u16(), &body);
        tracing::debug!(status = status.as_u16(), %message, "remote call failed");
        Err(RemoteError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
        Self::send(request)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn send_empty(request: RequestBuilder) -> Result<(), RemoteError> {
        Self::send(request).await.map(|_| ())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, RemoteError> {
        let url = self.endpoint("/auth/v1/token?grant_type=refresh_token")?;
        // Authorised by the anon key; the access token has expired.
        let token: TokenResponse = Self::send_json(
            self.request_as(Method::POST, url, None)?
                .json(&RefreshGrant { refresh_token }),
        )
        .await?;
        Ok(token.into_session(Utc::now().timestamp()))
    }

    /// Current session, refreshed once if it is expired or about to expire.
    ///
    /// A successful refresh is stored and announced as
    /// [`AuthChange::TokenRefreshed`]. A failed one drops the session and
    /// announces [`AuthChange::SignedOut`].
    async fn fresh_session(&self) -> Option<Session> {
        let session = self.current_session()?;
        if !needs_refresh(&session, Utc::now().timestamp()) {
            return Some(session);
        }

        tracing::debug!(user = %session.user.id, "Access token expired, refreshing");
        match self.refresh(&session.refresh_token).await {
            Ok(fresh) => {
                self.store_session(Some(fresh.clone()));
                self.inner
                    .listeners
                    .notify(AuthChange::TokenRefreshed(fresh.clone()));
                Some(fresh)
            }
            Err(e) => {
                tracing::warn!("Session refresh failed, signing out locally: {e}");
                self.store_session(None);
                self.inner.listeners.notify(AuthChange::SignedOut);
                None
            }
        }
    }

    /// Invalidate the current session's refresh token on the server.
    async fn revoke(&self) -> Result<(), RemoteError> {
        let url = self.endpoint("/auth/v1/logout")?;
        Self::send_empty(self.request(Method::POST, url)?).await
    }

    /// First row of a representation response.
    async fn single<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
        let rows: Vec<T> = Self::send_json(request).await?;
        rows.into_iter().next().ok_or(RemoteError::NotFound)
    }

    async fn insert_row<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &'static str,
        row: &NewRow<'_, T>,
    ) -> Result<R, RemoteError> {
        let request = self
            .table(Method::POST, &TableQuery::from(table).select("*"))
            .await?
            .header("Prefer", "return=representation")
            .json(row);
        Self::single(request).await
    }

    async fn update_row<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &'static str,
        id: &str,
        body: &T,
    ) -> Result<R, RemoteError> {
        let request = self
            .table(Method::PATCH, &TableQuery::from(table).select("*").eq("id", id))
            .await?
            .header("Prefer", "return=representation")
            .json(body);
        Self::single(request).await
    }

    async fn delete_row(&self, table: &'static str, id: &str) -> Result<(), RemoteError> {
        let request = self
            .table(Method::DELETE, &TableQuery::from(table).eq("id", id))
            .await?;
        Self::send_empty(request).await
    }
}

impl RemoteDataService for SupabaseClient {
    async fn get_session(&self) -> Result<Option<Session>, RemoteError> {
        self.config()?;
        if self.current_session().is_none() {
            match persist::load() {
                Some(session) => {
                    *self
                        .inner
                        .session
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner) = Some(session);
                }
                None => return Ok(None),
            }
        }
        Ok(self.fresh_session().await)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, RemoteError> {
        let url = self.endpoint("/auth/v1/token?grant_type=password")?;
        let token: TokenResponse = Self::send_json(
            self.request(Method::POST, url)?
                .json(&PasswordGrant { email, password }),
        )
        .await?;
        let session = token.into_session(Utc::now().timestamp());
        self.store_session(Some(session.clone()));
        self.inner
            .listeners
            .notify(AuthChange::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, RemoteError> {
        let url = self.endpoint("/auth/v1/signup")?;
        let response: SignUpResponse = Self::send_json(
            self.request(Method::POST, url)?
                .json(&PasswordGrant { email, password }),
        )
        .await?;
        match response {
            SignUpResponse::Session(token) => {
                let session = token.into_session(Utc::now().timestamp());
                self.store_session(Some(session.clone()));
                self.inner
                    .listeners
                    .notify(AuthChange::SignedIn(session.clone()));
                Ok(SignUp {
                    user: session.user.clone(),
                    session: Some(session),
                })
            }
            SignUpResponse::User(user) => Ok(SignUp {
                user,
                session: None,
            }),
        }
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        let result = match self.current_session() {
            Some(_) => self.revoke().await,
            None => self.config().map(|_| ()),
        };
        self.store_session(None);
        self.inner.listeners.notify(AuthChange::SignedOut);
        result
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        self.inner.listeners.subscribe()
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, RemoteError> {
        let query = TableQuery::from(PROFILES)
            .select("*")
            .eq("id", user_id)
            .limit(1);
        let rows: Vec<Profile> = Self::send_json(self.table(Method::GET, &query).await?).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<(), RemoteError> {
        let request = self
            .table(Method::POST, &TableQuery::from(PROFILES))
            .await?
            .header("Prefer", "return=minimal")
            .json(profile);
        Self::send_empty(request).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, RemoteError> {
        let query = TableQuery::from(PROJECTS)
            .select("*")
            .order_desc("created_at");
        Self::send_json(self.table(Method::GET, &query).await?).await
    }

    async fn get_project(&self, id: &str) -> Result<Project, RemoteError> {
        let query = TableQuery::from(PROJECTS).select("*").eq("id", id);
        Self::single(self.table(Method::GET, &query).await?).await
    }

    async fn insert_project(&self, draft: &ProjectDraft) -> Result<Project, RemoteError> {
        let row = NewRow {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Some(Utc::now()),
            fields: draft,
        };
        self.insert_row(PROJECTS, &row).await
    }

    async fn update_project(&self, id: &str, draft: &ProjectDraft) -> Result<Project, RemoteError> {
        self.update_row(PROJECTS, id, draft).await
    }

    async fn set_project_featured(&self, id: &str, featured: bool) -> Result<(), RemoteError> {
        let _: Project = self
            .update_row(PROJECTS, id, &FeaturedPatch { featured })
            .await?;
        Ok(())
    }

    async fn delete_project(&self, id: &str) -> Result<(), RemoteError> {
        self.delete_row(PROJECTS, id).await
    }

    async fn list_experiences(&self) -> Result<Vec<Experience>, RemoteError> {
        let query = TableQuery::from(EXPERIENCES)
            .select("*")
            .order_desc("start_date");
        Self::send_json(self.table(Method::GET, &query).await?).await
    }

    async fn get_experience(&self, id: &str) -> Result<Experience, RemoteError> {
        let query = TableQuery::from(EXPERIENCES).select("*").eq("id", id);
        Self::single(self.table(Method::GET, &query).await?).await
    }

    async fn insert_experience(&self, draft: &ExperienceDraft) -> Result<Experience, RemoteError> {
        let row = NewRow {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: None,
            fields: draft,
        };
        self.insert_row(EXPERIENCES, &row).await
    }

    async fn update_experience(
        &self,
        id: &str,
        draft: &ExperienceDraft,
    ) -> Result<Experience, RemoteError> {
        self.update_row(EXPERIENCES, id, draft).await
    }

    async fn delete_experience(&self, id: &str) -> Result<(), RemoteError> {
        self.delete_row(EXPERIENCES, id).await
    }

    async fn upload_image(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RemoteError> {
        let url = self.endpoint(&format!("/storage/v1/object/{IMAGE_BUCKET}/{path}"))?;
        let request = self
            .authorized(Method::POST, url)
            .await?
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        Self::send_empty(request).await?;
        tracing::info!(%path, "Uploaded image");
        self.public_url(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::User;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const FRESH_TOKEN: &str = r#"{
        "access_token": "fresh",
        "refresh_token": "fresh-refresh",
        "expires_in": 3600,
        "user": { "id": "u1", "email": "u1@example.com" }
    }"#;

    /// Request line and bearer token of every request the stub answered.
    type Seen = Arc<Mutex<Vec<(String, String)>>>;

    fn configured() -> SupabaseClient {
        SupabaseClient::new(ServiceConfig::new("https://abc.supabase.co", "anon").unwrap())
    }

    fn expired_session() -> Session {
        Session {
            access_token: "stale".into(),
            refresh_token: "stale-refresh".into(),
            expires_at: Some(1),
            user: User {
                id: "u1".into(),
                email: "u1@example.com".into(),
            },
        }
    }

    /// Local HTTP/1.1 server that answers the refresh grant with
    /// [`FRESH_TOKEN`] and every other request with an empty JSON array.
    async fn stub_server() -> (String, Seen) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let seen: Seen = Arc::default();
        let log = seen.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let head = read_head(&mut socket).await;
                let request_line = head.lines().next().unwrap_or_default().to_string();
                let bearer = head
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
                    .map(|(_, value)| value.trim().trim_start_matches("Bearer ").to_string())
                    .unwrap_or_default();
                let body = if request_line.contains("grant_type=refresh_token") {
                    FRESH_TOKEN
                } else {
                    "[]"
                };
                log.lock().unwrap().push((request_line, bearer));
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        (base, seen)
    }

    /// Read one request and return its head (request line and headers).
    async fn read_head(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let mut head_end = None;
        loop {
            if let Some(end) = head_end {
                let head = String::from_utf8_lossy(&buf[..end]).to_string();
                let body_len = head
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    return head;
                }
            }
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return String::from_utf8_lossy(&buf).to_string();
            }
            buf.extend_from_slice(&chunk[..n]);
            if head_end.is_none() {
                head_end = buf.windows(4).position(|w| w == b"\r\n\r\n");
            }
        }
    }

    #[test]
    fn test_refresh_margin() {
        let mut session = expired_session();
        session.expires_at = Some(1_000);
        assert!(!needs_refresh(&session, 1_000 - REFRESH_MARGIN_SECS - 1));
        assert!(needs_refresh(&session, 1_000 - REFRESH_MARGIN_SECS));

        session.expires_at = None;
        assert!(!needs_refresh(&session, i64::MAX - REFRESH_MARGIN_SECS));
    }

    #[tokio::test]
    async fn test_expired_token_refreshed_before_table_call() {
        let (base, seen) = stub_server().await;
        let client = SupabaseClient::new(ServiceConfig::new(&base, "anon").unwrap());
        let mut sub = client.on_auth_state_change();
        client.store_session(Some(expired_session()));

        assert_eq!(client.list_projects().await, Ok(vec![]));

        match sub.recv().await {
            Some(AuthChange::TokenRefreshed(session)) => assert_eq!(session.access_token, "fresh"),
            other => panic!("expected a token refresh, got {other:?}"),
        }
        assert_eq!(
            client.current_session().map(|s| s.access_token),
            Some("fresh".to_string())
        );

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].0.starts_with("POST /auth/v1/token?grant_type=refresh_token"));
        assert_eq!(seen[0].1, "anon");
        assert!(seen[1].0.starts_with("GET /rest/v1/projects"));
        assert_eq!(seen[1].1, "fresh");
    }

    #[tokio::test]
    async fn test_failed_refresh_signs_out() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let client =
            SupabaseClient::new(ServiceConfig::new(&format!("http://{addr}"), "anon").unwrap());
        let mut sub = client.on_auth_state_change();
        client.store_session(Some(expired_session()));

        assert_eq!(client.get_session().await, Ok(None));
        assert_eq!(sub.recv().await, Some(AuthChange::SignedOut));
        assert!(client.current_session().is_none());
    }

    #[tokio::test]
    async fn test_inert_client_reports_not_configured() {
        let client = SupabaseClient::inert();
        assert!(!client.is_configured());
        assert_eq!(client.get_session().await, Err(RemoteError::NotConfigured));
        assert_eq!(client.list_projects().await, Err(RemoteError::NotConfigured));
        assert_eq!(
            client.sign_in_with_password("a@b.c", "secret").await,
            Err(RemoteError::NotConfigured)
        );
    }

    #[tokio::test]
    async fn test_inert_sign_out_still_notifies() {
        let client = SupabaseClient::inert();
        let mut sub = client.on_auth_state_change();
        assert_eq!(client.sign_out().await, Err(RemoteError::NotConfigured));
        assert_eq!(sub.recv().await, Some(AuthChange::SignedOut));
    }

    #[tokio::test]
    async fn test_signed_out_session_is_none_without_network() {
        assert_eq!(configured().get_session().await, Ok(None));
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            configured().public_url("projects/x.png").unwrap(),
            "https://abc.supabase.co/storage/v1/object/public/portfolio/projects/x.png"
        );
        assert_eq!(
            SupabaseClient::inert().public_url("projects/x.png"),
            Err(RemoteError::NotConfigured)
        );
    }

    #[test]
    fn test_new_row_flattens_draft() {
        let draft = ExperienceDraft {
            company: "Acme".into(),
            position: "Engineer".into(),
            description: "d".into(),
            start_date: "2021-01".into(),
            end_date: None,
            current: true,
            skills: vec!["Rust".into()],
            location: "Remote".into(),
        };
        let row = NewRow {
            id: "e1".into(),
            created_at: None,
            fields: &draft,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["id"], "e1");
        assert_eq!(value["company"], "Acme");
        assert!(value.get("created_at").is_none());
    }
}
