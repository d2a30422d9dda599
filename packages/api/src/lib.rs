//! # API crate: auth, authorization and data access for the portfolio
//!
//! Everything the UI needs to talk to the hosted backend, without any UI type.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | `SUPABASE_URL` / `SUPABASE_ANON_KEY` loading |
//! | [`supabase`] | [`SupabaseClient`], the HTTP implementation of [`store::RemoteDataService`] |
//! | [`session`] | [`SessionStore`]: session, user, admin flag, loading; ordered auth-change handling |
//! | [`guard`] | Route guard decision (`Wait` / `Redirect` / `Render`) |
//! | [`catalog`] | Project and experience list/form operations, image upload, public listing helpers |
//! | [`register`] | Sign-up plus profile insert |
//!
//! The application uses [`Backend`] as its concrete Remote Data Service; tests
//! use [`store::MemoryBackend`].

pub mod catalog;
pub mod config;
mod error;
pub mod guard;
pub mod register;
pub mod session;
pub mod supabase;

pub use catalog::{Catalog, ImageUpload};
pub use config::{ConfigError, ServiceConfig};
pub use error::AppError;
pub use guard::{decide, leave_auth_page, GuardDecision, GuardTarget};
pub use register::{register, Registration};
pub use session::{AuthError, AuthPhase, AuthState, SessionStore};
pub use supabase::SupabaseClient;

/// Remote Data Service used by the application.
pub type Backend = SupabaseClient;
