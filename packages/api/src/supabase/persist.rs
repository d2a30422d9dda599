//! Session persistence across page loads.
//!
//! On the web the session lives in `localStorage` under `portfolio.auth.session`, so a
//! reload rehydrates the signed-in user. Native builds keep it in memory only.

use store::Session;

#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "portfolio.auth.session";

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn load() -> Option<Session> {
    let raw = local_storage()?.get_item(STORAGE_KEY).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("Discarding unreadable persisted session: {e}");
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn save(session: Option<&Session>) {
    let Some(storage) = local_storage() else {
        return;
    };
    let result = match session {
        Some(session) => match serde_json::to_string(session) {
            Ok(raw) => storage.set_item(STORAGE_KEY, &raw),
            Err(e) => {
                tracing::warn!("Could not serialise session: {e}");
                return;
            }
        },
        None => storage.remove_item(STORAGE_KEY),
    };
    if result.is_err() {
        tracing::warn!("Could not update persisted session");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn load() -> Option<Session> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn save(_session: Option<&Session>) {}
