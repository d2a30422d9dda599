//! Remote Data Service configuration from environment variables.
//!
//! Native builds load `.env` via `dotenvy` and read the process environment.
//! WASM builds have no process environment, so the values are baked in at
//! compile time (`SUPABASE_URL=... dx build`).

use thiserror::Error;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("SUPABASE_URL is not a valid URL: {0}")]
    InvalidUrl(String),
}

/// Service URL and anonymous API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL without trailing slash, e.g. `https://abc.supabase.co`.
    pub url: String,
    pub anon_key: String,
}

impl ServiceConfig {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        let anon_key = anon_key.trim();
        if url.is_empty() {
            return Err(ConfigError::Missing(URL_VAR));
        }
        if anon_key.is_empty() {
            return Err(ConfigError::Missing(ANON_KEY_VAR));
        }
        reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    /// Read both values from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        #[cfg(not(target_arch = "wasm32"))]
        dotenvy::dotenv().ok();

        Self::from_lookup(read_var)
    }

    /// Read both values through `lookup`, treating blank values as missing.
    pub fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(URL_VAR))?;
        let anon_key = lookup(ANON_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(ANON_KEY_VAR))?;
        Self::new(&url, &anon_key)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_var(name: &'static str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(target_arch = "wasm32")]
fn read_var(name: &'static str) -> Option<String> {
    let value = match name {
        URL_VAR => option_env!("SUPABASE_URL"),
        ANON_KEY_VAR => option_env!("SUPABASE_ANON_KEY"),
        _ => None,
    };
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'static str, &'static str)]) -> impl Fn(&'static str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_reads_both_values() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (URL_VAR, "https://abc.supabase.co/"),
            (ANON_KEY_VAR, "anon"),
        ]))
        .unwrap();
        assert_eq!(config.url, "https://abc.supabase.co");
        assert_eq!(config.anon_key, "anon");
    }

    #[test]
    fn test_blank_values_are_missing() {
        assert_eq!(
            ServiceConfig::from_lookup(lookup(&[(URL_VAR, "https://abc.supabase.co")])),
            Err(ConfigError::Missing(ANON_KEY_VAR))
        );
        assert_eq!(
            ServiceConfig::from_lookup(lookup(&[(URL_VAR, "  "), (ANON_KEY_VAR, "anon")])),
            Err(ConfigError::Missing(URL_VAR))
        );
    }

    #[test]
    fn test_rejects_malformed_url() {
        assert!(matches!(
            ServiceConfig::new("not a url", "anon"),
            Err(ConfigError::InvalidUrl(_))
        ));
    }
}
