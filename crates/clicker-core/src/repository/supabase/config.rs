//! Connection settings for the Supabase project.

use thiserror::Error;

/// Build-time variable holding the project URL
pub const URL_ENV: &str = "SUPABASE_URL";
/// Build-time variable holding the public anon key
pub const ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";

/// Problems with the configured project settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Required variable is missing or blank.
    #[error("missing Supabase setting `{var}`")]
    Missing { var: &'static str },
    /// URL does not use an http(s) scheme.
    #[error("Supabase URL `{url}` must start with http:// or https://")]
    InvalidUrl { url: String },
}

/// Project URL and anon key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    /// Validate raw settings; a trailing slash on the URL is dropped.
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ConfigError::Missing { var: URL_ENV });
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl { url: url.to_string() });
        }
        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return Err(ConfigError::Missing { var: ANON_KEY_ENV });
        }
        Ok(Self {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    /// Settings baked in at compile time via `SUPABASE_URL` / `SUPABASE_ANON_KEY`
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let url = option_env!("SUPABASE_URL").ok_or(ConfigError::Missing { var: URL_ENV })?;
        let anon_key = option_env!("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing { var: ANON_KEY_ENV })?;
        Self::new(url, anon_key)
    }

    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    /// Realtime endpoint: same host with a ws(s) scheme
    pub fn realtime_url(&self) -> String {
        let socket_base = if let Some(host) = self.url.strip_prefix("https://") {
            format!("wss://{}", host)
        } else if let Some(host) = self.url.strip_prefix("http://") {
            format!("ws://{}", host)
        } else {
            self.url.clone()
        };
        format!("{}/realtime/v1/websocket?apikey={}&vsn=1.0.0", socket_base, self.anon_key)
    }
}
