//! Environment-driven client configuration.

use std::time::Duration;

use url::Url;

use crate::error::ApiError;

/// Production host of the AppTweak API.
pub const DEFAULT_BASE_URL: &str = "https://api.apptweak.com";

pub const TOKEN_VAR: &str = "APPTWEAK_TOKEN";
pub const BASE_URL_VAR: &str = "APPTWEAK_BASE_URL";
pub const TIMEOUT_VAR: &str = "APPTWEAK_TIMEOUT_SECS";

/// Settings needed to build a production `AuthClient`.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    /// Origin every request is rewritten to.
    pub base_url: Url,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(token: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            token: token.into(),
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            timeout: None,
        })
    }

    /// Read `APPTWEAK_TOKEN`, `APPTWEAK_BASE_URL` and `APPTWEAK_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{TOKEN_VAR} is not set")))?;

        let mut config = Self::new(token.trim())?;

        if let Some(raw) = lookup(BASE_URL_VAR) {
            config.base_url = Url::parse(raw.trim())
                .map_err(|e| ApiError::Config(format!("{BASE_URL_VAR}={raw}: {e}")))?;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ApiError::Config(format!("{TIMEOUT_VAR}={raw}: {e}")))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}
