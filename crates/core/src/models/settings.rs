use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const ENV_BACKEND_URL: &str = "FINANCE_BACKEND_URL";
pub const ENV_BACKEND_KEY: &str = "FINANCE_BACKEND_KEY";
pub const ENV_BACKEND_TOKEN: &str = "FINANCE_BACKEND_TOKEN";

/// Default usage percentage at which a budget is flagged "near limit".
pub const DEFAULT_NEAR_LIMIT_PCT: f64 = 80.0;

/// Connection details for the hosted table backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Project URL, e.g. `https://xyz.example.co` (no trailing slash)
    pub base_url: String,

    /// Public API key sent with every request
    pub api_key: String,

    /// Signed-in user's access token. Falls back to the API key when absent.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl BackendSettings {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, CoreError> {
        let settings = Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: None,
        };
        settings.validated()
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Read settings from `FINANCE_BACKEND_URL`, `FINANCE_BACKEND_KEY`
    /// and the optional `FINANCE_BACKEND_TOKEN`.
    pub fn from_env() -> Result<Self, CoreError> {
        let base_url = std::env::var(ENV_BACKEND_URL)
            .map_err(|e| CoreError::Config(format!("{ENV_BACKEND_URL}: {e}")))?;
        let api_key = std::env::var(ENV_BACKEND_KEY)
            .map_err(|e| CoreError::Config(format!("{ENV_BACKEND_KEY}: {e}")))?;
        let access_token = std::env::var(ENV_BACKEND_TOKEN).ok();
        Self {
            base_url,
            api_key,
            access_token,
        }
        .validated()
    }

    /// Token used for the `Authorization: Bearer` header.
    pub fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }

    fn validated(mut self) -> Result<Self, CoreError> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            return Err(CoreError::Config("backend base URL must not be empty".into()));
        }
        if self.api_key.trim().is_empty() {
            return Err(CoreError::Config("backend API key must not be empty".into()));
        }
        Ok(self)
    }
}

/// Library-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,

    #[serde(default = "default_near_limit_pct")]
    pub near_limit_pct: f64,
}

fn default_near_limit_pct() -> f64 {
    DEFAULT_NEAR_LIMIT_PCT
}

impl Settings {
    /// Parse settings from a JSON document and validate the backend section.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let mut settings: Settings = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("invalid settings JSON: {e}")))?;
        settings.backend = settings.backend.validated()?;
        if !settings.near_limit_pct.is_finite() || settings.near_limit_pct <= 0.0 {
            return Err(CoreError::Config(format!(
                "near_limit_pct must be a positive number, got {}",
                settings.near_limit_pct
            )));
        }
        Ok(settings)
    }

    pub fn from_env() -> Result<Self, CoreError> {
        Ok(Self {
            backend: BackendSettings::from_env()?,
            near_limit_pct: DEFAULT_NEAR_LIMIT_PCT,
        })
    }
}
