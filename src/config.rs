//! Settings read from the environment. There is no settings file.

use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Variable the model lister reads its key from.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_version: String,
    /// Unset means requests wait as long as the service takes.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Reads `CODECONVERT_API_BASE_URL`, `CODECONVERT_API_VERSION` and
    /// `CODECONVERT_REQUEST_TIMEOUT_SECS` on top of the defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(config::Environment::with_prefix("CODECONVERT").try_parsing(true))
    }

    fn load_from(env: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("api_version", DEFAULT_API_VERSION)?
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
