use crate::error::ConfigError;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8888";
pub const API_URL_ENV: &str = "PERSONALITY_API_URL";

/// Process-wide settings, resolved once at startup and handed to the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    api_url: String,
}

impl Config {
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        let trimmed = api_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
            url: api_url.to_string(),
            source,
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self {
                api_url: trimmed.to_string(),
            }),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }

    /// The configured URL, or the local default when none or a blank one is given.
    /// Environment lookup belongs to the caller (`--api-url` reads `PERSONALITY_API_URL`).
    pub fn resolve(api_url: Option<&str>) -> Result<Self, ConfigError> {
        let url = api_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_API_URL);
        Self::new(url)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}
