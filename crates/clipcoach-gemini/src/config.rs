//! Gemini client configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{GeminiError, GeminiResult};

/// Public Generative Language API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for [`crate::GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Single model identifier used for every generation request
    pub model: String,
    /// API root, without a trailing path
    pub base_url: Url,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Create a config for the public endpoint with default model and timeout.
    pub fn new(api_key: impl Into<String>) -> GeminiResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::config("API key is empty"));
        }
        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            timeout: Duration::from_secs(120),
        })
    }

    /// Override the API root (used for tests and proxies).
    pub fn with_base_url(mut self, base_url: &str) -> GeminiResult<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create config from environment variables.
    ///
    /// Fails when neither `GEMINI_API_KEY` nor `GOOGLE_API_KEY` is set, so a
    /// missing credential is reported before any remote call is attempted.
    pub fn from_env() -> GeminiResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GeminiResult<Self> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .ok_or_else(|| GeminiError::config("GEMINI_API_KEY not set"))?;

        let mut config = Self::new(api_key)?;

        if let Some(model) = lookup("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }
        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            config.base_url = parse_base_url(&base_url)?;
        }
        config.timeout = Duration::from_secs(
            lookup("GEMINI_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
        );

        Ok(config)
    }
}

// Never print the key.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_base_url(raw: &str) -> GeminiResult<Url> {
    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| GeminiError::config(format!("Invalid GEMINI_BASE_URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(GeminiError::config(format!(
            "Invalid GEMINI_BASE_URL scheme '{}'",
            scheme
        ))),
    }
}
