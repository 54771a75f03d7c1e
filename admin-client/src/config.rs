//! Client configuration
//!
//! Values come from the environment (after `.env` is loaded) and can be
//! overridden with the `with_*` builders.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BACKEND_URL` | `https://api.sainidryfruits.com` |
//! | `TRANSLATE_API_URL` | `https://api.mymemory.translated.net/get` |
//! | `REQUEST_TIMEOUT_SECS` | 30 |
//! | `TRANSLATION_DEBOUNCE_MS` | 800 |
//! | `PRICE_HISTORY_POINTS` | 10 |
//! | `CONSOLE_STATE_PATH` | unset (in-memory state) |
//! | `LOG_LEVEL` | `info` |

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "https://api.sainidryfruits.com";
pub const DEFAULT_TRANSLATE_URL: &str = "https://api.mymemory.translated.net/get";

/// Console client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g. "https://api.sainidryfruits.com")
    pub base_url: String,

    /// Translator lookup endpoint
    pub translate_url: String,

    /// Bearer token, when the backend session provides one
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Quiescence before a translation fires
    pub translation_debounce: Duration,

    /// Price history points kept per product
    pub price_history_points: usize,

    /// File backing the key-value store; in-memory when unset
    pub state_path: Option<PathBuf>,

    pub log_level: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            token: None,
            timeout: 30,
            translation_debounce: Duration::from_millis(800),
            price_history_points: 10,
            state_path: None,
            log_level: "info".to_string(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let base_url = std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into());

        let mut config = Self::new(base_url);
        config.translate_url =
            std::env::var("TRANSLATE_API_URL").unwrap_or_else(|_| DEFAULT_TRANSLATE_URL.into());
        config.token = std::env::var("BACKEND_TOKEN").ok().filter(|t| !t.is_empty());
        config.timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        config.translation_debounce = Duration::from_millis(
            std::env::var("TRANSLATION_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(800),
        );
        config.price_history_points = std::env::var("PRICE_HISTORY_POINTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        config.state_path = std::env::var("CONSOLE_STATE_PATH").ok().map(PathBuf::from);
        config.log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
        config
    }

    /// Set the translator endpoint
    pub fn with_translate_url(mut self, url: impl Into<String>) -> Self {
        self.translate_url = url.into();
        self
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_translation_debounce(mut self, debounce: Duration) -> Self {
        self.translation_debounce = debounce;
        self
    }

    pub fn with_price_history_points(mut self, points: usize) -> Self {
        self.price_history_points = points;
        self
    }

    /// Persist console state (approval overrides) to this file
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    /// Absolute URL for an API path such as `/api/products`
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_single_slash() {
        let config = ClientConfig::new("http://localhost:8080/");
        assert_eq!(config.url("/api/products"), "http://localhost:8080/api/products");
        assert_eq!(config.url("api/users"), "http://localhost:8080/api/users");
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::default()
            .with_timeout(5)
            .with_translation_debounce(Duration::from_millis(100))
            .with_price_history_points(3);
        assert_eq!(config.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.timeout, 5);
        assert_eq!(config.translation_debounce, Duration::from_millis(100));
        assert_eq!(config.price_history_points, 3);
        assert!(config.state_path.is_none());
    }
}
