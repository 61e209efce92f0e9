use std::path::PathBuf;

/// Environment variable holding the answer service endpoint.
pub const API_URL_ENV: &str = "CHAT_API_URL";

/// Environment variable that turns on file logging.
pub const LOG_FILE_ENV: &str = "CHAT_LOG_FILE";

/// Local development endpoint used when `CHAT_API_URL` is unset or empty.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/chat/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_file: None,
        }
    }

    /// Read configuration from the process environment.
    ///
    /// Call after `dotenvy::dotenv()` so a `.env` file in the working
    /// directory can supply the values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::new();
        if let Some(url) = non_blank(API_URL_ENV) {
            config.api_url = url;
        }
        config.log_file = non_blank(LOG_FILE_ENV).map(PathBuf::from);
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
