//! Runtime configuration.
//!
//! Sane defaults for a local platform, overridable from the environment.

use std::path::PathBuf;

/// Complete console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the platform REST API.
    pub api_url: String,
    /// URL of the push channel endpoint.
    pub websocket_url: String,
    /// Path of the local preference file.
    pub prefs_path: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080".to_string(),
            websocket_url: "ws://127.0.0.1:8081/push".to_string(),
            prefs_path: PathBuf::from("./console-prefs.json"),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration, letting environment variables override defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("CONSOLE_API_URL") {
            config.api_url = url;
        }
        if let Ok(url) = std::env::var("CONSOLE_WS_URL") {
            config.websocket_url = url;
        }
        if let Ok(path) = std::env::var("CONSOLE_PREFS") {
            config.prefs_path = PathBuf::from(path);
        }
        config
    }
}
