//! Hosted identity service configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the external identity & session provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Which provider to use: `"http"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Base URL of the hosted identity REST API.
    #[serde(default)]
    pub base_url: String,
    /// Public API key sent with every request.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// How long the access gate waits for session resolution before
    /// failing closed, in milliseconds.
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_ms: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: String::new(),
            api_key: String::new(),
            request_timeout_seconds: default_request_timeout(),
            resolve_timeout_ms: default_resolve_timeout(),
        }
    }
}

fn default_provider() -> String {
    "http".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_resolve_timeout() -> u64 {
    5000
}
