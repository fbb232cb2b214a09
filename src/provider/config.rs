use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const NEWS_API_KEY_VAR: &str = "NEWS_API_KEY";
pub const TMDB_API_KEY_VAR: &str = "TMDB_API_KEY";

/// Configuration for the content providers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// NewsAPI base URL (default: https://newsapi.org/v2)
    pub news_base_url: String,

    /// TMDB base URL (default: https://api.themoviedb.org/3)
    pub tmdb_base_url: String,

    /// Articles requested per category and page (default: 10)
    pub page_size: u32,

    /// HTTP request timeout in seconds (default: 10)
    pub http_timeout_secs: u64,

    /// Upper bound for any single provider call, in seconds (default: 15)
    pub provider_timeout_secs: u64,

    /// Simulated latency of the social feed in milliseconds (default: 500)
    pub social_latency_ms: u64,

    /// Maximum category article requests in flight at once (default: 4)
    pub max_concurrency: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            news_base_url: "https://newsapi.org/v2".to_string(),
            tmdb_base_url: "https://api.themoviedb.org/3".to_string(),
            page_size: 10,
            http_timeout_secs: 10,
            provider_timeout_secs: 15,
            social_latency_ms: 500,
            max_concurrency: 4,
        }
    }
}

impl ProviderConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn social_latency(&self) -> Duration {
        Duration::from_millis(self.social_latency_ms)
    }
}

/// Read an API key from the environment, falling back to `"demo"`.
pub fn api_key_from_env(var: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .unwrap_or_else(|| "demo".to_string())
}
