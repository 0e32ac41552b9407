//! Configuration data structures.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use super::write_policy::WritePolicy;

/// Main configuration structure for the gist inliner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Glob patterns for markdown posts, relative to the base directory.
    #[serde(default = "default_source_patterns")]
    pub source_patterns: Vec<String>,

    /// Language tag written after the opening fence.
    #[serde(default = "default_language")]
    pub language: String,

    /// Path segment appended to a gist link to request its raw text.
    #[serde(default = "default_raw_suffix")]
    pub raw_suffix: String,

    /// When converted documents are written back to disk.
    #[serde(default)]
    pub write_policy: WritePolicy,

    /// HTTP fetch configuration.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Watch configuration.
    #[serde(default)]
    pub watch: WatchConfig,

    /// Additional custom settings.
    #[serde(default, flatten)]
    pub extra: HashMap<String, toml::Value>,
}

fn default_source_patterns() -> Vec<String> {
    vec!["src/pages/**/*.md".to_string()]
}

fn default_language() -> String {
    "js".to_string()
}

fn default_raw_suffix() -> String {
    "raw".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_patterns: default_source_patterns(),
            language: default_language(),
            raw_suffix: default_raw_suffix(),
            write_policy: WritePolicy::default(),
            fetch: FetchConfig::default(),
            watch: WatchConfig::default(),
            extra: HashMap::new(),
        }
    }
}

/// HTTP fetch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout in seconds. Zero disables the timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of files processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_concurrency() -> usize {
    4
}

fn default_user_agent() -> String {
    concat!("gist-inliner/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Returns the request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Returns the concurrency limit, clamped to what a semaphore can hold.
    pub fn concurrency(&self) -> usize {
        self.concurrency.clamp(1, Semaphore::MAX_PERMITS)
    }
}

/// Watch mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds.
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Patterns to exclude from watching.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_debounce() -> u64 {
    100
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            exclude: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source_patterns, vec!["src/pages/**/*.md"]);
        assert_eq!(config.language, "js");
        assert_eq!(config.raw_suffix, "raw");
        assert_eq!(config.write_policy, WritePolicy::Once);
        assert_eq!(config.watch.debounce_ms, 100);
    }

    #[test]
    fn test_fetch_timeout() {
        let mut fetch = FetchConfig::default();
        assert_eq!(fetch.timeout(), Some(Duration::from_secs(30)));

        fetch.timeout_secs = 0;
        assert_eq!(fetch.timeout(), None);
    }

    #[test]
    fn test_fetch_concurrency_floor() {
        let fetch = FetchConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert_eq!(fetch.concurrency(), 1);
    }

    #[test]
    fn test_fetch_concurrency_ceiling() {
        let fetch = FetchConfig {
            concurrency: usize::MAX,
            ..Default::default()
        };
        assert_eq!(fetch.concurrency(), Semaphore::MAX_PERMITS);
    }

    #[test]
    fn test_partial_toml() {
        let config: Config =
            toml::from_str("language = \"rust\"\n[fetch]\nconcurrency = 8\n").unwrap();
        assert_eq!(config.language, "rust");
        assert_eq!(config.fetch.concurrency, 8);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.source_patterns, vec!["src/pages/**/*.md"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.language, config.language);
        assert_eq!(parsed.fetch, config.fetch);
    }
}
