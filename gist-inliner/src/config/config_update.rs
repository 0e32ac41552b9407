//! Configuration update and merging.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::config_data::{Config, FetchConfig, WatchConfig};
use super::write_policy::WritePolicy;

/// Partial configuration update that can be merged into a Config.
///
/// All fields are optional. Only specified fields will override the base config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigUpdate {
    /// Glob patterns for markdown posts.
    #[serde(default)]
    pub source_patterns: Option<Vec<String>>,

    /// Language tag for inlined code blocks.
    #[serde(default)]
    pub language: Option<String>,

    /// Raw path segment appended to gist links.
    #[serde(default)]
    pub raw_suffix: Option<String>,

    /// When converted documents are written back.
    #[serde(default)]
    pub write_policy: Option<WritePolicy>,

    /// HTTP fetch configuration.
    #[serde(default)]
    pub fetch: Option<FetchConfig>,

    /// Watch configuration.
    #[serde(default)]
    pub watch: Option<WatchConfig>,

    /// Keys not recognised above.
    #[serde(default, flatten)]
    pub extra: HashMap<String, toml::Value>,
}

impl ConfigUpdate {
    /// Returns the unrecognised top-level keys, sorted.
    pub fn unknown_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.extra.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Merges this update into a base configuration, returning a new Config.
    ///
    /// Consumes `self` so fields can be moved instead of cloned.
    pub fn merge_into(self, base: &Config) -> Config {
        Config {
            source_patterns: self
                .source_patterns
                .unwrap_or_else(|| base.source_patterns.clone()),
            language: self.language.unwrap_or_else(|| base.language.clone()),
            raw_suffix: self.raw_suffix.unwrap_or_else(|| base.raw_suffix.clone()),
            write_policy: self.write_policy.unwrap_or(base.write_policy),
            fetch: self.fetch.unwrap_or_else(|| base.fetch.clone()),
            watch: self.watch.unwrap_or_else(|| base.watch.clone()),
            extra: {
                let mut merged = base.extra.clone();
                merged.extend(self.extra);
                merged
            },
        }
    }
}

impl From<ConfigUpdate> for Config {
    fn from(update: ConfigUpdate) -> Self {
        update.merge_into(&Config::default())
    }
}
