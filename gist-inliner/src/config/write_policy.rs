//! Write policy configuration.

use serde::{Deserialize, Serialize};

/// When a document's in-memory content is flushed to disk.
///
/// Only shortcodes whose fetch returned 200 are ever substituted, so both
/// policies persist the same final content. They differ in how often the
/// file is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum WritePolicy {
    /// Write once after every shortcode in the file has been handled.
    #[default]
    Once,

    /// Rewrite the whole file after each successful substitution.
    PerShortcode,
}

impl WritePolicy {
    /// Returns true if the file is rewritten after every substitution.
    pub fn writes_each(&self) -> bool {
        matches!(self, WritePolicy::PerShortcode)
    }
}
