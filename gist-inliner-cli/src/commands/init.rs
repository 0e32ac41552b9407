//! Init command implementation.

use std::path::Path;

use gist_inliner::errors::{InlinerError, Result};

const DEFAULT_CONFIG: &str = r##"# Glob patterns for markdown posts, relative to this file
source_patterns = ["src/pages/**/*.md"]

# Language tag for inlined code blocks
language = "js"

# Appended to each gist link to fetch its raw body
raw_suffix = "raw"

# When converted posts are written back
# Options: "once" (default), "per-shortcode"
write_policy = "once"

[fetch]
# Per-request timeout in seconds (0 disables it)
timeout_secs = 30
# Number of posts processed at once
concurrency = 4

[watch]
debounce_ms = 100
# exclude = ["src/pages/drafts/**"]
"##;

/// Executes the init command.
pub fn init(base_dir: &Path) -> Result<()> {
    let config_path = base_dir.join("gist-inliner.toml");

    if config_path.exists() {
        return Err(InlinerError::Config(format!(
            "{} already exists",
            config_path.display()
        )));
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("Created {}", config_path.display());

    Ok(())
}
