//! Execution context for gist inliner operations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::errors::{InlinerError, Result};
use crate::fetch::{GistSource, HttpSource};
use crate::io::{FileStore, RealFileStore};

/// Context for gist inliner operations.
///
/// Contains configuration, document storage and the gist source.
/// Cloning is cheap: storage and source are shared.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration.
    pub config: Config,
    /// Document storage.
    pub store: Arc<dyn FileStore>,
    /// Where raw gist bodies are fetched from.
    pub source: Arc<dyn GistSource>,
    /// Base directory for operations.
    pub base_dir: PathBuf,
}

impl Context {
    /// Creates a new context backed by the real file system and HTTP.
    pub fn new(config: Config, base_dir: PathBuf) -> Result<Self> {
        let source = Arc::new(HttpSource::new(&config.fetch)?);
        let store = Arc::new(RealFileStore::new(base_dir.clone()));

        Ok(Self {
            config,
            store,
            source,
            base_dir,
        })
    }

    /// Creates a context with default configuration.
    pub fn default_for_dir(base_dir: PathBuf) -> Result<Self> {
        Self::new(Config::default(), base_dir)
    }

    /// Creates a context from the current directory.
    pub fn from_current_dir() -> Result<Self> {
        let base_dir = std::env::current_dir()?;
        let config = crate::config::read_config(&base_dir).unwrap_or_default();
        Self::new(config, base_dir)
    }

    /// Replaces the document storage.
    pub fn with_store(mut self, store: Arc<dyn FileStore>) -> Self {
        self.store = store;
        self
    }

    /// Replaces the gist source.
    pub fn with_source(mut self, source: Arc<dyn GistSource>) -> Self {
        self.source = source;
        self
    }

    /// Returns markdown files matching the configured source patterns.
    ///
    /// Paths are relative to `base_dir`, sorted and de-duplicated. An
    /// invalid pattern fails the whole scan.
    pub fn source_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for pattern in &self.config.source_patterns {
            glob::Pattern::new(pattern)?;
            files.extend(self.store.glob(pattern)?);
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Returns source files filtered to only include the specified paths.
    ///
    /// Each filter path is resolved against `base_dir`. Returns an error if
    /// any filter path is not a known source file.
    pub fn source_files_filtered(&self, filter: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let all_files = self.source_files()?;

        let mut result = Vec::new();
        for filter_path in filter {
            let resolved = self.resolve_path(filter_path);
            match all_files.iter().find(|f| self.resolve_path(f) == resolved) {
                Some(found) => result.push(found.clone()),
                None => {
                    return Err(InlinerError::Config(format!(
                        "File {} is not a source file (does not match source_patterns)",
                        filter_path.display()
                    )))
                }
            }
        }

        result.sort();
        result.dedup();
        Ok(result)
    }

    /// Returns source files matching any of the given glob patterns.
    ///
    /// Only files that are both matched by a glob and present in
    /// `source_files()` are returned. Returns an error if a pattern
    /// matches no source files.
    pub fn source_files_glob(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
        let all_files = self.source_files()?;
        let mut matched = Vec::new();
        for pattern in patterns {
            glob::Pattern::new(pattern)?;
            let expanded = self.store.glob(pattern)?;
            let before = matched.len();
            matched.extend(expanded.into_iter().filter(|p| all_files.contains(p)));
            if matched.len() == before {
                return Err(InlinerError::Config(format!(
                    "Glob pattern '{}' matched no source files",
                    pattern
                )));
            }
        }
        matched.sort();
        matched.dedup();
        Ok(matched)
    }

    /// Resolves a path relative to the base directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
