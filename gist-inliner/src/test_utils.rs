//! Shared test utilities.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::fetch::StaticSource;
use crate::interface::Context;
use crate::io::MemoryStore;

pub const GIST_A: &str = "https://gist.github.com/octocat/aa11";
pub const RAW_A: &str = "https://gist.github.com/octocat/aa11/raw";
pub const GIST_B: &str = "https://gist.github.com/octocat/bb22";
pub const RAW_B: &str = "https://gist.github.com/octocat/bb22/raw";

/// Creates a context over an in-memory store and a fixed gist source.
pub fn memory_context(
    files: &[(&str, &str)],
    responses: &[(&str, u16, &str)],
) -> (Context, Arc<MemoryStore>, Arc<StaticSource>) {
    let store = Arc::new(MemoryStore::new());
    for (path, content) in files {
        store.add_file(*path, *content);
    }

    let source = Arc::new(
        responses
            .iter()
            .fold(StaticSource::new(), |s, (url, status, body)| {
                s.with_response(*url, *status, *body)
            }),
    );

    let mut config = Config::default();
    config.source_patterns = vec!["pages/**/*.md".to_string()];

    let ctx = Context::new(config, PathBuf::from("."))
        .unwrap()
        .with_store(store.clone())
        .with_source(source.clone());

    (ctx, store, source)
}
