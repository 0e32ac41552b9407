//! Watch command implementation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use gist_inliner::errors::{InlinerError, Result};
use gist_inliner::interface::{inline_documents, inline_files, Context, InlineOptions};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};

use super::helpers::runtime;

/// Options for the watch command.
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// Debounce delay in milliseconds.
    pub debounce_ms: u64,
}

/// Returns the path relative to `base_dir` if it is a source file worth processing.
fn relevant_source(
    path: &Path,
    base_dir: &Path,
    source_patterns: &[glob::Pattern],
    exclude_patterns: &[glob::Pattern],
) -> Option<PathBuf> {
    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    let included = source_patterns.iter().any(|p| p.matches_path(relative));
    let excluded = exclude_patterns.iter().any(|p| p.matches_path(relative));
    (included && !excluded && path.is_file()).then(|| relative.to_path_buf())
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| glob::Pattern::new(p).map_err(InlinerError::from))
        .collect()
}

/// Executes the watch command.
pub fn watch(ctx: &Context, options: WatchOptions) -> Result<()> {
    let debounce = if options.debounce_ms > 0 {
        options.debounce_ms
    } else {
        ctx.config.watch.debounce_ms
    };

    let source_patterns = compile_patterns(&ctx.config.source_patterns)?;
    let exclude_patterns = compile_patterns(&ctx.config.watch.exclude)?;
    let base_dir = ctx.base_dir.clone();
    let rt = runtime()?;
    let run_options = InlineOptions::default();

    println!("Watching for changes (debounce: {}ms)...", debounce);
    println!("Press Ctrl+C to stop.");

    // Initial pass
    match rt.block_on(inline_documents(ctx, &run_options)) {
        Ok(summary) if summary.shortcodes_found() > 0 => {
            println!("Inlined {} gists.", summary.shortcodes_inlined())
        }
        Ok(_) => {}
        Err(e) => eprintln!("Initial inline error: {}", e),
    }

    let (tx, rx) = channel();

    let mut watcher = RecommendedWatcher::new(
        move |res| {
            if let Ok(event) = res {
                let _ = tx.send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_millis(debounce)),
    )
    .map_err(|e| InlinerError::Watch(e.to_string()))?;

    watcher
        .watch(&base_dir, RecursiveMode::Recursive)
        .map_err(|e| InlinerError::Watch(e.to_string()))?;

    loop {
        let event = rx
            .recv()
            .map_err(|e| InlinerError::Watch(format!("Watch error: {}", e)))?;

        let mut changed: BTreeSet<PathBuf> = event
            .paths
            .iter()
            .filter_map(|p| relevant_source(p, &base_dir, &source_patterns, &exclude_patterns))
            .collect();

        // Coalesce bursts of events
        while let Ok(event) = rx.recv_timeout(Duration::from_millis(debounce)) {
            changed.extend(event.paths.iter().filter_map(|p| {
                relevant_source(p, &base_dir, &source_patterns, &exclude_patterns)
            }));
        }

        if changed.is_empty() {
            continue;
        }

        let files: Vec<PathBuf> = changed.into_iter().collect();
        tracing::debug!("Files changed: {:?}", files);
        let summary = rt.block_on(inline_files(ctx, &files, &run_options));
        if summary.shortcodes_inlined() > 0 {
            println!("Inlined {} gists.", summary.shortcodes_inlined());
        }
        for failure in &summary.failures {
            eprintln!("Inline error: {}: {}", failure.path.display(), failure.message);
        }
    }
}
