//! Runs the inliner over many documents.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::errors::Result;

use super::context::Context;
use super::document::{process_file, scan_file, FileReport};

/// Options for an inliner run.
#[derive(Debug, Clone, Default)]
pub struct InlineOptions {
    /// Report what would be fetched without fetching or writing.
    pub dry_run: bool,
}

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Aggregate result of a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Reports of the documents processed, sorted by path.
    pub reports: Vec<FileReport>,
    /// Documents whose processing failed.
    pub failures: Vec<FileFailure>,
}

impl RunSummary {
    /// Reports of documents that contained at least one shortcode.
    pub fn with_shortcodes(&self) -> impl Iterator<Item = &FileReport> {
        self.reports.iter().filter(|r| r.found() > 0)
    }

    /// Number of documents that were written.
    pub fn files_written(&self) -> usize {
        self.reports.iter().filter(|r| r.writes > 0).count()
    }

    /// Total shortcodes found.
    pub fn shortcodes_found(&self) -> usize {
        self.reports.iter().map(FileReport::found).sum()
    }

    /// Total shortcodes inlined.
    pub fn shortcodes_inlined(&self) -> usize {
        self.reports.iter().map(FileReport::inlined).sum()
    }

    /// Total shortcodes left unresolved.
    pub fn shortcodes_failed(&self) -> usize {
        self.reports.iter().map(FileReport::failed).sum()
    }

    /// Returns true if every document was processed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Inlines gists in all documents matching the configured source patterns.
pub async fn inline_documents(ctx: &Context, options: &InlineOptions) -> Result<RunSummary> {
    let files = ctx.source_files()?;
    tracing::debug!("Discovered {} markdown files", files.len());
    Ok(inline_files(ctx, &files, options).await)
}

/// Inlines gists in the given documents.
///
/// Each document is handled by its own task, with at most
/// `config.fetch.concurrency` running at once. A failing document is
/// recorded in the summary and does not affect the others.
pub async fn inline_files(ctx: &Context, files: &[PathBuf], options: &InlineOptions) -> RunSummary {
    let shared = Arc::new(ctx.clone());
    let permits = Arc::new(Semaphore::new(ctx.config.fetch.concurrency()));
    let dry_run = options.dry_run;

    let handles: Vec<_> = files
        .iter()
        .map(|path| {
            let ctx = Arc::clone(&shared);
            let permits = Arc::clone(&permits);
            let task_path = path.clone();
            let handle = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await;
                if dry_run {
                    scan_file(&ctx, &task_path)
                } else {
                    process_file(&ctx, &task_path).await
                }
            });
            (path.clone(), handle)
        })
        .collect();

    let mut summary = RunSummary::default();
    for (path, handle) in handles {
        let outcome = match handle.await {
            Ok(result) => result,
            Err(e) => Err(e.into()),
        };
        match outcome {
            Ok(report) => summary.reports.push(report),
            Err(e) => {
                tracing::error!("{}: {}", path.display(), e);
                summary.failures.push(FileFailure {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    summary.reports.sort_by(|a, b| a.path.cmp(&b.path));
    summary
}
