//! Shared command helpers.

use std::path::PathBuf;

use gist_inliner::errors::{InlinerError, Result};
use gist_inliner::interface::{Context, FileReport, RunSummary};

/// Builds the runtime that drives fetches for a single command.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(InlinerError::from)
}

/// Resolves the documents a command should touch.
///
/// With no explicit files or globs, every configured source file is selected.
pub fn select_files(ctx: &Context, files: &[PathBuf], globs: &[String]) -> Result<Vec<PathBuf>> {
    if files.is_empty() && globs.is_empty() {
        return ctx.source_files();
    }

    let mut selected = Vec::new();
    if !files.is_empty() {
        selected.extend(ctx.source_files_filtered(files)?);
    }
    if !globs.is_empty() {
        selected.extend(ctx.source_files_glob(globs)?);
    }
    selected.sort();
    selected.dedup();
    Ok(selected)
}

/// Prints one line per shortcode of a report.
pub fn print_shortcodes(report: &FileReport) {
    for entry in &report.shortcodes {
        println!(
            "  {}:{} {}",
            report.path.display(),
            entry.shortcode.line,
            entry.outcome.describe()
        );
    }
}

/// Turns per-file failures into a command error.
pub fn check_failures(summary: &RunSummary) -> Result<()> {
    if summary.is_success() {
        return Ok(());
    }

    for failure in &summary.failures {
        eprintln!("  {}: {}", failure.path.display(), failure.message);
    }
    Err(InlinerError::Other(format!(
        "{} file(s) could not be processed",
        summary.failures.len()
    )))
}
