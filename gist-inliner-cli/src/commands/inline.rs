//! Inline command implementation.

use std::path::PathBuf;

use gist_inliner::errors::Result;
use gist_inliner::interface::{inline_files, Context, InlineOptions as RunOptions};
use gist_inliner::WritePolicy;

use super::helpers::{check_failures, print_shortcodes, runtime, select_files};

/// Options for the inline command.
#[derive(Debug, Clone, Default)]
pub struct InlineOptions {
    /// Show what would be fetched without fetching or writing.
    pub dry_run: bool,
    /// Suppress normal output.
    pub quiet: bool,
    /// Maximum number of files processed at once.
    pub jobs: Option<usize>,
    /// Override the configured write policy.
    pub write_policy: Option<WritePolicy>,
    /// Glob patterns to filter source files.
    pub glob: Vec<String>,
    /// Specific files to process (empty means all).
    pub files: Vec<PathBuf>,
}

/// Executes the inline command.
pub fn inline(ctx: &mut Context, options: InlineOptions) -> Result<()> {
    tracing::info!("Inlining gists...");

    if let Some(jobs) = options.jobs {
        ctx.config.fetch.concurrency = jobs;
    }
    if let Some(policy) = options.write_policy {
        ctx.config.write_policy = policy;
    }

    let selected = select_files(ctx, &options.files, &options.glob)?;
    let run_options = RunOptions {
        dry_run: options.dry_run,
    };
    let summary = runtime()?.block_on(inline_files(ctx, &selected, &run_options));

    if !options.quiet {
        if summary.shortcodes_found() == 0 {
            println!("No gist shortcodes found.");
        } else if options.dry_run {
            println!(
                "Would fetch {} gists:",
                summary.shortcodes_found() - summary.shortcodes_failed()
            );
            for report in summary.with_shortcodes() {
                print_shortcodes(report);
            }
        } else {
            for report in summary.with_shortcodes().filter(|r| r.failed() > 0) {
                print_shortcodes(report);
            }
            println!(
                "Inlined {} of {} gists in {} files.",
                summary.shortcodes_inlined(),
                summary.shortcodes_found(),
                summary.files_written()
            );
        }
    }

    check_failures(&summary)
}
