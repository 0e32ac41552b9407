//! High-level interface for running the inliner.

mod context;
mod document;
mod runner;

pub use context::Context;
pub use document::{process_file, scan_file, FileReport, ShortcodeOutcome, ShortcodeReport};
pub use runner::{inline_documents, inline_files, FileFailure, InlineOptions, RunSummary};
