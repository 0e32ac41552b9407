//! Gist Inliner - markdown build step for the blog
//!
//! Scans markdown posts for `{% gist <url> %}` shortcodes, fetches the raw
//! body of each gist and rewrites the post in place with the body inlined as
//! a fenced code block.
//!
//! # Example
//!
//! ```no_run
//! use gist_inliner::interface::{inline_documents, Context, InlineOptions};
//!
//! # async fn run() -> gist_inliner::Result<()> {
//! let ctx = Context::from_current_dir()?;
//! let summary = inline_documents(&ctx, &InlineOptions::default()).await?;
//! println!("Inlined {} gists.", summary.shortcodes_inlined());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod fetch;
pub mod interface;
pub mod io;
pub mod shortcode;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::{Config, WritePolicy};
pub use errors::{InlinerError, Result};
pub use interface::{Context, InlineOptions, RunSummary};
pub use shortcode::{find_shortcodes, Link, Shortcode};
