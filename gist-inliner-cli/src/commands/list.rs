//! List command implementation.

use gist_inliner::errors::Result;
use gist_inliner::interface::{scan_file, Context};

use super::helpers::print_shortcodes;

/// Options for the list command.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Also list files without shortcodes.
    pub verbose: bool,
}

/// Executes the list command: shows pending shortcodes without fetching anything.
pub fn list(ctx: &Context, options: ListOptions) -> Result<()> {
    let source_files = ctx.source_files()?;

    println!("Source files: {}", source_files.len());

    let mut pending = 0;
    let mut unresolvable = 0;
    for path in &source_files {
        let report = scan_file(ctx, path)?;

        if report.found() == 0 {
            if options.verbose {
                println!("{} (no shortcodes)", path.display());
            }
            continue;
        }

        println!("{} ({} shortcodes)", path.display(), report.found());
        print_shortcodes(&report);
        pending += report.found();
        unresolvable += report.failed();
    }

    println!("\nPending shortcodes: {}", pending);
    if unresolvable > 0 {
        println!("Without a link: {}", unresolvable);
    }

    Ok(())
}
