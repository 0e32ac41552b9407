//! Config command implementation.

use gist_inliner::errors::Result;
use gist_inliner::interface::Context;

/// Executes the config command -- prints the effective resolved configuration.
pub fn config(ctx: &Context) -> Result<()> {
    let toml_str = toml::to_string_pretty(&ctx.config)?;
    print!("{}", toml_str);
    Ok(())
}
