//! CLI command implementations.

pub mod config;
mod helpers;
pub mod init;
pub mod inline;
pub mod list;
pub mod watch;

pub use config::config;
pub use init::init;
pub use inline::{inline, InlineOptions};
pub use list::{list, ListOptions};
pub use watch::{watch, WatchOptions};
