//! I/O operations for reading and rewriting documents.

mod file_store;

pub use file_store::{FileStore, MemoryStore, RealFileStore};
