//! Dataset subsystem for Gram Atlas.
//!
//! Typed records for the location tree, a tolerant loader for the raw
//! JSON file, and the read-only store answering the four lookups.

pub mod loader;
pub mod store;
pub mod types;

pub use loader::{default_data_path, load_from_path, load_or_empty, LoadError, DATA_PATH_ENV};
pub use store::LocationStore;
pub use types::{Block, District, State};
