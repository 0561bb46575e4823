//! Configuration loading
//!
//! This module resolves the application configuration from environment
//! variables or files.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, load_from_lookup, CONFIG_FILE_VAR};
