//! Common utility functions.

pub mod data;
pub mod fs;

// Re-export commonly used items
pub use data::{deep_merge, flatten, load_yaml, load_yaml_file};
pub use fs::{absolute, expand_path, file_url};
