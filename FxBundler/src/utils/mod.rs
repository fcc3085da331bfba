//! Utility functions

pub mod hash;
pub mod path;

pub use hash::hash_name;
pub use path::{file_name, normalize_path, parent_dir_name, relative_path, split_extension};
