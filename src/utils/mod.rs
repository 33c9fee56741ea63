//! Shared helpers

mod paths;

pub use paths::{normalize_path, slash_path};
