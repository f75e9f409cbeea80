//! Utility functions for display formatting.

pub mod format;

pub use format::{format_date_key, truncate_string};
