//! Navigation index error types.

use thiserror::Error;

/// Errors raised while decoding or validating a navigation document.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The document is not valid JSON for the navigation shape.
    #[error("Failed to decode navigation document: {0}")]
    Decode(#[from] serde_json::Error),

    /// The document declares a schema this version cannot read.
    #[error("Unsupported navigation schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// `name_to_path` and `path_to_name` disagree.
    #[error("Lookup maps are not inverse: {name:?} <-> {idx}")]
    NotInverse { name: String, idx: usize },

    /// An index points past the end of `data`.
    #[error("Index {idx} in {context} does not refer to a path ({len} paths)")]
    DanglingIndex {
        context: &'static str,
        idx: usize,
        len: usize,
    },

    /// A group refers to a subitem that does not exist.
    #[error("Group {kind:?} of item {item} refers to subitem {idx} ({len} subitems)")]
    InvalidGroupIndex {
        item: usize,
        kind: String,
        idx: usize,
        len: usize,
    },
}
