//! Content errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or querying content items
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Malformed front-matter in {}: {reason}", file.display())]
    MalformedFrontMatter { file: PathBuf, reason: String },

    #[error("No content item at {path}")]
    NotFound { path: String },

    #[error("Duplicate content path {path}: {} and {}", first.display(), second.display())]
    DuplicatePath {
        path: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Failed to read {}: {source}", file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid ignore pattern {pattern:?}: {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ContentError {
    pub(crate) fn malformed(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ContentError::MalformedFrontMatter {
            file: file.into(),
            reason: reason.into(),
        }
    }
}
