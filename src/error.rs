//! Error types for loading and resolving blog content

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or looking up posts
///
/// Everything except [`ContentError::NotFound`] is a load error: the content
/// store is broken and the operator has to fix a file. `NotFound` is the only
/// variant meant for end users.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("{path:?}: failed to read: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{path:?}: missing front-matter block")]
    MissingFrontMatter { path: PathBuf },

    #[error("{path:?}: invalid front-matter: {message}")]
    InvalidFrontMatter { path: PathBuf, message: String },

    #[error("{path:?}: missing required front-matter field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("invalid published date {value:?}: {message}")]
    InvalidDate { value: String, message: String },

    #[error("{path:?}: invalid published date {value:?}")]
    InvalidPostDate { path: PathBuf, value: String },

    #[error("{path:?}: slug {slug:?} is not a single URL path segment")]
    InvalidSlug { path: PathBuf, slug: String },

    #[error("duplicate slug `{slug}` in {first:?} and {second:?}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Post not found: {0}")]
    NotFound(String),
}

impl ContentError {
    /// Whether this error should be shown to a visitor as a missing page
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound(_))
    }
}

pub type Result<T, E = ContentError> = std::result::Result<T, E>;
