//! Post and Page models

use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::helpers::format_date;

/// A blog post
#[derive(Debug, Clone)]
pub struct BlogPost {
    /// Slug (URL segment and lookup key)
    pub slug: String,

    /// Post title
    pub title: String,

    /// Summary used for the page description
    pub description: String,

    /// Publication date
    pub published: NaiveDateTime,

    /// Whether the post is marked as a draft
    pub draft: bool,

    /// Raw markdown content
    pub content: String,

    /// Rendered HTML content
    pub html: String,

    /// Source file path (relative to the blog directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,
}

impl BlogPost {
    /// Publication date formatted for display, like `15 Jun, 2023`
    pub fn date(&self) -> String {
        format_date(&self.published)
    }
}

/// Chronological neighbours of a post
///
/// `previous` is the older post (it comes after the current one in the
/// newest-first listing) and `next` is the newer one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbors<'a> {
    pub previous: Option<&'a BlogPost>,
    pub next: Option<&'a BlogPost>,
}

/// A standalone markdown page, such as the home page narrative
#[derive(Debug, Clone)]
pub struct Page {
    /// Page title, when the front-matter sets one
    pub title: Option<String>,

    /// Page description, when the front-matter sets one
    pub description: Option<String>,

    /// Rendered HTML content
    pub content: String,

    /// Full source file path
    pub full_source: PathBuf,
}
