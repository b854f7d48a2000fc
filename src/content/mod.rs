//! Content module - handles posts, pages, and content processing

pub mod components;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod store;

pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::{BlogPost, Neighbors, Page};
pub use store::ContentStore;
