//! Helper functions for templates
//!
//! Date formatting, URL generation, HTML snippets and navigation state
//! shared by the page renderer and the CLI.

mod date;
mod html;
mod nav;
mod url;

pub use date::*;
pub use html::*;
pub use nav::*;
pub use url::*;
