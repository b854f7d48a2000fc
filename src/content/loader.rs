//! Content loader - loads blog posts and the home page from the content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{BlogPost, ContentStore, FrontMatter, MarkdownRenderer, Page};
use crate::error::{ContentError, Result};
use crate::helpers::parse_published;
use crate::Site;

/// Extensions treated as post sources
const POST_EXTENSIONS: &[&str] = &["md", "markdown", "mdx"];

/// Loads content from the content directory
pub struct ContentLoader {
    blog_dir: PathBuf,
    home_path: PathBuf,
    render_drafts: bool,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(site: &Site) -> Self {
        Self {
            blog_dir: site.blog_dir(),
            home_path: site.content_dir.join("home.md"),
            render_drafts: site.config.render_drafts,
            renderer: MarkdownRenderer::with_options(&site.config.highlight),
        }
    }

    /// Load every post and the home page
    ///
    /// Fails on the first post that cannot be read, has broken front-matter,
    /// lacks a required field or has an unparseable date.
    pub fn load_all(&self) -> Result<ContentStore> {
        let posts = self.load_posts()?;
        let home = self.load_home()?;
        let store = ContentStore::new(posts, home)?;
        tracing::debug!("Loaded {} posts from {:?}", store.len(), self.blog_dir);
        Ok(store)
    }

    /// Load all posts, unordered
    fn load_posts(&self) -> Result<Vec<BlogPost>> {
        if !self.blog_dir.exists() {
            tracing::debug!("No blog directory at {:?}", self.blog_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.blog_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_post_file(path) {
                continue;
            }

            let post = self.load_post(path)?;
            if post.draft && !self.render_drafts {
                tracing::debug!("Skipping draft {:?}", path);
                continue;
            }
            posts.push(post);
        }

        Ok(posts)
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<BlogPost> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(path, &content)?;

        let title = FrontMatter::require(path, "title", &fm.title)?.to_string();
        let description = FrontMatter::require(path, "description", &fm.description)?.to_string();
        let published_raw = FrontMatter::require(path, "published", &fm.published)?;
        let published =
            parse_published(published_raw).map_err(|_| ContentError::InvalidPostDate {
                path: path.to_path_buf(),
                value: published_raw.to_string(),
            })?;

        // Slug from the file name unless the front-matter names one
        let slug = match fm.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| ContentError::MissingField {
                    path: path.to_path_buf(),
                    field: "slug",
                })?
                .to_string(),
        };
        if !is_valid_slug(&slug) {
            return Err(ContentError::InvalidSlug {
                path: path.to_path_buf(),
                slug,
            });
        }

        let source = path
            .strip_prefix(&self.blog_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        Ok(BlogPost {
            slug,
            title,
            description,
            published,
            draft: fm.draft,
            html: self.renderer.render(body),
            content: body.to_string(),
            source,
            full_source: path.to_path_buf(),
        })
    }

    /// Load the home page narrative, if present
    pub fn load_home(&self) -> Result<Option<Page>> {
        if !self.home_path.is_file() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.home_path).map_err(|source| ContentError::Read {
                path: self.home_path.clone(),
                source,
            })?;
        let (fm, body) = FrontMatter::parse_optional(&content);

        Ok(Some(Page {
            title: fm.title,
            description: fm.description,
            content: self.renderer.render(body),
            full_source: self.home_path.clone(),
        }))
    }
}

/// A slug must name exactly one path segment below `/blog`
fn is_valid_slug(slug: &str) -> bool {
    slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}

/// Check if a file is a post source
pub fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| POST_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}
