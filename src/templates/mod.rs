//! Built-in site templates using the Tera template engine
//!
//! Every template is embedded in the binary, so a site only needs content
//! and a config file.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::{ProfileConfig, SiteConfig};
use crate::content::BlogPost;
use crate::helpers::{self, NavLink};

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Paths and rendered HTML are inserted as-is; templates escape
        // plain-text fields with the `escape` filter
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("blog_index.html", include_str!("site/blog_index.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            ("partials/nav.html", include_str!("site/partials/nav.html")),
            (
                "partials/paginate.html",
                include_str!("site/partials/paginate.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Publish date for display, like `15 Jun, 2023`
    pub date: String,
    pub datetime: String,
    pub path: String,
    pub content: String,
}

impl PostData {
    pub fn new(config: &SiteConfig, post: &BlogPost) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            date: helpers::format_date(&post.published),
            datetime: helpers::date_xml(&post.published),
            path: helpers::post_path(config, &post.slug),
            content: post.html.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

impl NavPost {
    pub fn new(config: &SiteConfig, post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            path: helpers::post_path(config, &post.slug),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginateData {
    pub previous: Option<NavPost>,
    pub next: Option<NavPost>,
}

/// Values every page template expects
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub config: ConfigData,
    pub nav: Vec<NavLink>,
    pub page_title: String,
    pub page_description: String,
    pub head_meta: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeData {
    pub profile: ProfileConfig,
    pub about: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> PageMeta {
        let config = SiteConfig::default();
        PageMeta {
            config: ConfigData::from(&config),
            nav: helpers::nav_links(&config, "/blog"),
            page_title: "Blog & More".to_string(),
            page_description: String::new(),
            head_meta: String::new(),
        }
    }

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_post_data_date() {
        let config = SiteConfig::default();
        let post = BlogPost {
            slug: "hello world".to_string(),
            title: "Hello".to_string(),
            description: "d".to_string(),
            published: helpers::parse_published("01 01 2024 9 AM").unwrap(),
            draft: false,
            content: String::new(),
            html: String::new(),
            source: "hello.md".to_string(),
            full_source: "content/blog/hello.md".into(),
        };

        let data = PostData::new(&config, &post);
        assert_eq!(data.date, "1 Jan, 2024");
        assert_eq!(data.datetime, "2024-01-01T09:00:00");
        assert_eq!(data.path, "/blog/hello%20world");
    }

    #[test]
    fn test_render_not_found() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::from_serialize(meta()).unwrap();
        context.insert("home_path", "/");
        let html = renderer.render("not_found.html", &context).unwrap();
        assert!(html.contains("Page not found :("));
        assert!(html.contains(r#"href="/">Back to homepage"#));
        assert!(html.contains("<title>Blog &amp; More</title>"));
        assert!(html.contains(r#"<a href="/blog" class="active">Blog</a>"#));
    }
}
