//! Generator module - renders pages with the built-in Tera templates
//!
//! Each `render_*` method turns a loaded [`ContentStore`] into one HTML page.
//! The development server calls them per request, and [`Generator::generate`]
//! writes all of them to the public directory.

use anyhow::Result;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{BlogPost, ContentStore};
use crate::helpers;
use crate::templates::{
    ConfigData, HomeData, NavPost, PageMeta, PaginateData, PostData, TemplateRenderer,
};
use crate::Site;

/// Renders site pages from loaded content
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Write every page and the static assets to the public directory
    pub fn generate(&self, store: &ContentStore) -> Result<()> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir)?;

        write_page(&public_dir.join("index.html"), &self.render_home(store)?)?;
        write_page(
            &public_dir.join("blog/index.html"),
            &self.render_blog_index(store)?,
        )?;

        for post in store.posts() {
            let output_path = public_dir
                .join("blog")
                .join(helpers::encode_segment(&post.slug))
                .join("index.html");
            write_page(&output_path, &self.render_post(store, post)?)?;
        }

        write_page(&public_dir.join("404.html"), &self.render_not_found("/404")?)?;

        self.copy_static_assets()?;

        Ok(())
    }

    /// Render `/`: profile card and the home page narrative
    pub fn render_home(&self, store: &ContentStore) -> Result<String> {
        let config = &self.site.config;
        let home = store.home();

        let title = home
            .and_then(|h| h.title.clone())
            .unwrap_or_else(|| config.title.clone());
        let description = home
            .and_then(|h| h.description.clone())
            .unwrap_or_else(|| config.description.clone());

        let mut context = self.base_context("/", &title, &description)?;
        context.extend(Context::from_serialize(HomeData {
            profile: config.profile.clone(),
            about: home.map(|h| h.content.clone()).unwrap_or_default(),
        })?);

        self.renderer.render("home.html", &context)
    }

    /// Render `/blog`: every post, newest first
    pub fn render_blog_index(&self, store: &ContentStore) -> Result<String> {
        let config = &self.site.config;
        let title = format!("{} | {}", config.blog.title, config.title);

        let posts: Vec<PostData> = store
            .posts()
            .iter()
            .map(|post| PostData::new(config, post))
            .collect();

        let mut context = self.base_context("/blog", &title, &config.blog.description)?;
        context.insert("heading", &config.blog.heading);
        context.insert("posts", &posts);

        self.renderer.render("blog_index.html", &context)
    }

    /// Render `/blog/{slug}` with links to the neighboring posts
    pub fn render_post(&self, store: &ContentStore, post: &BlogPost) -> Result<String> {
        let config = &self.site.config;
        let neighbors = store.neighbors(&post.slug)?;
        let paginate = PaginateData {
            previous: neighbors.previous.map(|p| NavPost::new(config, p)),
            next: neighbors.next.map(|p| NavPost::new(config, p)),
        };

        let pathname = format!("/blog/{}", helpers::encode_segment(&post.slug));
        let mut context = self.base_context(&pathname, &post.title, &post.description)?;
        context.insert("post", &PostData::new(config, post));
        context.insert("paginate", &paginate);

        self.renderer.render("post.html", &context)
    }

    /// Render the not-found page for a request to `pathname`
    pub fn render_not_found(&self, pathname: &str) -> Result<String> {
        let config = &self.site.config;
        let title = format!("Page not found | {}", config.title);

        let mut context = self.base_context(pathname, &title, "")?;
        context.insert("home_path", &helpers::url_for(config, "/"));

        self.renderer.render("not_found.html", &context)
    }

    /// Context shared by every page
    fn base_context(&self, pathname: &str, title: &str, description: &str) -> Result<Context> {
        let config = &self.site.config;
        let head_meta = [
            helpers::meta_generator(),
            helpers::open_graph(
                title,
                description,
                &helpers::full_url_for(config, pathname),
                config.profile.avatar.as_deref(),
                &config.title,
            ),
        ]
        .join("\n");

        Ok(Context::from_serialize(PageMeta {
            config: ConfigData::from(config),
            nav: helpers::nav_links(config, pathname),
            page_title: title.to_string(),
            page_description: description.to_string(),
            head_meta,
        })?)
    }

    /// Copy the static directory to `public/static`
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        let target = self.site.public_dir.join("static");
        for entry in WalkDir::new(static_dir).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(static_dir)?;
            let dest = target.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
        }

        Ok(())
    }
}

fn write_page(output_path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(output_path, html)
        .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
    tracing::debug!("Generated: {:?}", output_path);
    Ok(())
}
