//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::helpers::published_string;
use crate::Site;

/// Create a new post in the blog directory and return its path
///
/// The file is named after `slug`, or the slugified title when no slug is
/// given, and published at the current hour.
pub fn create_post(site: &Site, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}; pass --slug", title);
    }

    let target_dir = site.blog_dir();
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.mdx", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now().naive_local();
    // The title doubles as the description until the author writes one
    let quoted_title = serde_yaml::to_string(title)?;
    let content = format!(
        "---\ntitle: {title}\ndescription: {title}\npublished: {}\n---\n",
        published_string(&now),
        title = quoted_title.trim_end(),
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
