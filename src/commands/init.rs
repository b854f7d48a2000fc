//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::helpers::published_string;
use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Folio Configuration

# Site
title: Folio
description: ''
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
content_dir: content
public_dir: public
static_dir: static

# Writing
render_drafts: false
highlight:
  theme: base16-ocean.dark
  line_number: false

# Navigation bar
nav:
  - title: Home
    href: /
  - title: Blog
    href: /blog

# Home page
profile:
  name: John Doe
  tagline: Software Engineer.
  avatar:
  links: []

# Blog index
blog:
  title: Blog
  heading: Explore my blogs
  description: ''
"#;

const HOME_PAGE: &str = r#"---
title: Folio
---

Hi! This is the about section of your home page. Edit `content/home.md` to
tell visitors who you are.
"#;

/// Initialize a new site in the given directory
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("content/blog"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    write_if_missing(&target_dir.join(CONFIG_FILE), DEFAULT_CONFIG)?;
    write_if_missing(&target_dir.join("content/home.md"), HOME_PAGE)?;

    let now = chrono::Local::now().naive_local();
    let sample_post = format!(
        r#"---
title: Hello World
description: The first post on this site.
published: {}
---

Welcome to your new site! Posts live in `content/blog` as markdown or MDX
files with a front-matter block.

<Note>Create the next one with `folio new "My New Post"`.</Note>

## Run the server

```bash
$ folio serve
```

## Generate static files

```bash
$ folio generate
```
"#,
        published_string(&now)
    );

    write_if_missing(
        &target_dir.join("content/blog/hello-world.mdx"),
        &sample_post,
    )?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("Skipping existing file: {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use crate::Site;
    use tempfile::TempDir;

    #[test]
    fn test_init_site_loads() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();

        let site = Site::new(tmp.path()).unwrap();
        assert_eq!(site.config.profile.name, "John Doe");
        assert_eq!(site.config.nav.len(), 2);

        let store = ContentLoader::new(&site).load_all().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve("hello-world").unwrap().title, "Hello World");
        assert!(store.home().is_some());
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "title: Mine\n").unwrap();
        init_site(tmp.path()).unwrap();

        let config = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, "title: Mine\n");
    }
}
