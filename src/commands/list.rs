//! List site content

use anyhow::Result;
use serde::Serialize;

use crate::content::{ContentLoader, ContentStore};
use crate::Site;

/// One row of `list post`
#[derive(Debug, Serialize)]
struct PostEntry<'a> {
    slug: &'a str,
    title: &'a str,
    date: String,
    source: &'a str,
}

/// List site content by type
pub fn run(site: &Site, content_type: &str, json: bool) -> Result<()> {
    let store = ContentLoader::new(site).load_all()?;
    println!("{}", render(&store, content_type, json)?);
    Ok(())
}

fn render(store: &ContentStore, content_type: &str, json: bool) -> Result<String> {
    match content_type {
        "post" | "posts" => {
            let entries: Vec<PostEntry> = store
                .posts()
                .iter()
                .map(|post| PostEntry {
                    slug: &post.slug,
                    title: &post.title,
                    date: post.date(),
                    source: &post.source,
                })
                .collect();

            if json {
                return Ok(serde_json::to_string_pretty(&entries)?);
            }

            let mut out = format!("Posts ({}):", entries.len());
            for entry in &entries {
                out.push_str(&format!(
                    "\n  {} - {} [{}]",
                    entry.date, entry.title, entry.source
                ));
            }
            Ok(out)
        }
        "route" | "routes" => {
            let routes = store.routes();

            if json {
                return Ok(serde_json::to_string_pretty(&routes)?);
            }

            let mut out = format!("Routes ({}):", routes.len());
            for route in &routes {
                out.push_str(&format!("\n  {}", route));
            }
            Ok(out)
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, route", content_type);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> (TempDir, ContentStore) {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("content/blog");
        fs::create_dir_all(&blog).unwrap();
        for (name, published) in [("old.md", "15 06 2023 4 PM"), ("new.md", "01 01 2024 9 AM")] {
            fs::write(
                blog.join(name),
                format!(
                    "---\ntitle: {}\ndescription: d\npublished: {}\n---\n",
                    name, published
                ),
            )
            .unwrap();
        }
        let store = ContentLoader::new(&Site::new(tmp.path()).unwrap())
            .load_all()
            .unwrap();
        (tmp, store)
    }

    #[test]
    fn test_list_posts() {
        let (_tmp, store) = store();
        let out = render(&store, "post", false).unwrap();
        assert_eq!(
            out,
            "Posts (2):\n  1 Jan, 2024 - new.md [new.md]\n  15 Jun, 2023 - old.md [old.md]"
        );
    }

    #[test]
    fn test_list_posts_json() {
        let (_tmp, store) = store();
        let out = render(&store, "post", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["slug"], "new");
        assert_eq!(value[1]["date"], "15 Jun, 2023");
    }

    #[test]
    fn test_list_routes() {
        let (_tmp, store) = store();
        let out = render(&store, "route", true).unwrap();
        let routes: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(routes, vec!["/", "/blog", "/blog/new", "/blog/old"]);
    }

    #[test]
    fn test_unknown_type() {
        let (_tmp, store) = store();
        assert!(render(&store, "tag", false).is_err());
    }
}
