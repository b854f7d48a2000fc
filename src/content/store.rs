//! Loaded blog content: ordered posts plus slug lookup

use std::collections::HashMap;
use std::ops::Deref;

use super::{BlogPost, Neighbors, Page};
use crate::error::{ContentError, Result};

/// An immutable snapshot of the content directory
///
/// Posts are ordered by publish date, newest first. The ordering is stable,
/// so posts published at the same hour keep the order they were read in.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    posts: Vec<BlogPost>,
    by_slug: HashMap<String, usize>,
    home: Option<Page>,
}

impl ContentStore {
    /// Build a store from posts in any order
    ///
    /// Fails when two posts share a slug.
    pub fn new(mut posts: Vec<BlogPost>, home: Option<Page>) -> Result<Self> {
        posts.sort_by(|a, b| b.published.cmp(&a.published));

        let mut by_slug: HashMap<String, usize> = HashMap::with_capacity(posts.len());
        for (i, post) in posts.iter().enumerate() {
            if let Some(&first) = by_slug.get(&post.slug) {
                return Err(ContentError::DuplicateSlug {
                    slug: post.slug.clone(),
                    first: posts[first].full_source.clone(),
                    second: post.full_source.clone(),
                });
            }
            by_slug.insert(post.slug.clone(), i);
        }

        Ok(Self {
            posts,
            by_slug,
            home,
        })
    }

    /// All posts, newest first
    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    /// The home page narrative, if `home.md` exists
    pub fn home(&self) -> Option<&Page> {
        self.home.as_ref()
    }

    /// Find the post with exactly this slug
    pub fn resolve(&self, slug: &str) -> Result<&BlogPost> {
        self.position(slug).map(|i| &self.posts[i])
    }

    /// Older and newer posts around `slug`
    ///
    /// `previous` is the post after it in the listing (older) and `next` the
    /// one before it (newer).
    pub fn neighbors(&self, slug: &str) -> Result<Neighbors<'_>> {
        let i = self.position(slug)?;
        Ok(Neighbors {
            previous: self.posts.get(i + 1),
            next: i.checked_sub(1).and_then(|j| self.posts.get(j)),
        })
    }

    /// Slugs of every post, newest first
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.posts.iter().map(|p| p.slug.as_str())
    }

    /// Every route the site serves, relative to the site root
    pub fn routes(&self) -> Vec<String> {
        let mut routes = vec!["/".to_string(), "/blog".to_string()];
        routes.extend(self.slugs().map(|slug| format!("/blog/{}", slug)));
        routes
    }

    fn position(&self, slug: &str) -> Result<usize> {
        self.by_slug
            .get(slug)
            .copied()
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))
    }
}

impl Deref for ContentStore {
    type Target = [BlogPost];

    fn deref(&self) -> &Self::Target {
        &self.posts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::parse_published;
    use std::path::PathBuf;

    fn post(slug: &str, published: &str) -> BlogPost {
        BlogPost {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            description: String::new(),
            published: parse_published(published).unwrap(),
            draft: false,
            content: String::new(),
            html: String::new(),
            source: format!("{}.mdx", slug),
            full_source: PathBuf::from(format!("blog/{}.mdx", slug)),
        }
    }

    fn sample() -> ContentStore {
        ContentStore::new(
            vec![
                post("a", "01 01 2024 9 AM"),
                post("b", "15 06 2023 4 PM"),
                post("c", "20 03 2024 10 AM"),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_sorted_newest_first() {
        let store = sample();
        let slugs: Vec<_> = store.slugs().collect();
        assert_eq!(slugs, vec!["c", "a", "b"]);
        assert!(store.windows(2).all(|w| w[0].published >= w[1].published));
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let store = ContentStore::new(
            vec![
                post("x", "01 01 2024 9 AM"),
                post("y", "01 01 2024 9 AM"),
                post("z", "02 01 2024 9 AM"),
            ],
            None,
        )
        .unwrap();
        let slugs: Vec<_> = store.slugs().collect();
        assert_eq!(slugs, vec!["z", "x", "y"]);
    }

    #[test]
    fn test_resolve() {
        let store = sample();
        assert_eq!(store.resolve("b").unwrap().title, "B");
        assert!(store.resolve("B").unwrap_err().is_not_found());
        assert!(store.resolve("missing").unwrap_err().is_not_found());
        for slug in store.slugs() {
            assert_eq!(store.resolve(slug).unwrap().slug, slug);
        }
    }

    #[test]
    fn test_neighbors_middle() {
        let store = sample();
        let n = store.neighbors("a").unwrap();
        assert_eq!(n.previous.map(|p| p.slug.as_str()), Some("b"));
        assert_eq!(n.next.map(|p| p.slug.as_str()), Some("c"));
    }

    #[test]
    fn test_neighbors_boundaries() {
        let store = sample();
        let newest = store.neighbors("c").unwrap();
        assert!(newest.next.is_none());
        assert_eq!(newest.previous.map(|p| p.slug.as_str()), Some("a"));

        let oldest = store.neighbors("b").unwrap();
        assert!(oldest.previous.is_none());
        assert_eq!(oldest.next.map(|p| p.slug.as_str()), Some("a"));

        let single = ContentStore::new(vec![post("only", "01 01 2024 9 AM")], None).unwrap();
        let n = single.neighbors("only").unwrap();
        assert!(n.previous.is_none() && n.next.is_none());

        assert!(store.neighbors("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_slug() {
        let err = ContentStore::new(
            vec![post("a", "01 01 2024 9 AM"), post("a", "02 01 2024 9 AM")],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::DuplicateSlug { ref slug, .. } if slug == "a"));
    }

    #[test]
    fn test_routes() {
        let store = sample();
        assert_eq!(
            store.routes(),
            vec!["/", "/blog", "/blog/c", "/blog/a", "/blog/b"]
        );
    }
}
