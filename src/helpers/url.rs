//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/static/profile.png") // -> "/site/static/profile.png"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog") // -> "https://example.com/blog"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Route of a single post, with the slug escaped as one path segment
pub fn post_path(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("blog/{}", encode_segment(slug)))
}

/// Encode a value so it can be used as a single URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/site/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/static/app.css"), "/site/static/app.css");
        assert_eq!(url_for(&config, "blog"), "/site/blog");
        assert_eq!(url_for(&config, "/"), "/site/");
        assert_eq!(url_for(&SiteConfig::default(), "blog"), "/blog");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/blog"),
            "https://example.com/site/blog"
        );
    }

    #[test]
    fn test_post_path() {
        let config = SiteConfig::default();
        assert_eq!(post_path(&config, "hello-world"), "/blog/hello-world");
        assert_eq!(post_path(&config, "a b?"), "/blog/a%20b%3F");
    }
}
