//! Navigation bar helpers

use serde::Serialize;

use super::url::url_for;
use crate::config::{NavItem, SiteConfig};

/// A navigation entry resolved against the current request path
#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
    pub active: bool,
}

/// Whether a link to `href` should be highlighted on `pathname`
///
/// Links marked `absolute` only compare the first path segment, so
/// `/blog/some-post` keeps the `/blog` entry highlighted.
pub fn is_active(pathname: &str, href: &str, absolute: bool) -> bool {
    if !absolute {
        return pathname == href;
    }

    first_segment(pathname) == first_segment(href)
}

fn first_segment(path: &str) -> &str {
    path.split('/').nth(1).unwrap_or("")
}

/// Build the navigation bar for the page at `pathname`
pub fn nav_links(config: &SiteConfig, pathname: &str) -> Vec<NavLink> {
    config
        .nav
        .iter()
        .map(|item: &NavItem| NavLink {
            title: item.title.clone(),
            href: url_for(config, &item.href),
            active: is_active(pathname, &item.href, item.absolute),
        })
        .collect()
}
