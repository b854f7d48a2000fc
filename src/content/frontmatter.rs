//! Front-matter parsing

use serde::Deserialize;
use std::path::Path;

use crate::error::{ContentError, Result};

/// Front-matter data from a post or the home page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Publish date in the `dd MM yyyy h a` format
    pub published: Option<String>,
    /// Overrides the slug derived from the file name
    pub slug: Option<String>,
    pub draft: bool,
}

impl FrontMatter {
    /// Parse the front-matter block of a post
    ///
    /// Returns (front_matter, remaining_content). A post without a
    /// front-matter block, or with YAML that does not deserialize, is an error.
    pub fn parse<'a>(path: &Path, content: &'a str) -> Result<(Self, &'a str)> {
        let (yaml, body) = split(content).ok_or_else(|| ContentError::MissingFrontMatter {
            path: path.to_path_buf(),
        })?;

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml).map_err(|e| {
            ContentError::InvalidFrontMatter {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        Ok((fm, body))
    }

    /// Parse an optional front-matter block
    ///
    /// Used for standalone pages where front-matter is a convenience: content
    /// without a block, or with a block that is not valid YAML, is returned
    /// whole.
    pub fn parse_optional(content: &str) -> (Self, &str) {
        match split(content) {
            Some((yaml, body)) => match serde_yaml::from_str::<FrontMatter>(yaml) {
                Ok(fm) => (fm, body),
                Err(e) if yaml.trim().is_empty() => {
                    tracing::trace!("Empty front-matter: {}", e);
                    (FrontMatter::default(), body)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse front-matter, treating as content: {}", e);
                    (FrontMatter::default(), content.trim_start())
                }
            },
            None => (FrontMatter::default(), content.trim_start()),
        }
    }

    /// Get a required, non-blank string field
    pub fn require<'a>(
        path: &Path,
        field: &'static str,
        value: &'a Option<String>,
    ) -> Result<&'a str> {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(ContentError::MissingField {
                path: path.to_path_buf(),
                field,
            }),
        }
    }
}

/// Split a `---` delimited YAML block from the body
///
/// Returns `None` when the content does not start with a block that looks
/// like YAML, so markdown horizontal rules are not mistaken for front-matter.
fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    let rest = content.strip_prefix("---")?;
    let rest = rest.trim_start_matches(['\n', '\r']);

    // An empty block closes immediately
    if let Some(body) = rest.strip_prefix("---") {
        return Some(("", body.trim_start_matches(['\n', '\r'])));
    }

    let end_pos = rest.find("\n---")?;
    let yaml = &rest[..end_pos];
    let body = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

    if yaml.trim().is_empty() || has_yaml_structure(yaml) {
        Some((yaml, body))
    } else {
        None
    }
}

/// Whether a block has at least one `key: value` line
fn has_yaml_structure(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}
