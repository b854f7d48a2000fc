//! MDX-style components embedded in posts
//!
//! Posts can use a fixed set of capitalised tags such as
//! `<Note>Remember this</Note>` or `<StaticImg src="/static/a.png" />`.
//! Each tag name maps to a render function in [`COMPONENTS`]; tags are
//! expanded into plain HTML before the markdown pass. Unknown tags are left
//! in place and end up as raw HTML.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;

use super::markdown::render_fragment;
use crate::helpers::html_escape;

/// Attributes of a component tag
pub type Attrs = HashMap<String, String>;

/// A named component and its renderer
pub struct Component {
    pub name: &'static str,
    render: fn(&Attrs, &str) -> String,
}

impl Component {
    pub fn render(&self, attrs: &Attrs, inner: &str) -> String {
        (self.render)(attrs, inner)
    }
}

/// Registry of every component a post may use
pub static COMPONENTS: &[Component] = &[
    Component { name: "Highlight", render: highlight },
    Component { name: "HTMLTag", render: html_tag },
    Component { name: "Link", render: link },
    Component { name: "NoWrap", render: no_wrap },
    Component { name: "Note", render: note },
    Component { name: "Quote", render: quote },
    Component { name: "Snippet", render: snippet },
    Component { name: "StaticImg", render: static_img },
    Component { name: "Table", render: table },
    Component { name: "TableBody", render: table_body },
    Component { name: "TableCaption", render: table_caption },
    Component { name: "TableCell", render: table_cell },
    Component { name: "TableHead", render: table_head },
    Component { name: "TableHeader", render: table_header },
    Component { name: "TableRow", render: table_row },
    Component { name: "Tweet", render: tweet },
];

lazy_static! {
    static ref OPEN_TAG: Regex = Regex::new(
        r#"<([A-Z][A-Za-z0-9]*)((?:\s+[A-Za-z_][\w-]*\s*=\s*(?:"[^"]*"|\{[^}]*\}))*)\s*(/?)>"#
    )
    .expect("valid component tag regex");
    static ref ATTR: Regex =
        Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*(?:"([^"]*)"|\{\s*"?([^}"]*)"?\s*\})"#)
            .expect("valid component attribute regex");
}

/// Find a component by tag name
pub fn lookup(name: &str) -> Option<&'static Component> {
    COMPONENTS.iter().find(|c| c.name == name)
}

/// Expand component tags in a markdown document
///
/// Fenced code blocks are copied verbatim so posts can show component
/// syntax without it being rendered.
pub fn expand(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut prose = String::new();
    let mut fence: Option<&str> = None;

    for line in markdown.split_inclusive('\n') {
        let trimmed = line.trim_start();
        match fence {
            Some(marker) => {
                out.push_str(line);
                if trimmed.starts_with(marker) {
                    fence = None;
                }
            }
            None => {
                let marker = if trimmed.starts_with("```") {
                    Some("```")
                } else if trimmed.starts_with("~~~") {
                    Some("~~~")
                } else {
                    None
                };
                if let Some(marker) = marker {
                    out.push_str(&expand_tags(&prose));
                    prose.clear();
                    out.push_str(line);
                    fence = Some(marker);
                } else {
                    prose.push_str(line);
                }
            }
        }
    }

    out.push_str(&expand_tags(&prose));
    out
}

fn expand_tags(text: &str) -> String {
    let spans = code_spans(text);
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(caps) = OPEN_TAG.captures_at(text, pos) {
        let Some(whole) = caps.get(0) else { break };

        // Tags inside inline code are shown literally
        if let Some(span) = spans.iter().find(|s| s.contains(&whole.start())) {
            out.push_str(&text[pos..span.end]);
            pos = span.end;
            continue;
        }

        let name = &caps[1];
        let after = whole.end();

        let Some(component) = lookup(name) else {
            out.push_str(&text[pos..after]);
            pos = after;
            continue;
        };

        out.push_str(&text[pos..whole.start()]);
        let attrs = parse_attrs(&caps[2]);

        if &caps[3] == "/" {
            out.push_str(&component.render(&attrs, ""));
            pos = after;
            continue;
        }

        let close = format!("</{}>", name);
        match text[after..].find(&close) {
            Some(offset) => {
                let inner = expand_tags(&text[after..after + offset]);
                out.push_str(&component.render(&attrs, &inner));
                pos = after + offset + close.len();
            }
            None => {
                tracing::warn!("Unclosed <{}> component, leaving it as is", name);
                out.push_str(whole.as_str());
                pos = after;
            }
        }
    }

    out.push_str(&text[pos..]);
    out
}

/// Byte ranges of inline code spans, delimited by equal-length backtick runs
fn code_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let backticks = |from: usize| bytes[from..].iter().take_while(|&&b| b == b'`').count();

    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }

        let start = i;
        let run = backticks(i);
        i += run;

        let mut j = i;
        while j < bytes.len() {
            if bytes[j] != b'`' {
                j += 1;
                continue;
            }
            let close = backticks(j);
            if close == run {
                spans.push(start..j + close);
                i = j + close;
                break;
            }
            j += close;
        }
    }

    spans
}

/// Parse `key="value"` and `key={value}` attribute pairs
fn parse_attrs(raw: &str) -> Attrs {
    ATTR.captures_iter(raw)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            (caps[1].to_string(), value)
        })
        .collect()
}

/// Render block content without leaving blank lines, which would end the
/// surrounding HTML block in the markdown pass
fn block(inner: &str) -> String {
    render_fragment(inner.trim())
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render inline content, dropping the paragraph wrapper
fn inline(inner: &str) -> String {
    let html = block(inner);
    html.strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .filter(|s| !s.contains("<p>"))
        .map(str::to_string)
        .unwrap_or(html)
}

fn highlight(_attrs: &Attrs, inner: &str) -> String {
    format!(r#"<span class="highlight-comp">{}</span>"#, inline(inner))
}

fn no_wrap(_attrs: &Attrs, inner: &str) -> String {
    format!(r#"<span class="nowrap">{}</span>"#, inline(inner))
}

fn note(_attrs: &Attrs, inner: &str) -> String {
    format!(
        r#"<div class="note"><span class="note-icon" aria-hidden="true">&#9432;</span><span class="note-body">{}</span></div>"#,
        inline(inner)
    )
}

fn snippet(_attrs: &Attrs, inner: &str) -> String {
    format!(
        r#"<span class="highlight-comp"><code class="snippet">{}</code></span>"#,
        html_escape(inner.trim())
    )
}

fn static_img(attrs: &Attrs, _inner: &str) -> String {
    let src = attrs.get("src").map(String::as_str).unwrap_or_default();
    let alt = attrs.get("alt").map(String::as_str).unwrap_or("img");
    let mut tag = format!(
        r#"<img class="static-img" src="{}" alt="{}""#,
        html_escape(src),
        html_escape(alt)
    );
    for dim in ["width", "height"] {
        if let Some(value) = attrs.get(dim) {
            tag.push_str(&format!(r#" {}="{}""#, dim, html_escape(value)));
        }
    }
    tag.push('>');
    tag
}

fn html_tag(_attrs: &Attrs, inner: &str) -> String {
    format!(
        r#"<span class="html-tag">&lt;{}&gt;</span>"#,
        html_escape(inner.trim())
    )
}

fn quote(_attrs: &Attrs, inner: &str) -> String {
    format!(r#"<div class="quote">{}</div>"#, block(inner))
}

fn link(attrs: &Attrs, inner: &str) -> String {
    let href = attrs.get("href").map(String::as_str).unwrap_or("#");
    format!(r#"<a href="{}">{}</a>"#, html_escape(href), inline(inner))
}

/// Wrap already expanded child elements, dropping blank lines
fn container(tag: &str, inner: &str) -> String {
    let body = inner
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    format!("<{tag}>{body}</{tag}>")
}

fn table(_attrs: &Attrs, inner: &str) -> String {
    container("table", inner)
}

fn table_body(_attrs: &Attrs, inner: &str) -> String {
    container("tbody", inner)
}

fn table_header(_attrs: &Attrs, inner: &str) -> String {
    container("thead", inner)
}

fn table_row(_attrs: &Attrs, inner: &str) -> String {
    container("tr", inner)
}

fn table_caption(_attrs: &Attrs, inner: &str) -> String {
    format!("<caption>{}</caption>", inline(inner))
}

fn table_head(_attrs: &Attrs, inner: &str) -> String {
    format!("<th>{}</th>", inline(inner))
}

fn table_cell(_attrs: &Attrs, inner: &str) -> String {
    format!("<td>{}</td>", inline(inner))
}

fn tweet(attrs: &Attrs, _inner: &str) -> String {
    let id = attrs.get("id").map(String::as_str).unwrap_or_default();
    format!(
        r#"<blockquote class="twitter-tweet"><a href="https://twitter.com/i/status/{}">View post on X</a></blockquote>"#,
        html_escape(id)
    )
}
