//! Markdown rendering with HTML sanitizing
//!
//! Markdown bodies may embed raw HTML, so rendered output always goes through
//! an allow-list pass before it is handed out.

use ammonia::Builder;
use lazy_static::lazy_static;
use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};

lazy_static! {
    /// Opening anchor tag as serialized by the sanitizer: every attribute is
    /// written as name="value" with quotes in values escaped
    static ref ANCHOR_OPEN: Regex =
        Regex::new(r#"<a((?:\s[^\s="<>]+="[^"]*")*)>"#).unwrap();
    /// Characters treated as markup when building an excerpt
    static ref MARKUP_CHARS: Regex = Regex::new(r"[#_*>`~\[\]()!-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Marker appended to truncated excerpts
pub const ELLIPSIS: &str = "…";

/// Target given to anchors that do not specify one
const DEFAULT_LINK_TARGET: &str = "_blank";

/// Markdown renderer producing sanitized HTML
pub struct MarkdownRenderer {
    sanitizer: Builder<'static>,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        let mut sanitizer = Builder::default();
        sanitizer
            .add_tags(&["img", "h1", "h2", "h3"])
            .add_tag_attributes("img", &["src", "alt", "title", "width", "height"])
            .add_tag_attributes("a", &["href", "name", "target"])
            .link_rel(Some("noopener noreferrer"))
            .attribute_filter(|element, attribute, value| match (element, attribute) {
                // An empty target counts as unspecified
                ("a", "target") if value.trim().is_empty() => None,
                _ => Some(value.into()),
            });

        Self { sanitizer }
    }

    /// Render markdown to sanitized HTML
    pub fn render(&self, markdown: &str) -> String {
        let raw = Self::render_unsafe(markdown);
        self.sanitize(&raw)
    }

    /// Render markdown to HTML without sanitizing
    fn render_unsafe(markdown: &str) -> String {
        // GitHub-flavoured extensions; soft line breaks stay soft
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }

    /// Strip everything outside the allow-list and give every anchor a target
    pub fn sanitize(&self, html: &str) -> String {
        let clean = self.sanitizer.clean(html).to_string();
        ANCHOR_OPEN
            .replace_all(&clean, |caps: &Captures| {
                let attrs = &caps[1];
                if attrs.contains(" target=\"") {
                    caps[0].to_string()
                } else {
                    format!(r#"<a{} target="{}">"#, attrs, DEFAULT_LINK_TARGET)
                }
            })
            .into_owned()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-text summary of a markdown body
///
/// Markup characters become spaces, whitespace collapses, and the first
/// `words` words are kept. [`ELLIPSIS`] is appended only when words were
/// dropped.
pub fn excerpt(markdown: &str, words: usize) -> String {
    let text = MARKUP_CHARS.replace_all(markdown, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = text.trim();

    let parts: Vec<&str> = text.split(' ').collect();
    if parts.len() > words {
        format!("{}{}", parts[..words].join(" "), ELLIPSIS)
    } else {
        text.to_string()
    }
}
