//! Page metadata block: `<!--{ "title": "Home" }-->`

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    static ref META_BLOCK: Regex = Regex::new(r"<!--\{([\s\S]*?)\}-->").unwrap();
}

/// A page source split into its metadata and the remaining markup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub meta: Map<String, Value>,
    pub body: String,
    /// Parse error when the block was present but not valid JSON
    pub meta_error: Option<String>,
}

impl Page {
    /// Extract the first metadata block from `html`
    ///
    /// The block's inner text is the inside of a JSON object. It is removed
    /// from the body even when it fails to parse.
    pub fn parse(html: &str) -> Self {
        let Some(block) = META_BLOCK.captures(html) else {
            return Self {
                body: html.to_string(),
                ..Self::default()
            };
        };

        let (Some(whole), Some(inner)) = (block.get(0), block.get(1)) else {
            return Self {
                body: html.to_string(),
                ..Self::default()
            };
        };

        let mut body = String::with_capacity(html.len() - whole.len());
        body.push_str(&html[..whole.start()]);
        body.push_str(&html[whole.end()..]);

        let wrapped = format!("{{{}}}", inner.as_str());
        match serde_json::from_str::<Map<String, Value>>(&wrapped) {
            Ok(meta) => Self {
                meta,
                body,
                meta_error: None,
            },
            Err(e) => {
                tracing::warn!("Meta JSON parse error: {}", e);
                Self {
                    meta: Map::new(),
                    body,
                    meta_error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta_block() {
        let page = Page::parse("<!--{ \"title\": \"Home\", \"order\": 2 }-->\n<h1>{{title}}</h1>");
        assert_eq!(page.meta["title"], "Home");
        assert_eq!(page.meta["order"], 2);
        assert_eq!(page.body, "\n<h1>{{title}}</h1>");
        assert!(page.meta_error.is_none());
    }

    #[test]
    fn test_no_meta_block() {
        let page = Page::parse("<p>plain</p>");
        assert!(page.meta.is_empty());
        assert_eq!(page.body, "<p>plain</p>");
    }

    #[test]
    fn test_include_directive_is_not_meta() {
        let html = "<!--#include file=\"a.html\" -->";
        let page = Page::parse(html);
        assert!(page.meta.is_empty());
        assert_eq!(page.body, html);
    }

    #[test]
    fn test_malformed_meta_removed() {
        let page = Page::parse("before<!--{ title: Home }-->after");
        assert!(page.meta.is_empty());
        assert!(page.meta_error.is_some());
        assert_eq!(page.body, "beforeafter");
    }

    #[test]
    fn test_only_first_block_used() {
        let page = Page::parse("<!--{\"a\":1}--><!--{\"b\":2}-->");
        assert_eq!(page.meta.len(), 1);
        assert_eq!(page.body, "<!--{\"b\":2}-->");
    }
}
